use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{Level, event, info, instrument};

use crate::services::listing::{self, QuestionPage};
use crate::services::mutation::{self, MutationPolicy};
use crate::store::QuestionStore;
use crate::types::category::CategoryMap;
use crate::types::pagination::extract_pagination;
use crate::types::question::{NewQuestion, QuestionId};

#[derive(Serialize, Debug)]
struct QuestionsResponse {
    success: bool,
    #[serde(flatten)]
    page: QuestionPage,
    categories: CategoryMap,
}

#[derive(Serialize, Debug)]
struct SearchResponse {
    success: bool,
    #[serde(flatten)]
    page: QuestionPage,
}

#[derive(Serialize, Debug)]
struct CreatedResponse {
    success: bool,
    question: QuestionId,
}

#[derive(Serialize, Debug)]
struct DeletedResponse {
    success: bool,
    question_id: QuestionId,
}

#[derive(Deserialize, Debug)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm", default)]
    pub search_term: Option<String>,
}

#[instrument(skip(store))]
pub async fn get_questions<S: QuestionStore>(
    params: HashMap<String, String>,
    store: S,
) -> Result<impl warp::Reply, warp::Rejection> {
    event!(target: "trivia_api", Level::INFO, "querying questions");
    let pagination = extract_pagination(&params);
    info!(page = pagination.page);
    match listing::list_questions(&store, pagination).await {
        Ok((page, categories)) => Ok(warp::reply::json(&QuestionsResponse {
            success: true,
            page,
            categories,
        })),
        Err(e) => Err(warp::reject::custom(e)), // 에러는 handle-errors 크레이트의 return_error가 응답으로 바꾼다.
    }
}

#[instrument(skip(store))]
pub async fn search_questions<S: QuestionStore>(
    store: S,
    request: SearchRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    match listing::search(&store, request.search_term.as_deref()).await {
        Ok(page) => {
            info!(matches = page.total_questions);
            Ok(warp::reply::json(&SearchResponse {
                success: true,
                page,
            }))
        }
        Err(e) => Err(warp::reject::custom(e)),
    }
}

pub async fn add_question<S: QuestionStore>(
    store: S,
    policy: MutationPolicy,
    new_question: NewQuestion,
) -> Result<impl warp::Reply, warp::Rejection> {
    match mutation::create_question(&store, policy, new_question).await {
        Ok(id) => Ok(warp::reply::json(&CreatedResponse {
            success: true,
            question: id,
        })),
        Err(e) => Err(warp::reject::custom(e)),
    }
}

pub async fn delete_question<S: QuestionStore>(
    id: i32,
    store: S,
) -> Result<impl warp::Reply, warp::Rejection> {
    match mutation::delete_question(&store, QuestionId(id)).await {
        Ok(id) => Ok(warp::reply::json(&DeletedResponse {
            success: true,
            question_id: id,
        })),
        Err(e) => Err(warp::reject::custom(e)),
    }
}
