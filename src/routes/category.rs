use serde::Serialize;
use std::collections::HashMap;
use tracing::{Level, event, instrument};

use crate::services::listing::{self, QuestionPage};
use crate::store::QuestionStore;
use crate::types::category::{CategoryId, CategoryMap};
use crate::types::pagination::extract_pagination;

#[derive(Serialize, Debug)]
struct CategoriesResponse {
    success: bool,
    categories: CategoryMap,
}

#[derive(Serialize, Debug)]
struct CategoryQuestionsResponse {
    success: bool,
    #[serde(flatten)]
    page: QuestionPage,
    current_category: Option<String>,
}

#[instrument(skip(store))]
pub async fn get_categories<S: QuestionStore>(
    store: S,
) -> Result<impl warp::Reply, warp::Rejection> {
    event!(target: "trivia_api", Level::INFO, "querying categories");
    match listing::list_categories(&store).await {
        Ok(categories) => Ok(warp::reply::json(&CategoriesResponse {
            success: true,
            categories,
        })),
        Err(e) => Err(warp::reject::custom(e)),
    }
}

#[instrument(skip(store))]
pub async fn get_category_questions<S: QuestionStore>(
    id: i32,
    params: HashMap<String, String>,
    store: S,
) -> Result<impl warp::Reply, warp::Rejection> {
    let pagination = extract_pagination(&params);
    event!(
        target: "trivia_api",
        Level::INFO,
        category = id,
        page = pagination.page,
        "querying questions by category"
    );
    match listing::list_by_category(&store, CategoryId(id), pagination).await {
        Ok((page, current_category)) => Ok(warp::reply::json(&CategoryQuestionsResponse {
            success: true,
            page,
            current_category,
        })),
        Err(e) => Err(warp::reject::custom(e)),
    }
}
