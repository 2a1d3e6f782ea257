#![warn(clippy::all)]

use warp::{Filter, http::Method};

pub mod config;
pub mod routes;
pub mod services;
pub mod store;
pub mod types;

use services::mutation::MutationPolicy;
use services::quiz::QuizEngine;
use store::QuestionStore;

/// 모든 API 경로를 묶은 필터. 에러 복구(recover)는 호출하는 쪽에서 붙인다.
/// 경로를 먼저 검사하고 메서드를 나중에 검사해야 없는 경로가 405가 아닌 404가 된다.
pub fn routes<S: QuestionStore>(
    store: S,
    quiz: QuizEngine,
    policy: MutationPolicy,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let store_filter = warp::any().map(move || store.clone());
    let quiz_filter = warp::any().map(move || quiz.clone());
    let policy_filter = warp::any().map(move || policy);

    let get_categories = warp::path("categories")
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(routes::category::get_categories::<S>);

    let get_category_questions = warp::path("categories")
        .and(warp::path::param::<i32>())
        .and(warp::path("questions"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and_then(routes::category::get_category_questions::<S>);

    let get_questions = warp::path("questions")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and_then(routes::question::get_questions::<S>);

    let add_question = warp::path("questions")
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter.clone())
        .and(policy_filter)
        .and(warp::body::json())
        .and_then(routes::question::add_question::<S>);

    let delete_question = warp::path("questions")
        .and(warp::path::param::<i32>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(store_filter.clone())
        .and_then(routes::question::delete_question::<S>);

    let search_questions = warp::path("search")
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(routes::question::search_questions::<S>);

    let next_question = warp::path("quizzes")
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter)
        .and(quiz_filter)
        .and(warp::body::json())
        .and_then(routes::quiz::next_question::<S>);

    get_categories
        .or(get_category_questions)
        .or(get_questions)
        .or(add_question)
        .or(delete_question)
        .or(search_questions)
        .or(next_question)
        .with(warp::trace(|info| {
            tracing::info_span!(
                "trivia request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4(),
            )
        }))
}

pub fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Content-Type", "Authorization"])
        .allow_methods(&[Method::GET, Method::POST, Method::DELETE, Method::PATCH])
}
