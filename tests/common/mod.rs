use handle_errors::return_error;
use serde_json::Value;
use warp::Filter;
use warp::http::StatusCode;

use trivia_api::services::mutation::MutationPolicy;
use trivia_api::services::quiz::{AllCategoriesMode, QuizEngine};
use trivia_api::store::MemoryStore;

pub fn bundled_store() -> MemoryStore {
    MemoryStore::bundled().expect("bundled trivia data should parse")
}

pub fn api(
    store: MemoryStore,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let quiz = QuizEngine::new(Some(2024), AllCategoriesMode::Every, 1..=6);
    trivia_api::routes(store, quiz, MutationPolicy::default()).recover(return_error)
}

pub async fn call(
    store: &MemoryStore,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = warp::test::request().method(method).path(path);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let res = request.reply(&api(store.clone())).await;
    let value = serde_json::from_slice(res.body()).expect("response body should be JSON");
    (res.status(), value)
}
