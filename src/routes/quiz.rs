use tracing::{Level, event, instrument};

use crate::services::quiz::QuizEngine;
use crate::store::QuestionStore;
use crate::types::quiz::{QuizDraw, QuizRequest, QuizResponse};

#[instrument(skip(store, quiz))]
pub async fn next_question<S: QuestionStore>(
    store: S,
    quiz: QuizEngine,
    request: QuizRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let selector = request.selector();
    let previous = request.previous_ids();
    match quiz.next_question(&store, selector, &previous).await {
        Ok(draw) => {
            match &draw {
                QuizDraw::Question(q) => {
                    event!(Level::INFO, question_id = q.id.0, served = previous.len())
                }
                QuizDraw::Exhausted => {
                    event!(Level::INFO, served = previous.len(), "quiz exhausted")
                }
            }
            Ok(warp::reply::json(&QuizResponse::from(draw)))
        }
        Err(e) => Err(warp::reject::custom(e)),
    }
}
