use tracing::{Level, event};

use handle_errors::Error;

use crate::store::QuestionStore;
use crate::types::question::{NewQuestion, QuestionId};

#[derive(Debug, Clone, Copy)]
pub struct MutationPolicy {
    /// 새 질문의 카테고리가 실제로 존재하는지 확인할지
    pub require_known_category: bool,
}

impl Default for MutationPolicy {
    fn default() -> Self {
        MutationPolicy {
            require_known_category: true,
        }
    }
}

pub async fn create_question<S: QuestionStore>(
    store: &S,
    policy: MutationPolicy,
    new_question: NewQuestion,
) -> Result<QuestionId, Error> {
    if new_question.question.trim().is_empty() {
        return Err(Error::InvalidInput("question text is required".to_string()));
    }
    if new_question.answer.trim().is_empty() {
        return Err(Error::InvalidInput("answer text is required".to_string()));
    }
    if policy.require_known_category {
        let categories = store.get_all_categories().await?;
        if !categories.iter().any(|c| c.id == new_question.category) {
            return Err(Error::InvalidInput(format!(
                "category {} does not exist",
                new_question.category.0
            )));
        }
    }

    let id = store.insert(new_question).await?;
    event!(Level::INFO, question_id = id.0, "question created");
    Ok(id)
}

pub async fn delete_question<S: QuestionStore>(
    store: &S,
    id: QuestionId,
) -> Result<QuestionId, Error> {
    if store.get_by_id(id).await?.is_none() {
        return Err(Error::QuestionNotFound(id.0));
    }
    // 확인과 삭제 사이에 다른 요청이 먼저 지웠다면 405로 알린다.
    if !store.delete(id).await? {
        return Err(Error::CannotDelete(id.0));
    }
    event!(Level::INFO, question_id = id.0, "question deleted");
    Ok(id)
}
