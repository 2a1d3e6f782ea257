use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::category::CategoryId;
use crate::types::question::{Question, QuestionId};

/// `POST /quizzes` 요청 본문.
/// 세션 상태(이미 출제된 질문)는 클라이언트가 들고 있다가 매번 보낸다.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Vec<QuestionId>,
    #[serde(default)]
    pub quiz_category: Option<QuizCategory>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct QuizCategory {
    #[serde(default)]
    pub id: Option<CategoryId>,
}

impl QuizRequest {
    pub fn selector(&self) -> CategorySelector {
        let id = self.quiz_category.as_ref().and_then(|c| c.id);
        match id {
            Some(id) => CategorySelector::from_id(id),
            None => CategorySelector::All,
        }
    }

    pub fn previous_ids(&self) -> HashSet<QuestionId> {
        self.previous_questions.iter().copied().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySelector {
    All,
    Category(CategoryId),
}

impl CategorySelector {
    /// 0은 실제 카테고리가 아니라 "전체"를 뜻한다.
    pub fn from_id(id: CategoryId) -> Self {
        if id.0 == 0 {
            CategorySelector::All
        } else {
            CategorySelector::Category(id)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizDraw {
    Question(Question),
    Exhausted,
}

#[derive(Serialize, Debug)]
pub struct QuizResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
}

impl From<QuizDraw> for QuizResponse {
    fn from(draw: QuizDraw) -> Self {
        let question = match draw {
            QuizDraw::Question(q) => Some(q),
            QuizDraw::Exhausted => None,
        };
        QuizResponse {
            success: true,
            question,
        }
    }
}
