use serde::{Deserialize, Serialize};

use crate::types::category::{CategoryId, lenient_i32};

#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub answer: String,
    pub difficulty: i32,
    pub category: CategoryId,
}

#[derive(Serialize, Debug, Clone, Copy, Eq, Hash, Deserialize, PartialEq, PartialOrd, Ord)]
pub struct QuestionId(pub i32);

/// `POST /questions` 요청 본문.
/// 텍스트 필드가 빠지면 빈 문자열이 되고, 검증 단계에서 422로 거절된다.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct NewQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(deserialize_with = "lenient_i32")]
    pub difficulty: i32,
    pub category: CategoryId,
}
