use std::future::Future;

use handle_errors::Error;

use crate::types::{
    category::{Category, CategoryId},
    question::{NewQuestion, Question, QuestionId},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// 질문과 카테고리를 보관하는 저장소.
/// 질문은 항상 id 오름차순으로 반환한다. 페이지 매기기가 이 순서에 의존한다.
pub trait QuestionStore: Clone + Send + Sync + 'static {
    fn get_all_questions(&self) -> impl Future<Output = Result<Vec<Question>, Error>> + Send;

    fn get_all_categories(&self) -> impl Future<Output = Result<Vec<Category>, Error>> + Send;

    fn get_by_id(
        &self,
        id: QuestionId,
    ) -> impl Future<Output = Result<Option<Question>, Error>> + Send;

    fn filter_by_category(
        &self,
        category: CategoryId,
    ) -> impl Future<Output = Result<Vec<Question>, Error>> + Send;

    /// 대소문자를 구분하지 않는 부분 문자열 검색
    fn filter_by_text(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<Question>, Error>> + Send;

    fn insert(
        &self,
        new_question: NewQuestion,
    ) -> impl Future<Output = Result<QuestionId, Error>> + Send;

    /// 실제로 삭제된 행이 있으면 true
    fn delete(&self, id: QuestionId) -> impl Future<Output = Result<bool, Error>> + Send;
}
