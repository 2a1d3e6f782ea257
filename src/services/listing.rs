use serde::Serialize;

use handle_errors::Error;

use crate::store::QuestionStore;
use crate::types::{
    category::{CategoryId, CategoryMap, category_map},
    pagination::Pagination,
    question::Question,
};

/// `total_questions`는 항상 이 응답의 `questions` 개수다.
/// 페이지가 있는 목록에서는 해당 페이지의 개수, 검색에서는 일치한 전체 개수가 된다.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    pub total_questions: usize,
}

impl From<Vec<Question>> for QuestionPage {
    fn from(questions: Vec<Question>) -> Self {
        QuestionPage {
            total_questions: questions.len(),
            questions,
        }
    }
}

pub async fn list_categories<S: QuestionStore>(store: &S) -> Result<CategoryMap, Error> {
    let categories = store.get_all_categories().await?;
    if categories.is_empty() {
        return Err(Error::NoCategories);
    }
    Ok(category_map(&categories))
}

/// 전체 질문의 한 페이지와 카테고리 맵.
/// 저장소가 비어 있으면 빈 결과가 아니라 NotFound로 처리한다.
pub async fn list_questions<S: QuestionStore>(
    store: &S,
    pagination: Pagination,
) -> Result<(QuestionPage, CategoryMap), Error> {
    let questions = store.get_all_questions().await?;
    if questions.is_empty() {
        return Err(Error::NoQuestions);
    }
    let categories = store.get_all_categories().await?;
    if categories.is_empty() {
        return Err(Error::NoCategories);
    }
    Ok((
        QuestionPage::from(pagination.apply(questions)),
        category_map(&categories),
    ))
}

/// 카테고리 하나의 질문 한 페이지와 그 카테고리의 이름
pub async fn list_by_category<S: QuestionStore>(
    store: &S,
    category: CategoryId,
    pagination: Pagination,
) -> Result<(QuestionPage, Option<String>), Error> {
    let questions = store.filter_by_category(category).await?;
    if questions.is_empty() {
        return Err(Error::CategoryNotFound(category.0));
    }
    let current_category = store
        .get_all_categories()
        .await?
        .into_iter()
        .find(|c| c.id == category)
        .map(|c| c.kind);
    Ok((QuestionPage::from(pagination.apply(questions)), current_category))
}

/// 검색 결과에는 페이지를 매기지 않는다.
pub async fn search<S: QuestionStore>(
    store: &S,
    search_term: Option<&str>,
) -> Result<QuestionPage, Error> {
    let term = match search_term {
        Some(term) if !term.is_empty() => term,
        _ => return Err(Error::MissingParameters("searchTerm")),
    };
    Ok(QuestionPage::from(store.filter_by_text(term).await?))
}
