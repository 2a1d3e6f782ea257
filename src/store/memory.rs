use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::RwLock;

use handle_errors::Error;

use crate::store::QuestionStore;
use crate::types::{
    category::{Category, CategoryId},
    question::{NewQuestion, Question, QuestionId},
};

/// 데이터베이스 없이 실행할 때 쓰는 기본 트리비아 데이터
const BUNDLED_TRIVIA: &str = include_str!("../../data/trivia.json");

#[derive(Deserialize, Debug, Default)]
pub struct SeedData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    questions: Arc<RwLock<BTreeMap<QuestionId, Question>>>,
    categories: Arc<RwLock<BTreeMap<CategoryId, Category>>>,
    next_id: Arc<AtomicI32>,
}

impl MemoryStore {
    pub fn new(categories: Vec<Category>, questions: Vec<Question>) -> Self {
        // 삭제 후에도 ID가 재사용되지 않도록 가장 큰 ID 다음부터 시작한다.
        // next_id가 i32::MAX에 닿으면 더 이상 ID를 발급하지 않고 insert가 실패한다.
        let next_id = questions
            .iter()
            .map(|q| q.id.0)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        MemoryStore {
            questions: Arc::new(RwLock::new(
                questions.into_iter().map(|q| (q.id, q)).collect(),
            )),
            categories: Arc::new(RwLock::new(
                categories.into_iter().map(|c| (c.id, c)).collect(),
            )),
            next_id: Arc::new(AtomicI32::new(next_id)),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let seed: SeedData = serde_json::from_str(json).map_err(Error::SeedFormatError)?;
        tracing::event!(
            tracing::Level::INFO,
            categories = seed.categories.len(),
            questions = seed.questions.len(),
            "seeding in-memory store"
        );
        Ok(Self::new(seed.categories, seed.questions))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path).map_err(Error::SeedFileError)?;
        Self::from_json(&json)
    }

    pub fn bundled() -> Result<Self, Error> {
        Self::from_json(BUNDLED_TRIVIA)
    }
}

impl QuestionStore for MemoryStore {
    async fn get_all_questions(&self) -> Result<Vec<Question>, Error> {
        Ok(self.questions.read().await.values().cloned().collect())
    }

    async fn get_all_categories(&self) -> Result<Vec<Category>, Error> {
        Ok(self.categories.read().await.values().cloned().collect())
    }

    async fn get_by_id(&self, id: QuestionId) -> Result<Option<Question>, Error> {
        Ok(self.questions.read().await.get(&id).cloned())
    }

    async fn filter_by_category(&self, category: CategoryId) -> Result<Vec<Question>, Error> {
        Ok(self
            .questions
            .read()
            .await
            .values()
            .filter(|q| q.category == category)
            .cloned()
            .collect())
    }

    async fn filter_by_text(&self, term: &str) -> Result<Vec<Question>, Error> {
        let needle = term.to_lowercase();
        Ok(self
            .questions
            .read()
            .await
            .values()
            .filter(|q| q.question.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn insert(&self, new_question: NewQuestion) -> Result<QuestionId, Error> {
        let id = self
            .next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| next.checked_add(1))
            .map(QuestionId)
            .map_err(|_| Error::InvalidInput("no question ids left".to_string()))?;
        let question = Question {
            id,
            question: new_question.question,
            answer: new_question.answer,
            difficulty: new_question.difficulty,
            category: new_question.category,
        };
        self.questions.write().await.insert(id, question);
        Ok(id)
    }

    async fn delete(&self, id: QuestionId) -> Result<bool, Error> {
        Ok(self.questions.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_question(text: &str) -> NewQuestion {
        NewQuestion {
            question: text.to_string(),
            answer: "answer".to_string(),
            difficulty: 1,
            category: CategoryId(1),
        }
    }

    #[tokio::test]
    async fn bundled_data_loads() {
        let store = MemoryStore::bundled().unwrap();
        assert_eq!(store.get_all_questions().await.unwrap().len(), 19);
        assert_eq!(store.get_all_categories().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn questions_come_back_in_id_order() {
        let store = MemoryStore::bundled().unwrap();
        let ids: Vec<i32> = store
            .get_all_questions()
            .await
            .unwrap()
            .iter()
            .map(|q| q.id.0)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn text_filter_ignores_case() {
        let store = MemoryStore::bundled().unwrap();
        assert_eq!(store.filter_by_text("soccer").await.unwrap().len(), 2);
        assert_eq!(store.filter_by_text("SoCcEr").await.unwrap().len(), 2);
        assert!(store.filter_by_text("quidditch").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inserted_ids_keep_increasing_after_delete() {
        let store = MemoryStore::new(Vec::new(), Vec::new());
        let first = store.insert(new_question("one")).await.unwrap();
        assert!(store.delete(first).await.unwrap());
        let second = store.insert(new_question("two")).await.unwrap();
        assert!(second > first);
        assert!(store.get_by_id(first).await.unwrap().is_none());
        assert!(!store.delete(first).await.unwrap());
    }

    #[tokio::test]
    async fn id_space_exhaustion_is_an_error() {
        let last = Question {
            id: QuestionId(i32::MAX),
            question: "last".to_string(),
            answer: "answer".to_string(),
            difficulty: 1,
            category: CategoryId(1),
        };
        let store = MemoryStore::new(Vec::new(), vec![last]);

        let err = store.insert(new_question("overflow")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        let kept = store.get_by_id(QuestionId(i32::MAX)).await.unwrap().unwrap();
        assert_eq!(kept.question, "last");
        assert_eq!(store.get_all_questions().await.unwrap().len(), 1);
    }

    #[test]
    fn malformed_seed_is_rejected() {
        let err = MemoryStore::from_json("{\"questions\": 3}").unwrap_err();
        assert!(matches!(err, Error::SeedFormatError(_)));
    }

    #[test]
    fn missing_seed_file_is_reported() {
        let err = MemoryStore::from_file("/nonexistent/trivia.json").unwrap_err();
        assert!(matches!(err, Error::SeedFileError(_)));
    }
}
