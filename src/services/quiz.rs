use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{Level, event};

use handle_errors::Error;

use crate::store::QuestionStore;
use crate::types::{
    category::CategoryId,
    question::{Question, QuestionId},
    quiz::{CategorySelector, QuizDraw},
};

/// "전체" 선택을 어떻게 해석할지
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AllCategoriesMode {
    /// 모든 카테고리의 질문에서 고른다.
    #[default]
    Every,
    /// 예전 동작: 설정된 범위에서 카테고리 하나를 무작위로 골라 그 안에서만 고른다.
    RandomCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Everything,
    Category(CategoryId),
}

#[derive(Debug, Clone)]
pub struct QuizEngine {
    rng: Arc<Mutex<StdRng>>,
    all_categories: AllCategoriesMode,
    category_range: RangeInclusive<i32>,
}

impl QuizEngine {
    pub fn new(
        seed: Option<u64>,
        all_categories: AllCategoriesMode,
        category_range: RangeInclusive<i32>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        QuizEngine {
            rng: Arc::new(Mutex::new(rng)),
            all_categories,
            category_range,
        }
    }

    async fn resolve(&self, selector: CategorySelector) -> Scope {
        match (selector, self.all_categories) {
            (CategorySelector::Category(id), _) => Scope::Category(id),
            (CategorySelector::All, AllCategoriesMode::Every) => Scope::Everything,
            (CategorySelector::All, AllCategoriesMode::RandomCategory) => {
                if self.category_range.is_empty() {
                    event!(Level::WARN, "empty category range, drawing from every category");
                    return Scope::Everything;
                }
                let id = self.rng.lock().await.gen_range(self.category_range.clone());
                event!(Level::DEBUG, category = id, "resolved \"all\" to a random category");
                Scope::Category(CategoryId(id))
            }
        }
    }

    /// 이미 출제된 질문을 제외하고 하나를 무작위로 고른다.
    /// 자격 있는 질문이 하나도 없으면 NotFound, 모두 출제되었으면 `QuizDraw::Exhausted`.
    pub async fn next_question<S: QuestionStore>(
        &self,
        store: &S,
        selector: CategorySelector,
        previous: &HashSet<QuestionId>,
    ) -> Result<QuizDraw, Error> {
        let eligible = match self.resolve(selector).await {
            Scope::Everything => {
                let questions = store.get_all_questions().await?;
                if questions.is_empty() {
                    return Err(Error::NoQuestions);
                }
                questions
            }
            Scope::Category(id) => {
                let questions = store.filter_by_category(id).await?;
                if questions.is_empty() {
                    return Err(Error::CategoryNotFound(id.0));
                }
                questions
            }
        };

        let mut rng = self.rng.lock().await;
        Ok(draw_unseen(eligible, previous, &mut *rng))
    }
}

/// 남은 질문 집합을 한 번만 만들고 그 안에서 균등하게 고르므로
/// `previous`에 오래되었거나 중복된 ID가 있어도 항상 끝난다.
pub fn draw_unseen<R: Rng + ?Sized>(
    eligible: Vec<Question>,
    previous: &HashSet<QuestionId>,
    rng: &mut R,
) -> QuizDraw {
    let mut remaining: Vec<Question> = eligible
        .into_iter()
        .filter(|q| !previous.contains(&q.id))
        .collect();
    if remaining.is_empty() {
        return QuizDraw::Exhausted;
    }
    let index = rng.gen_range(0..remaining.len());
    QuizDraw::Question(remaining.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use handle_errors::ErrorKind;

    fn engine(seed: u64) -> QuizEngine {
        QuizEngine::new(Some(seed), AllCategoriesMode::Every, 1..=6)
    }

    fn drawn(draw: QuizDraw) -> Question {
        match draw {
            QuizDraw::Question(q) => q,
            QuizDraw::Exhausted => panic!("expected a question"),
        }
    }

    #[tokio::test]
    async fn never_repeats_until_exhausted() {
        let store = MemoryStore::bundled().unwrap();
        let quiz = engine(7);
        let selector = CategorySelector::Category(CategoryId(2));
        let mut previous = HashSet::new();
        for _ in 0..4 {
            let q = drawn(quiz.next_question(&store, selector, &previous).await.unwrap());
            assert_eq!(q.category, CategoryId(2));
            assert!(previous.insert(q.id), "question {:?} served twice", q.id);
        }
        let last = quiz.next_question(&store, selector, &previous).await.unwrap();
        assert_eq!(last, QuizDraw::Exhausted);
    }

    #[tokio::test]
    async fn all_categories_walks_whole_corpus() {
        let store = MemoryStore::bundled().unwrap();
        let quiz = engine(42);
        let mut previous = HashSet::new();
        loop {
            match quiz
                .next_question(&store, CategorySelector::All, &previous)
                .await
                .unwrap()
            {
                QuizDraw::Question(q) => assert!(previous.insert(q.id)),
                QuizDraw::Exhausted => break,
            }
        }
        assert_eq!(previous.len(), 19);
    }

    #[tokio::test]
    async fn empty_category_is_not_found() {
        let store = MemoryStore::bundled().unwrap();
        let err = engine(1)
            .next_question(&store, CategorySelector::Category(CategoryId(33)), &HashSet::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn stale_previous_ids_still_terminate() {
        let store = MemoryStore::bundled().unwrap();
        // 스포츠(6)에는 10, 11 두 질문만 있다. 나머지는 다른 카테고리이거나 존재하지 않는 ID다.
        let previous: HashSet<QuestionId> =
            [10, 11, 2, 999, 1000].into_iter().map(QuestionId).collect();
        let draw = engine(3)
            .next_question(&store, CategorySelector::Category(CategoryId(6)), &previous)
            .await
            .unwrap();
        assert_eq!(draw, QuizDraw::Exhausted);

        // 개수는 같지만 실제로 다 덮지 못하면 아직 남은 질문을 준다.
        let previous: HashSet<QuestionId> = [10, 999].into_iter().map(QuestionId).collect();
        let q = drawn(
            engine(3)
                .next_question(&store, CategorySelector::Category(CategoryId(6)), &previous)
                .await
                .unwrap(),
        );
        assert_eq!(q.id, QuestionId(11));
    }

    #[tokio::test]
    async fn same_seed_same_sequence() {
        let store = MemoryStore::bundled().unwrap();
        let (a, b) = (engine(11), engine(11));
        let previous = HashSet::new();
        for _ in 0..5 {
            let x = a.next_question(&store, CategorySelector::All, &previous).await.unwrap();
            let y = b.next_question(&store, CategorySelector::All, &previous).await.unwrap();
            assert_eq!(x, y);
        }
    }

    #[tokio::test]
    async fn legacy_mode_stays_inside_one_random_category() {
        let store = MemoryStore::bundled().unwrap();
        let quiz = QuizEngine::new(Some(5), AllCategoriesMode::RandomCategory, 4..=4);
        for _ in 0..10 {
            let q = drawn(
                quiz.next_question(&store, CategorySelector::All, &HashSet::new())
                    .await
                    .unwrap(),
            );
            assert_eq!(q.category, CategoryId(4));
        }
    }

    #[tokio::test]
    async fn legacy_mode_reports_empty_random_category() {
        let store = MemoryStore::bundled().unwrap();
        let quiz = QuizEngine::new(Some(5), AllCategoriesMode::RandomCategory, 40..=40);
        let err = quiz
            .next_question(&store, CategorySelector::All, &HashSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CategoryNotFound(40)));
    }

    #[test]
    fn draw_unseen_does_not_touch_previous() {
        let mut rng = StdRng::seed_from_u64(9);
        let eligible = vec![Question {
            id: QuestionId(1),
            question: "q".to_string(),
            answer: "a".to_string(),
            difficulty: 1,
            category: CategoryId(1),
        }];
        let previous = HashSet::new();
        let first = draw_unseen(eligible.clone(), &previous, &mut rng);
        assert_eq!(first, QuizDraw::Question(eligible[0].clone()));
        assert!(previous.is_empty());
    }
}
