use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};

use handle_errors::Error;

use crate::store::QuestionStore;
use crate::types::{
    category::{Category, CategoryId},
    question::{NewQuestion, Question, QuestionId},
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pub connection: PgPool,
}

impl PgStore {
    pub async fn new(db_url: &str) -> Result<Self, Error> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await
            .map_err(|e| {
                tracing::event!(tracing::Level::ERROR, "cannot connect to database: {}", e);
                Error::DatabaseQueryError(e)
            })?;

        Ok(PgStore {
            connection: db_pool,
        })
    }
}

fn question_from_row(row: PgRow) -> Question {
    Question {
        id: QuestionId(row.get("id")),
        question: row.get("question"),
        answer: row.get("answer"),
        difficulty: row.get("difficulty"),
        category: CategoryId(row.get("category")),
    }
}

/// ILIKE 패턴으로 쓰기 전에 %, _ 와 역슬래시를 이스케이프한다.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn query_error(error: sqlx::Error) -> Error {
    tracing::event!(tracing::Level::ERROR, "{:?}", error);
    Error::DatabaseQueryError(error)
}

impl QuestionStore for PgStore {
    async fn get_all_questions(&self) -> Result<Vec<Question>, Error> {
        sqlx::query("SELECT id, question, answer, difficulty, category FROM questions ORDER BY id")
            .map(question_from_row)
            .fetch_all(&self.connection)
            .await
            .map_err(query_error)
    }

    async fn get_all_categories(&self) -> Result<Vec<Category>, Error> {
        sqlx::query("SELECT id, type FROM categories ORDER BY id")
            .map(|row: PgRow| Category {
                id: CategoryId(row.get("id")),
                kind: row.get("type"),
            })
            .fetch_all(&self.connection)
            .await
            .map_err(query_error)
    }

    async fn get_by_id(&self, id: QuestionId) -> Result<Option<Question>, Error> {
        // fetch_optional은 None이나 결과 값 하나를 돌려준다.
        sqlx::query(
            "SELECT id, question, answer, difficulty, category FROM questions WHERE id = $1",
        )
        .bind(id.0)
        .map(question_from_row)
        .fetch_optional(&self.connection)
        .await
        .map_err(query_error)
    }

    async fn filter_by_category(&self, category: CategoryId) -> Result<Vec<Question>, Error> {
        sqlx::query(
            "SELECT id, question, answer, difficulty, category FROM questions
            WHERE category = $1
            ORDER BY id",
        )
        .bind(category.0)
        .map(question_from_row)
        .fetch_all(&self.connection)
        .await
        .map_err(query_error)
    }

    async fn filter_by_text(&self, term: &str) -> Result<Vec<Question>, Error> {
        sqlx::query(
            "SELECT id, question, answer, difficulty, category FROM questions
            WHERE question ILIKE $1
            ORDER BY id",
        )
        .bind(like_pattern(term))
        .map(question_from_row)
        .fetch_all(&self.connection)
        .await
        .map_err(query_error)
    }

    async fn insert(&self, new_question: NewQuestion) -> Result<QuestionId, Error> {
        sqlx::query(
            "INSERT INTO questions (question, answer, difficulty, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id",
        )
        .bind(new_question.question)
        .bind(new_question.answer)
        .bind(new_question.difficulty)
        .bind(new_question.category.0)
        .map(|row: PgRow| QuestionId(row.get("id")))
        .fetch_one(&self.connection)
        .await
        .map_err(query_error)
    }

    async fn delete(&self, id: QuestionId) -> Result<bool, Error> {
        match sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id.0)
            .execute(&self.connection)
            .await
        {
            Ok(result) => Ok(result.rows_affected() > 0),
            Err(error) => Err(query_error(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("soccer"), "%soccer%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn question_category_has_no_foreign_key() {
        // 카테고리 존재 여부는 MutationPolicy가 판단한다.
        let schema = include_str!("../../migrations/20220101000001_questions_table.up.sql");
        assert!(schema.contains("category INTEGER NOT NULL"));
        assert!(!schema.to_uppercase().contains("REFERENCES"));
    }
}
