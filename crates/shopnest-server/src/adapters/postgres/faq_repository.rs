//! PostgreSQL implementation of FaqRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use shopnest::{DomainError, FaqEntry, FaqRepository};

/// PostgreSQL implementation of FaqRepository
pub struct PgFaqRepository {
    pool: PgPool,
}

impl PgFaqRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct FaqRow {
    id: Uuid,
    question: String,
    answer: String,
}

impl From<FaqRow> for FaqEntry {
    fn from(row: FaqRow) -> Self {
        Self {
            id: row.id,
            question: row.question,
            answer: row.answer,
        }
    }
}

#[async_trait]
impl FaqRepository for PgFaqRepository {
    async fn find_matching(&self, query: &str) -> Result<Option<FaqEntry>, DomainError> {
        if query.is_empty() {
            return Ok(None);
        }

        // strpos keeps the query literal; see FaqEntry::matches
        let row = sqlx::query_as::<_, FaqRow>(
            r#"
            SELECT id, question, answer FROM faqs
            WHERE question <> ''
              AND (strpos(lower(question), lower($1)) > 0
                   OR strpos(lower($1), lower(question)) > 0)
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(query)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }
}
