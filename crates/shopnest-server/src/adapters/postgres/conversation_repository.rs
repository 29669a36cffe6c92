//! PostgreSQL implementation of ConversationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use shopnest::{AnswerSource, ConversationRecord, ConversationRepository, DomainError};

/// PostgreSQL implementation of ConversationRepository
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ChatRow {
    id: Uuid,
    user_message: String,
    bot_response: String,
    answer_source: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<ChatRow> for ConversationRecord {
    type Error = DomainError;

    fn try_from(row: ChatRow) -> Result<Self, Self::Error> {
        let answer_source = row
            .answer_source
            .parse::<AnswerSource>()
            .map_err(DomainError::Persistence)?;

        Ok(Self {
            id: row.id,
            user_message: row.user_message,
            bot_response: row.bot_response,
            answer_source,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    async fn record(&self, record: &ConversationRecord) -> Result<ConversationRecord, DomainError> {
        let row = sqlx::query_as::<_, ChatRow>(
            r#"
            INSERT INTO chats (id, user_message, bot_response, answer_source, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(&record.user_message)
        .bind(&record.bot_response)
        .bind(record.answer_source.to_string())
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Persistence(e.to_string()))?;

        row.try_into()
    }
}
