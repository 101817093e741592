//! History log: append-only chat turns per user

use anyhow::Result;
use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::models::{ChatTurn, Role};

/// Chat history repository
#[derive(Clone)]
pub struct HistoryRepository {
    pool: SqlitePool,
}

impl HistoryRepository {
    /// Create a new history repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a single turn
    pub async fn append(&self, user_id: i64, role: Role, message: &str) -> Result<ChatTurn> {
        let turn = insert_turn(&self.pool, user_id, role, message).await?;
        Ok(turn)
    }

    /// Append a question and its answer as one atomic pair
    ///
    /// Either both turns are stored or neither is.
    pub async fn append_exchange(
        &self,
        user_id: i64,
        question: &str,
        answer: &str,
    ) -> Result<(ChatTurn, ChatTurn)> {
        let mut tx = self.pool.begin().await?;

        let asked = insert_turn(&mut *tx, user_id, Role::User, question).await?;
        let answered = insert_turn(&mut *tx, user_id, Role::Assistant, answer).await?;

        tx.commit().await?;
        debug!("Stored exchange {}/{} for user {}", asked.id, answered.id, user_id);

        Ok((asked, answered))
    }

    /// All turns of a user, oldest first
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<ChatTurn>> {
        let turns = sqlx::query_as::<_, ChatTurn>(
            r#"
            SELECT id, user_id, role, message, created_at
            FROM messages
            WHERE user_id = ?1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(turns)
    }
}

async fn insert_turn<'e, E>(
    executor: E,
    user_id: i64,
    role: Role,
    message: &str,
) -> sqlx::Result<ChatTurn>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, ChatTurn>(
        r#"
        INSERT INTO messages (user_id, role, message, created_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, user_id, role, message, created_at
        "#,
    )
    .bind(user_id)
    .bind(role)
    .bind(message)
    .bind(Utc::now())
    .fetch_one(executor)
    .await
}
