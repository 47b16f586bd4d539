use chrono::{DateTime, Utc};
use color_eyre::eyre::eyre;
use sqlx::PgPool;

use crate::domain::{
    AccountId, ChatStore, ChatStoreError, Message, MessageBody, MessageId,
    Room,
};

pub struct PostgresChatStore {
    pool: PgPool,
}

impl PostgresChatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: uuid::Uuid,
    sender_id: uuid::Uuid,
    receiver_id: uuid::Uuid,
    body: String,
    created: DateTime<Utc>,
    modified: Option<DateTime<Utc>>,
}

#[async_trait::async_trait]
impl ChatStore for PostgresChatStore {
    #[tracing::instrument(name = "Adding room to PostgreSQL", skip_all)]
    async fn add_room(&mut self, room: &Room) -> Result<(), ChatStoreError> {
        sqlx::query(
            r#"
            INSERT INTO rooms (id, name, created, modified) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(room.id.as_ref())
        .bind(room.name.as_ref())
        .bind(room.created)
        .bind(room.modified)
        .execute(&self.pool)
        .await
        .map_err(|e| ChatStoreError::UnexpectedError(eyre!(e)))?;
        Ok(())
    }

    #[tracing::instrument(name = "Adding message to PostgreSQL", skip_all)]
    async fn add_message(
        &mut self,
        message: &Message,
    ) -> Result<(), ChatStoreError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, sender_id, receiver_id, body, created, modified)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id.as_ref())
        .bind(message.sender.as_ref())
        .bind(message.receiver.as_ref())
        .bind(message.body.as_ref())
        .bind(message.created)
        .bind(message.modified)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ChatStoreError::MessageAlreadyExists
            }
            err => ChatStoreError::UnexpectedError(eyre!(err)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving messages from PostgreSQL", skip_all)]
    async fn get_messages(
        &self,
        sender: &AccountId,
        receiver: &AccountId,
    ) -> Result<Vec<Message>, ChatStoreError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, sender_id, receiver_id, body, created, modified
            FROM messages
            WHERE sender_id = $1 AND receiver_id = $2
            ORDER BY created
            "#,
        )
        .bind(sender.as_ref())
        .bind(receiver.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ChatStoreError::UnexpectedError(eyre!(e)))?;

        rows.into_iter()
            .map(|row| {
                Ok(Message {
                    id: MessageId::new(row.id),
                    sender: AccountId::new(row.sender_id),
                    receiver: AccountId::new(row.receiver_id),
                    body: MessageBody::parse(row.body)
                        .map_err(|e| ChatStoreError::UnexpectedError(eyre!(e)))?,
                    created: row.created,
                    modified: row.modified,
                })
            })
            .collect()
    }
}
