/**
 * PostgreSQL Chat Store
 *
 * `ChatStore` backed by the tables created in `migrations/`:
 *
 * - `users` - owned by the surrounding application, read-only here
 * - `rooms` - one row per unordered pair, `UNIQUE(user_low, user_high)`
 * - `chat_messages` - append-only, `seq BIGSERIAL` insertion sequence
 *
 * A unique violation on `rooms` is reported as `StoreError::Conflict` so the
 * room resolver can re-fetch the winner's row.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ChatStore, StoreError, StoreResult};
use crate::shared::messaging::{ChatMessage, NewMessage, PairKey, Room, UserSnapshot};

const MESSAGE_COLUMNS: &str =
    "seq, id, room_id, sender_id, receiver_id, body, attachments, is_read, created_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    full_name: Option<String>,
    image: Option<String>,
    role: String,
    status: String,
    is_subscribed: bool,
    subscription_end: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for UserSnapshot {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt =
            move |e: crate::shared::SharedError| StoreError::Corrupt(format!("user {}: {}", id, e));
        Ok(UserSnapshot {
            id: row.id,
            role: row.role.parse().map_err(corrupt)?,
            status: row.status.parse().map_err(corrupt)?,
            full_name: row.full_name,
            image: row.image,
            is_subscribed: row.is_subscribed,
            subscription_end: row.subscription_end,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RoomRow {
    id: Uuid,
    user_low: Uuid,
    user_high: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<RoomRow> for Room {
    type Error = StoreError;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        let pair = PairKey::new(row.user_low, row.user_high)
            .map_err(|e| StoreError::Corrupt(format!("room {}: {}", row.id, e)))?;
        Ok(Room {
            id: row.id,
            pair,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    seq: i64,
    id: Uuid,
    room_id: Uuid,
    sender_id: Uuid,
    receiver_id: Uuid,
    body: String,
    attachments: Vec<String>,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for ChatMessage {
    fn from(row: MessageRow) -> Self {
        ChatMessage {
            id: row.id,
            seq: row.seq,
            room_id: row.room_id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            body: row.body,
            attachments: row.attachments,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgChatStore {
    pool: PgPool,
}

impl PgChatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ChatStore for PgChatStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<UserSnapshot>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, full_name, image, role, status, is_subscribed, subscription_end
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserSnapshot::try_from).transpose()
    }

    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<UserSnapshot>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, full_name, image, role, status, is_subscribed, subscription_end
             FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserSnapshot::try_from).collect()
    }

    async fn find_room_by_pair(&self, pair: &PairKey) -> StoreResult<Option<Room>> {
        let row: Option<RoomRow> = sqlx::query_as(
            "SELECT id, user_low, user_high, created_at
             FROM rooms WHERE user_low = $1 AND user_high = $2",
        )
        .bind(pair.low())
        .bind(pair.high())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Room::try_from).transpose()
    }

    async fn create_room(&self, pair: &PairKey) -> StoreResult<Room> {
        let result = sqlx::query_as::<_, RoomRow>(
            "INSERT INTO rooms (id, user_low, user_high)
             VALUES ($1, $2, $3)
             RETURNING id, user_low, user_high, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(pair.low())
        .bind(pair.high())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Room::try_from(row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tracing::debug!("[Store] Room for pair {} already exists", pair);
                Err(StoreError::Conflict(*pair))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_rooms_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Room>> {
        let rows: Vec<RoomRow> = sqlx::query_as(
            "SELECT id, user_low, user_high, created_at
             FROM rooms WHERE user_low = $1 OR user_high = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Room::try_from).collect()
    }

    async fn append_message(&self, message: NewMessage) -> StoreResult<ChatMessage> {
        let sql = format!(
            "INSERT INTO chat_messages (id, room_id, sender_id, receiver_id, body, attachments)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            MESSAGE_COLUMNS
        );
        let row: MessageRow = sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(message.room_id)
            .bind(message.sender_id)
            .bind(message.receiver_id)
            .bind(&message.body)
            .bind(&message.attachments)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn list_messages(&self, room_id: Uuid) -> StoreResult<Vec<ChatMessage>> {
        let sql = format!(
            "SELECT {} FROM chat_messages WHERE room_id = $1 ORDER BY created_at ASC, seq ASC",
            MESSAGE_COLUMNS
        );
        let rows: Vec<MessageRow> = sqlx::query_as(&sql)
            .bind(room_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }

    async fn last_message(&self, room_id: Uuid) -> StoreResult<Option<ChatMessage>> {
        let sql = format!(
            "SELECT {} FROM chat_messages WHERE room_id = $1
             ORDER BY created_at DESC, seq DESC LIMIT 1",
            MESSAGE_COLUMNS
        );
        let row: Option<MessageRow> = sqlx::query_as(&sql)
            .bind(room_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ChatMessage::from))
    }

    async fn count_unread(&self, room_id: Uuid, receiver_id: Uuid) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM chat_messages
             WHERE room_id = $1 AND receiver_id = $2 AND NOT is_read",
        )
        .bind(room_id)
        .bind(receiver_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn list_unread(&self, room_id: Uuid, receiver_id: Uuid) -> StoreResult<Vec<ChatMessage>> {
        let sql = format!(
            "SELECT {} FROM chat_messages
             WHERE room_id = $1 AND receiver_id = $2 AND NOT is_read
             ORDER BY created_at ASC, seq ASC",
            MESSAGE_COLUMNS
        );
        let rows: Vec<MessageRow> = sqlx::query_as(&sql)
            .bind(room_id)
            .bind(receiver_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }

    async fn mark_read(&self, room_id: Uuid, receiver_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE chat_messages SET is_read = TRUE
             WHERE room_id = $1 AND receiver_id = $2 AND NOT is_read",
        )
        .bind(room_id)
        .bind(receiver_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
