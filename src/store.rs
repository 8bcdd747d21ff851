use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    socket_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    connected BOOLEAN NOT NULL DEFAULT TRUE
);

CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    from_id TEXT NOT NULL,
    to_id TEXT,
    room TEXT,
    content TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_messages_room ON messages(room, created_at);
CREATE INDEX IF NOT EXISTS idx_messages_pair ON messages(from_id, to_id, created_at);
";

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub id: String,
    pub from_id: String,
    pub to_id: Option<String>,
    pub room: Option<String>,
    pub content: String,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(16)
            .connect(url)
            .await?;
        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    // the peer never supplies a display name, so the socket id doubles as one
    pub async fn upsert_user(&self, socket_id: &str, connected: bool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO users (socket_id,name,connected) VALUES (?,?,?) \
             ON CONFLICT(socket_id) DO UPDATE SET connected=excluded.connected",
        )
        .bind(socket_id)
        .bind(socket_id)
        .bind(connected)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn append_message(
        &self,
        from_id: &str,
        to_id: Option<&str>,
        room: Option<&str>,
        content: &str,
        created_at: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO messages (id,from_id,to_id,room,content,created_at) VALUES (?,?,?,?,?,?)")
            .bind(Uuid::now_v7().to_string())
            .bind(from_id)
            .bind(to_id)
            .bind(room)
            .bind(content)
            .bind(created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn room_history(&self, room: &str) -> Result<Vec<StoredMessage>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id,from_id,to_id,room,content,created_at FROM messages \
             WHERE room=? ORDER BY created_at ASC",
        )
        .bind(room)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn pair_history(&self, a: &str, b: &str) -> Result<Vec<StoredMessage>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id,from_id,to_id,room,content,created_at FROM messages \
             WHERE (from_id=? AND to_id=?) OR (from_id=? AND to_id=?) \
             ORDER BY created_at ASC",
        )
        .bind(a)
        .bind(b)
        .bind(b)
        .bind(a)
        .fetch_all(&self.pool)
        .await
    }
}
