//! SQLite-backed save storage.

use async_trait::async_trait;
use branchline_domain::SaveGame;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, RepoError, SaveRepo};

/// Row key of the single save slot.
const SAVE_KEY: &str = "save";

/// SQLite implementation for the local save game.
pub struct SqliteSaveRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteSaveRepo {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("save_state", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS save_state (
                key TEXT PRIMARY KEY,
                value_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("save_state", e))?;

        Ok(Self { pool, clock })
    }
}

#[async_trait]
impl SaveRepo for SqliteSaveRepo {
    async fn load(&self) -> Result<Option<SaveGame>, RepoError> {
        let row = sqlx::query("SELECT value_json FROM save_state WHERE key = ?")
            .bind(SAVE_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("load_save", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("value_json");
                let save = serde_json::from_str(&json).map_err(RepoError::serialization)?;
                Ok(Some(save))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, save: &SaveGame) -> Result<(), RepoError> {
        let json = serde_json::to_string(save).map_err(RepoError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO save_state (key, value_json, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value_json = excluded.value_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(SAVE_KEY)
        .bind(json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_save", e))?;

        Ok(())
    }
}
