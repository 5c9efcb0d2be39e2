use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use thiserror::Error;

use crate::models::InteractionKind;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Event types for candidate interactions
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_type", rename_all = "lowercase")]
pub enum EventType {
    Viewed,
    Liked,
    Skipped,
    Contacted,
}

impl From<InteractionKind> for EventType {
    fn from(value: InteractionKind) -> Self {
        match value {
            InteractionKind::Viewed => EventType::Viewed,
            InteractionKind::Liked => EventType::Liked,
            InteractionKind::Skipped => EventType::Skipped,
            InteractionKind::Contacted => EventType::Contacted,
        }
    }
}

/// Record of one user's interaction with a candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeenCandidate {
    pub user_id: String,
    pub target_user_id: String,
    pub event_type: EventType,
    pub seen_at: chrono::DateTime<chrono::Utc>,
}

/// PostgreSQL store of candidate interactions.
///
/// Kept separate from the Supabase project so ranking can exclude
/// already-seen candidates without a round trip through the hosted REST
/// interface on every write.
pub struct InteractionStore {
    pool: PgPool,
}

impl InteractionStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Record that a user interacted with a candidate.
    ///
    /// Uses INSERT ... ON CONFLICT so a later interaction (e.g. liked after
    /// viewed) overwrites the earlier one.
    pub async fn record_seen(
        &self,
        user_id: &str,
        target_user_id: &str,
        event_type: EventType,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO candidate_interactions (user_id, target_user_id, event_type, seen_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, target_user_id)
            DO UPDATE SET
                event_type = EXCLUDED.event_type,
                seen_at = EXCLUDED.seen_at
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(target_user_id)
            .bind(&event_type)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded interaction: {} -> {} ({:?})",
            user_id,
            target_user_id,
            event_type
        );

        Ok(())
    }

    /// Get all candidate ids the given user has already seen, for exclusion
    /// from future ranking results.
    pub async fn get_seen_candidates(&self, user_id: &str) -> Result<Vec<String>, PostgresError> {
        let query = r#"
            SELECT target_user_id
            FROM candidate_interactions
            WHERE user_id = $1
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        let seen_ids: Vec<String> = rows
            .iter()
            .map(|row| row.get("target_user_id"))
            .collect();

        tracing::debug!("User {} has seen {} candidates", user_id, seen_ids.len());

        Ok(seen_ids)
    }

    /// Remove one interaction record (e.g. when a like is withdrawn)
    pub async fn remove_seen(
        &self,
        user_id: &str,
        target_user_id: &str,
    ) -> Result<bool, PostgresError> {
        let query = r#"
            DELETE FROM candidate_interactions
            WHERE user_id = $1 AND target_user_id = $2
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .bind(target_user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clear all interactions for a user
    pub async fn clear_seen(&self, user_id: &str) -> Result<u64, PostgresError> {
        let query = r#"
            DELETE FROM candidate_interactions
            WHERE user_id = $1
        "#;

        let result = sqlx::query(query).bind(user_id).execute(&self.pool).await?;

        tracing::info!(
            "Cleared {} interactions for user {}",
            result.rows_affected(),
            user_id
        );

        Ok(result.rows_affected())
    }

    /// Get statistics about a user's interactions
    pub async fn get_seen_stats(&self, user_id: &str) -> Result<SeenStats, PostgresError> {
        let query = r#"
            SELECT
                COUNT(*) as total_seen,
                COUNT(*) FILTER (WHERE event_type = 'viewed') as viewed,
                COUNT(*) FILTER (WHERE event_type = 'liked') as liked,
                COUNT(*) FILTER (WHERE event_type = 'skipped') as skipped,
                COUNT(*) FILTER (WHERE event_type = 'contacted') as contacted,
                MAX(seen_at) as last_seen_at
            FROM candidate_interactions
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query).bind(user_id).fetch_one(&self.pool).await?;

        Ok(SeenStats {
            user_id: user_id.to_string(),
            total_seen: row.get("total_seen"),
            viewed: row.get("viewed"),
            liked: row.get("liked"),
            skipped: row.get("skipped"),
            contacted: row.get("contacted"),
            last_seen_at: row.get("last_seen_at"),
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Statistics about a user's candidate interactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeenStats {
    pub user_id: String,
    pub total_seen: i64,
    pub viewed: i64,
    pub liked: i64,
    pub skipped: i64,
    pub contacted: i64,
    pub last_seen_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_conversion() {
        let event: EventType = InteractionKind::Contacted.into();
        assert_eq!(format!("{:?}", event), "Contacted");
    }
}
