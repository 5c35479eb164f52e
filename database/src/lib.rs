//! Local stand-in for the hosted backend: profiles, solved problems and the
//! points derived from them, plus a realtime feed of solved-problem inserts.

use chrono::Utc;
use codefeed_core::{BackendError, CoreError, Difficulty, ProblemSolved, SessionContext};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tokio::sync::broadcast;
use tracing::{debug, info};

#[cfg(test)]
mod tests;

const SOLVED_CHANNEL_CAPACITY: usize = 64;

/// A row inserted into `solved_problems`, as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedNotification {
    pub user_id: String,
    pub post_id: String,
    pub difficulty: Difficulty,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub display_name: String,
    pub points: u32,
    pub solved: u32,
}

#[derive(Debug, Clone)]
pub struct Database {
    connection_string: String,
    pool: Option<SqlitePool>,
    solved_tx: broadcast::Sender<SolvedNotification>,
}

fn backend_error(error: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.message().contains("database is locked") {
            return BackendError::DatabaseLocked.into();
        }
    }
    BackendError::Sql(error).into()
}

impl Database {
    pub fn new(connection_string: String) -> Self {
        let (solved_tx, _) = broadcast::channel(SOLVED_CHANNEL_CAPACITY);
        Self {
            connection_string,
            pool: None,
            solved_tx,
        }
    }

    pub async fn connect(&mut self) -> Result<(), CoreError> {
        let options = SqliteConnectOptions::from_str(&self.connection_string)
            .map_err(|e| BackendError::ConnectionFailed {
                reason: e.to_string(),
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| BackendError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        info!("Connected to database at {}", self.connection_string);
        self.pool = Some(pool);
        Ok(())
    }

    fn pool(&self) -> Result<&SqlitePool, CoreError> {
        self.pool.as_ref().ok_or_else(|| {
            BackendError::ConnectionFailed {
                reason: "database not connected".to_string(),
            }
            .into()
        })
    }

    pub async fn run_migrations(&self) -> Result<(), CoreError> {
        sqlx::migrate!("./migrations")
            .run(self.pool()?)
            .await
            .map_err(|e| BackendError::MigrationFailed {
                migration: e.to_string(),
            })?;
        debug!("Migrations applied");
        Ok(())
    }

    /// Creates the profile for the session user, or refreshes its display name.
    pub async fn upsert_profile(&self, session: &SessionContext) -> Result<(), CoreError> {
        sqlx::query(
            "INSERT INTO profiles (user_id, display_name, created_at) VALUES (?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET display_name = excluded.display_name",
        )
        .bind(&session.user_id)
        .bind(&session.display_name)
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool()?)
        .await
        .map_err(backend_error)?;
        Ok(())
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<SessionContext, CoreError> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT user_id, display_name FROM profiles WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(self.pool()?)
                .await
                .map_err(backend_error)?;

        row.map(|(user_id, display_name)| SessionContext {
            user_id,
            display_name,
        })
        .ok_or_else(|| {
            BackendError::ProfileNotFound {
                user_id: user_id.to_string(),
            }
            .into()
        })
    }

    /// Stores a solved problem and returns the user's new points total.
    ///
    /// Points are awarded once per user and problem; later accepted solutions
    /// for the same problem leave the total unchanged and notify nobody.
    pub async fn record_solved(&self, event: &ProblemSolved) -> Result<u32, CoreError> {
        self.get_profile(&event.user_id).await?;

        let points = event.difficulty.points();
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO solved_problems (user_id, post_id, difficulty, points, solved_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&event.user_id)
        .bind(&event.post_id)
        .bind(event.difficulty.label())
        .bind(i64::from(points))
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool()?)
        .await
        .map_err(backend_error)?
        .rows_affected()
            > 0;

        if inserted {
            info!(
                "User {} solved {} problem {} (+{} points)",
                event.user_id, event.difficulty, event.post_id, points
            );
            // No receivers is fine
            let _ = self.solved_tx.send(SolvedNotification {
                user_id: event.user_id.clone(),
                post_id: event.post_id.clone(),
                difficulty: event.difficulty,
                points,
            });
        } else {
            debug!(
                "Problem {} already counted for user {}",
                event.post_id, event.user_id
            );
        }

        self.points_total(&event.user_id).await
    }

    /// Realtime notifications for every newly inserted solved problem.
    pub fn subscribe_solved(&self) -> broadcast::Receiver<SolvedNotification> {
        self.solved_tx.subscribe()
    }

    pub async fn points_total(&self, user_id: &str) -> Result<u32, CoreError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(points), 0) FROM solved_problems WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(self.pool()?)
        .await
        .map_err(backend_error)?;
        Ok(u32::try_from(total).unwrap_or(u32::MAX))
    }

    /// Users ordered by points, highest first; ties broken by name.
    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, CoreError> {
        let rows: Vec<(String, String, i64, i64)> = sqlx::query_as(
            "SELECT p.user_id, p.display_name,
                    COALESCE(SUM(s.points), 0) AS points,
                    COUNT(s.id) AS solved
             FROM profiles p
             LEFT JOIN solved_problems s ON s.user_id = p.user_id
             GROUP BY p.user_id, p.display_name
             ORDER BY points DESC, p.display_name ASC
             LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool()?)
        .await
        .map_err(backend_error)?;

        Ok(rows
            .into_iter()
            .map(|(user_id, display_name, points, solved)| LeaderboardEntry {
                user_id,
                display_name,
                points: u32::try_from(points).unwrap_or(u32::MAX),
                solved: u32::try_from(solved).unwrap_or(u32::MAX),
            })
            .collect())
    }
}
