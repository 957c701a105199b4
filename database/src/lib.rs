//! Durable like counters, one row per liked post, backed by SQLite.
//!
//! A post without a row has zero likes. Rows are created on the first like,
//! incremented in place afterwards and never deleted.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use jokes_core::{CoreError, DatabaseError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, info};


const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Ids bound per `IN (...)` lookup; SQLite builds older than 3.32 cap a
/// statement at 999 variables.
const MAX_IDS_PER_QUERY: usize = 900;

#[derive(Debug, Clone)]
pub struct Database {
    connection_string: String,
    max_connections: u32,
    pool: Option<SqlitePool>,
}

impl Database {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            max_connections: 5,
            pool: None,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    /// Opens the pool, creating the database file if it does not exist yet.
    pub async fn connect(&mut self) -> Result<(), CoreError> {
        let options = SqliteConnectOptions::from_str(&self.connection_string)
            .map_err(|e| DatabaseError::ConnectionFailed {
                reason: e.to_string(),
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        // every connection to an in-memory database sees its own empty database
        let in_memory = is_in_memory(&self.connection_string);
        let mut pool_options = SqlitePoolOptions::new();
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            pool_options.max_connections(self.max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        info!(url = %self.connection_string, "Connected to like counter database");
        self.pool = Some(pool);
        Ok(())
    }

    pub async fn run_migrations(&self) -> Result<(), CoreError> {
        sqlx::migrate!()
            .run(self.pool()?)
            .await
            .map_err(|e| DatabaseError::MigrationFailed {
                migration: e.to_string(),
            })?;

        debug!("Like counter migrations applied");
        Ok(())
    }

    /// Current like count of `post_id`, zero if it was never liked.
    pub async fn like_count(&self, post_id: i64) -> Result<i64, CoreError> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT like_count FROM likes WHERE post_id = ?")
                .bind(post_id)
                .fetch_optional(self.pool()?)
                .await
                .map_err(DatabaseError::from_sqlx)?;

        Ok(count.unwrap_or(0))
    }

    /// Like counts for every id in `post_ids` that has a row.
    ///
    /// Ids that were never liked are absent from the map. Long id lists are
    /// looked up in chunks so the statement stays within SQLite's variable limit.
    pub async fn like_counts(&self, post_ids: &[i64]) -> Result<HashMap<i64, i64>, CoreError> {
        let pool = self.pool()?;
        let mut counts = HashMap::new();

        for chunk in post_ids.chunks(MAX_IDS_PER_QUERY) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("SELECT post_id, like_count FROM likes WHERE post_id IN (");
            let mut ids = builder.separated(", ");
            for post_id in chunk {
                ids.push_bind(*post_id);
            }
            ids.push_unseparated(")");

            let rows: Vec<(i64, i64)> = builder
                .build_query_as()
                .fetch_all(pool)
                .await
                .map_err(DatabaseError::from_sqlx)?;
            counts.extend(rows);
        }

        Ok(counts)
    }

    /// Adds one like to `post_id` and returns the new total.
    ///
    /// The read, increment and write happen in a single upsert statement inside
    /// a transaction, so concurrent likes on the same post are never lost.
    pub async fn increment_like(&self, post_id: i64) -> Result<i64, CoreError> {
        let mut tx = self
            .pool()?
            .begin()
            .await
            .map_err(DatabaseError::from_sqlx)?;

        let new_count: i64 = sqlx::query_scalar(
            "INSERT INTO likes (post_id, like_count) VALUES (?, 1) \
             ON CONFLICT(post_id) DO UPDATE SET like_count = like_count + 1 \
             RETURNING like_count",
        )
        .bind(post_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        tx.commit().await.map_err(|e| match DatabaseError::from_sqlx(e) {
            DatabaseError::Sql(e) => DatabaseError::TransactionFailed {
                reason: e.to_string(),
            },
            other => other,
        })?;

        debug!(post_id, like_count = new_count, "Recorded like");
        Ok(new_count)
    }

    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("Closed like counter database");
        }
    }

    fn pool(&self) -> Result<&SqlitePool, DatabaseError> {
        self.pool.as_ref().ok_or_else(|| DatabaseError::ConnectionFailed {
            reason: "database not connected".to_string(),
        })
    }
}

/// True for URLs whose connections each see a private in-memory database.
fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
