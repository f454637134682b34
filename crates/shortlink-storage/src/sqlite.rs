use async_trait::async_trait;
use shortlink_core::{
    Alias, MappingStore, ReadStore, Result, StorageError, StoreError, Target, UrlRecord,
};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

const SCHEMA: &str = include_str!("../ddl/sqlite/urls.sql");

/// Value of [`SqliteStoreOptions::database`] that selects a private
/// in-memory database instead of a file.
pub const IN_MEMORY: &str = ":memory:";

/// Connection settings for [`SqliteMappingStore`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct SqliteStoreOptions {
    /// Path of the database file, or [`IN_MEMORY`].
    #[builder(default = "database.db".to_string(), setter(into))]
    database: String,
    #[builder(default = 5)]
    max_connections: u32,
    /// How long an operation waits for a pooled connection.
    #[builder(default = Duration::from_secs(5))]
    acquire_timeout: Duration,
    /// How long a connection waits on a lock held by another writer,
    /// possibly in another process.
    #[builder(default = Duration::from_secs(5))]
    busy_timeout: Duration,
}

impl SqliteStoreOptions {
    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn is_in_memory(&self) -> bool {
        self.database == IN_MEMORY
    }
}

/// SQLite implementation of the mapping store contract.
///
/// Every operation is a single statement on a pooled connection; the
/// connection goes back to the pool when the statement finishes, whether it
/// succeeded or not. Alias uniqueness is enforced by the `UNIQUE` constraint
/// on `urls.alias`, so concurrent inserts of the same alias from any number
/// of handles or processes produce exactly one record.
#[derive(Debug, Clone)]
pub struct SqliteMappingStore {
    pool: SqlitePool,
}

impl SqliteMappingStore {
    /// Creates a store from an existing SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (and if needed creates) the database described by `options`.
    ///
    /// File databases run in WAL mode so readers never block the writer.
    /// The schema is not touched; call [`MappingStore::initialize`] before
    /// the first read or write.
    pub async fn open(options: SqliteStoreOptions) -> Result<Self> {
        let pool = if options.is_in_memory() {
            // Each `:memory:` connection is its own database, so the pool is
            // pinned to one connection that never expires.
            let connect = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(map_sqlx_error)?
                .busy_timeout(options.busy_timeout);

            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .acquire_timeout(options.acquire_timeout)
                .connect_with(connect)
                .await
                .map_err(map_sqlx_error)?
        } else {
            if let Some(parent) = Path::new(&options.database).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StorageError::Unavailable(format!(
                            "cannot create database directory '{}': {e}",
                            parent.display()
                        ))
                    })?;
                }
            }

            let connect = SqliteConnectOptions::new()
                .filename(&options.database)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .busy_timeout(options.busy_timeout);

            SqlitePoolOptions::new()
                .max_connections(options.max_connections)
                .acquire_timeout(options.acquire_timeout)
                .connect_with(connect)
                .await
                .map_err(map_sqlx_error)?
        };

        info!(database = %options.database, "database opened");
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Runs SQLite's integrity check.
    ///
    /// Returns `Err(Storage(InvalidData))` if the file is corrupted.
    pub async fn check_integrity(&self) -> Result<()> {
        let verdict: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if verdict != "ok" {
            warn!(verdict = %verdict, "database integrity check failed");
            return Err(StorageError::InvalidData(format!(
                "integrity check failed: {verdict}"
            ))
            .into());
        }

        debug!("database integrity check passed");
        Ok(())
    }

    /// Closes every pooled connection and waits for them to shut down.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

/// Primary SQLite result codes that mean the file itself is damaged.
const SQLITE_CORRUPT: i32 = 11;
const SQLITE_NOTADB: i32 = 26;

/// Whether SQLite reported the database file as corrupt or not a database.
///
/// sqlx reports extended result codes; the primary code is the low byte.
fn is_damaged_file(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| matches!(code & 0xff, SQLITE_CORRUPT | SQLITE_NOTADB))
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    if is_damaged_file(&err) {
        return StorageError::InvalidData(message);
    }

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Configuration(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_) => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

/// Converts a row into a record, re-checking the alias.
///
/// The file may be shared with other writers, so a row with a blank alias
/// is reported as invalid data rather than handed out.
fn record_from_row(row: &SqliteRow) -> Result<UrlRecord> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let alias: String = row.try_get("alias").map_err(map_sqlx_error)?;
    let target: String = row.try_get("fullname").map_err(map_sqlx_error)?;

    let alias = Alias::new(alias).map_err(|e| {
        StorageError::InvalidData(format!("row {id} has an unusable alias: {e}"))
    })?;

    Ok(UrlRecord { id, alias, target })
}

#[async_trait]
impl ReadStore for SqliteMappingStore {
    async fn get(&self, alias: &Alias) -> Result<Option<UrlRecord>> {
        trace!(alias = %alias, "looking up alias");

        let row = sqlx::query(
            r#"
            SELECT id, alias, fullname
            FROM urls
            WHERE alias = ?
            LIMIT 1
            "#,
        )
        .bind(alias.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn exists(&self, alias: &Alias) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM urls
            WHERE alias = ?
            LIMIT 1
            "#,
        )
        .bind(alias.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn list(&self) -> Result<Vec<UrlRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, alias, fullname
            FROM urls
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(record_from_row).collect()
    }
}

#[async_trait]
impl MappingStore for SqliteMappingStore {
    async fn initialize(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        info!("schema ensured");
        Ok(())
    }

    async fn insert(&self, alias: &Alias, target: &Target) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO urls (alias, fullname)
            VALUES (?, ?)
            "#,
        )
        .bind(alias.as_str())
        .bind(target.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_rowid();
                debug!(alias = %alias, id, "stored mapping");
                Ok(id)
            }
            Err(err) if is_unique_violation(&err) => {
                warn!(alias = %alias, "rejected duplicate alias");
                Err(StoreError::DuplicateAlias(alias.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err).into()),
        }
    }

    async fn delete(&self, alias: &Alias) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM urls
            WHERE alias = ?
            "#,
        )
        .bind(alias.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let deleted = result.rows_affected() > 0;
        debug!(alias = %alias, deleted, "delete mapping");
        Ok(deleted)
    }
}
