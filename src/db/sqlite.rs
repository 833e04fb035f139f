use crate::db::schema::SQLITE_INIT;
use crate::error::ClinicError;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

pub type SqlitePool = Pool<Sqlite>;
pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// A stored row type: one table, an `id` primary key and a fixed column list.
pub trait Record: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    /// Short name used in logs.
    const ENTITY: &'static str;
    const TABLE: &'static str;
    /// Every column except `id`, in insert order.
    const FIELDS: &'static [&'static str];
}

/// A validated record that has not been assigned an id yet.
pub trait NewRecord: Send {
    type Stored: Record;

    /// Bind one value per `Stored::FIELDS` entry, in the same order.
    fn bind_values<'q>(self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;
}

/// Open the store and ensure its tables exist. Any failure here is fatal to startup.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
) -> Result<ClinicStorage, ClinicError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await?;

    let storage = ClinicStorage::new(pool);
    storage.init_schema().await?;
    info!(database_url, "record store ready");
    Ok(storage)
}

#[derive(Clone)]
pub struct ClinicStorage {
    pool: SqlitePool,
}

impl ClinicStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), ClinicError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert one row and return it as stored, including the assigned id.
    pub async fn create<N: NewRecord>(&self, record: N) -> Result<N::Stored, ClinicError> {
        let sql = insert_sql(N::Stored::TABLE, N::Stored::FIELDS);
        let row = record
            .bind_values(sqlx::query(&sql))
            .fetch_one(&self.pool)
            .await?;
        let stored = N::Stored::from_row(&row)?;
        debug!(entity = N::Stored::ENTITY, "record created");
        Ok(stored)
    }

    /// Every row of the record's table, oldest first.
    pub async fn find_all<R: Record>(&self) -> Result<Vec<R>, ClinicError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            column_list(R::FIELDS),
            R::TABLE
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| R::from_row(row).map_err(ClinicError::from))
            .collect()
    }

    pub async fn count<R: Record>(&self) -> Result<i64, ClinicError> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn column_list(fields: &[&str]) -> String {
    std::iter::once("id")
        .chain(fields.iter().copied())
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_sql(table: &str, fields: &[&str]) -> String {
    let placeholders = vec!["?"; fields.len()].join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders}) RETURNING {}",
        fields.join(", "),
        column_list(fields)
    )
}
