//! This module is responsible for reading, writing and managing the SQLite database that holds
//! the transactions.

mod migrations;

use crate::error::Res;
use crate::model::{CategoryCount, NewTransaction, PageRequest, Transaction};
use crate::store::{Store, TransactionFilter};
use anyhow::{bail, Context};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

const SELECT_TRANSACTIONS: &str =
    "SELECT id, title, description, price, date_of_sale, sold, category FROM transactions";

/// A handle to the SQLite database. Cloning is cheap; clones share the same connection pool.
#[derive(Debug, Clone)]
pub(crate) struct Db {
    pool: SqlitePool,
}

impl Db {
    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the database schema
    /// - Returns a constructed `Db` object for further operations
    pub(crate) async fn init(path: impl AsRef<Path>, max_connections: u32) -> Res<Self> {
        let path = path.as_ref();
        if path.exists() {
            bail!("A database already exists at '{}'", path.display());
        }
        let pool = connect(path, max_connections, true).await?;
        migrations::bootstrap(&pool).await?;
        migrations::run(&pool, 0, migrations::CURRENT_VERSION).await?;
        info!("Created database at {}", path.display());
        Ok(Self { pool })
    }

    /// - Validates that there is a SQLite file at `path`
    /// - Creates a SQLite connection pool
    /// - Updates the database schema with migrations if it is out-of-date
    /// - Returns a constructed `Db` object for further operations
    pub(crate) async fn load(path: impl AsRef<Path>, max_connections: u32) -> Res<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("The database file is missing '{}'", path.display());
        }
        let pool = connect(path, max_connections, false).await?;
        let version = migrations::current_version(&pool).await?;
        if version > migrations::CURRENT_VERSION {
            bail!(
                "The database schema version {version} is newer than this program supports ({})",
                migrations::CURRENT_VERSION
            );
        }
        migrations::run(&pool, version, migrations::CURRENT_VERSION).await?;
        debug!("Loaded database at {}", path.display());
        Ok(Self { pool })
    }

    /// Closes every connection in the pool. Waits for checked-out connections to be returned.
    pub(crate) async fn close(&self) {
        self.pool.close().await;
        debug!("Database connections closed");
    }
}

async fn connect(path: &Path, max_connections: u32, create: bool) -> Res<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .context("Failed to parse SQLite connection string")?
        .create_if_missing(create)
        .journal_mode(SqliteJournalMode::Wal);
    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await
        .with_context(|| format!("Unable to open SQLite database at {}", path.display()))
}

/// Appends the `WHERE` clause for `filter`. User input is always bound, never interpolated.
fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &TransactionFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(month) = filter.month() {
        qb.push(" AND sale_month = ")
            .push_bind(i64::from(month.number()));
    }
    if let Some(sold) = filter.sold() {
        qb.push(" AND sold = ").push_bind(sold);
    }
    if let Some(range) = filter.price_range() {
        qb.push(" AND price IS NOT NULL");
        if let Some(floor) = range.exclusive_floor() {
            qb.push(" AND price > ").push_bind(floor);
        }
        if let Some(ceiling) = range.inclusive_ceiling() {
            qb.push(" AND price <= ").push_bind(ceiling);
        }
    }
    if let Some(search) = filter.search() {
        let pattern = like_pattern(search.term());
        qb.push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR description LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\'");
        if let Some(price) = search.price() {
            qb.push(" OR price = ").push_bind(price);
        }
        qb.push(")");
    }
}

/// Builds a `LIKE` pattern matching any text that contains `term` literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn to_count(n: i64) -> Res<u64> {
    u64::try_from(n).with_context(|| format!("Invalid row count {n}"))
}

/// SQLite integers are signed, so a `LIMIT` or `OFFSET` past `i64::MAX` is clamped to it.
fn to_bound(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[async_trait::async_trait]
impl Store for Db {
    async fn find(
        &self,
        filter: &TransactionFilter,
        page: Option<PageRequest>,
    ) -> Res<Vec<Transaction>> {
        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_TRANSACTIONS);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY id");
        if let Some(page) = page {
            qb.push(" LIMIT ")
                .push_bind(to_bound(page.limit()))
                .push(" OFFSET ")
                .push_bind(to_bound(page.offset()));
        }
        qb.build_query_as::<Transaction>()
            .fetch_all(&self.pool)
            .await
            .context("Unable to select transactions")
    }

    async fn count(&self, filter: &TransactionFilter) -> Res<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM transactions");
        push_filter(&mut qb, filter);
        let n = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .context("Unable to count transactions")?;
        to_count(n)
    }

    async fn sum_price(&self, filter: &TransactionFilter) -> Res<Option<f64>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT SUM(price) FROM transactions");
        push_filter(&mut qb, filter);
        qb.build_query_scalar::<Option<f64>>()
            .fetch_one(&self.pool)
            .await
            .context("Unable to sum transaction prices")
    }

    async fn count_by_category(&self, filter: &TransactionFilter) -> Res<Vec<CategoryCount>> {
        let mut qb =
            QueryBuilder::<Sqlite>::new("SELECT category, COUNT(*) AS count FROM transactions");
        push_filter(&mut qb, filter);
        qb.push(" AND category IS NOT NULL GROUP BY category ORDER BY category");
        let rows = qb
            .build_query_as::<(String, i64)>()
            .fetch_all(&self.pool)
            .await
            .context("Unable to group transactions by category")?;
        rows.into_iter()
            .map(|(category, count)| {
                Ok(CategoryCount {
                    category,
                    count: to_count(count)?,
                })
            })
            .collect()
    }

    async fn replace_all(&self, records: &[NewTransaction]) -> Res<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM transactions")
            .execute(&mut *tx)
            .await
            .context("Unable to clear the transactions table")?;

        for (ix, record) in records.iter().enumerate() {
            sqlx::query(
                "INSERT INTO transactions \
                (id, title, description, price, date_of_sale, sale_month, sold, category) \
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(record.id)
            .bind(&record.title)
            .bind(&record.description)
            .bind(record.price)
            .bind(&record.date_of_sale)
            .bind(record.sale_month().map(|m| i64::from(m.number())))
            .bind(record.sold)
            .bind(&record.category)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Unable to insert record {ix} (id {:?})", record.id))?;
        }

        tx.commit()
            .await
            .context("Failed to commit the transactions")?;
        Ok(records.len() as u64)
    }
}
