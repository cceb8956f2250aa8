//! Append-only quotation log backed by SQLite.
//!
//! # Responsibilities
//! - Open the database and create the `quotation` table once at startup
//! - Append one row per persisted quotation, inside its own transaction
//! - Never update or delete rows
//!
//! # Design Decisions
//! - Connection acquisition and the insert race the store deadline; the
//!   commit does not. A write interrupted before commit drops the
//!   transaction, which rolls it back, and a commit once started is reported
//!   as written
//! - Single-row inserts need no locking beyond SQLite's own

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};
use std::str::FromStr;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::quoting::decoder::parse_bid;
use crate::quoting::{PersistedQuotation, Quotation};
use crate::resilience::{bounded, Deadline, Interrupt};
use crate::storage::types::{rejected, unavailable, StoreError, StoreResult};

const INIT_SCRIPT: &str = r#"
CREATE TABLE IF NOT EXISTS quotation (
    id varchar(255) NOT NULL PRIMARY KEY,
    pair varchar(255) NOT NULL,
    code varchar(255),
    codein varchar(255),
    name varchar(255),
    high varchar(255),
    low varchar(255),
    varBid varchar(255),
    pctChange varchar(255),
    bid varchar(255),
    ask varchar(255),
    timestamp varchar(255),
    create_date varchar(255),
    inserted_at varchar(255) NOT NULL
);
"#;

const INSERT: &str = r#"
INSERT INTO quotation
    (id, pair, code, codein, name, high, low, varBid, pctChange, bid, ask, timestamp, create_date, inserted_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Handle to the quotation log. Cheap to clone; clones share one pool.
#[derive(Clone)]
pub struct QuotationStore {
    pool: SqlitePool,
}

impl QuotationStore {
    /// Open the database and run the initialization script.
    pub async fn connect(config: &StorageConfig) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(unavailable)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(unavailable)?;

        sqlx::query(INIT_SCRIPT)
            .execute(&pool)
            .await
            .map_err(unavailable)?;

        tracing::info!(
            database_url = %config.database_url,
            max_connections = config.max_connections,
            "Quotation store initialized"
        );
        Ok(Self { pool })
    }

    /// Append `quotation` under a fresh identifier.
    pub async fn persist(
        &self,
        quotation: &Quotation,
        deadline: Deadline,
        cancel: Option<&CancellationToken>,
    ) -> StoreResult<PersistedQuotation> {
        let record = PersistedQuotation {
            id: Uuid::new_v4(),
            inserted_at: Utc::now(),
            quotation: quotation.clone(),
        };

        let tx = bounded(deadline, cancel, self.stage(&record))
            .await
            .map_err(StoreError::Timeout)??;

        // Last point where the write can still be abandoned.
        if deadline.is_elapsed() {
            return Err(StoreError::Timeout(Interrupt::DeadlineElapsed));
        }
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(StoreError::Timeout(Interrupt::Cancelled));
        }
        tx.commit().await.map_err(rejected)?;

        tracing::debug!(id = %record.id, bid = %record.quotation.bid_text, "Quotation persisted");
        Ok(record)
    }

    /// Open a transaction holding the uncommitted insert.
    async fn stage(&self, record: &PersistedQuotation) -> StoreResult<Transaction<'static, Sqlite>> {
        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        let q = &record.quotation;
        sqlx::query(INSERT)
            .bind(record.id.to_string())
            .bind(&q.pair)
            .bind(&q.code)
            .bind(&q.codein)
            .bind(&q.name)
            .bind(&q.high)
            .bind(&q.low)
            .bind(&q.var_bid)
            .bind(&q.pct_change)
            .bind(&q.bid_text)
            .bind(&q.ask)
            .bind(&q.timestamp)
            .bind(&q.create_date)
            .bind(record.inserted_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(rejected)?;

        Ok(tx)
    }

    /// Number of rows in the log.
    pub async fn count(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotation")
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(count.max(0) as u64)
    }

    /// Look up one row by identifier.
    pub async fn find(&self, id: Uuid) -> StoreResult<Option<PersistedQuotation>> {
        let row = sqlx::query("SELECT * FROM quotation WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;

        row.map(|row| from_row(id, &row)).transpose()
    }

    /// Release all connections.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Quotation store closed");
    }
}

fn from_row(id: Uuid, row: &SqliteRow) -> StoreResult<PersistedQuotation> {
    let text = |column: &str| -> StoreResult<String> {
        row.try_get::<Option<String>, _>(column)
            .map(Option::unwrap_or_default)
            .map_err(unavailable)
    };

    let bid_text = text("bid")?;
    let inserted_at = DateTime::parse_from_rfc3339(&text("inserted_at")?)
        .map_err(|e| StoreError::Unavailable(format!("corrupt inserted_at: {}", e)))?
        .with_timezone(&Utc);

    Ok(PersistedQuotation {
        id,
        inserted_at,
        quotation: Quotation {
            pair: text("pair")?,
            code: text("code")?,
            codein: text("codein")?,
            name: text("name")?,
            high: text("high")?,
            low: text("low")?,
            var_bid: text("varBid")?,
            pct_change: text("pctChange")?,
            bid: parse_bid(&bid_text)
                .map_err(|e| StoreError::Unavailable(format!("corrupt bid in row {}: {}", id, e)))?,
            bid_text,
            ask: text("ask")?,
            timestamp: text("timestamp")?,
            create_date: text("create_date")?,
        },
    })
}
