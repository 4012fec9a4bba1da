use crate::error::{AppError, Result};
use crate::models::TransactionRecord;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Repository for the append-only transaction ledger.
#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends a record inside the caller's transaction.
    pub async fn append(
        conn: &mut PgConnection,
        record: &TransactionRecord,
    ) -> Result<TransactionRecord> {
        let row = sqlx::query_as::<_, TransactionRecord>(
            r#"
            INSERT INTO transactions (id, account_id, transfer_id, amount, type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, account_id, transfer_id, amount, type, created_at
            "#,
        )
        .bind(record.id)
        .bind(record.account_id)
        .bind(record.transfer_id)
        .bind(record.amount)
        .bind(record.transaction_type)
        .bind(record.created_at)
        .fetch_one(&mut *conn)
        .await
        .map_err(AppError::store)?;

        Ok(row)
    }

    /// Returns an account's history in chronological order.
    pub async fn find_by_account(&self, account_id: Uuid) -> Result<Vec<TransactionRecord>> {
        let rows = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT id, account_id, transfer_id, amount, type, created_at
            FROM transactions
            WHERE account_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::store)?;

        Ok(rows)
    }

    /// Returns both halves of a transfer, debit first.
    pub async fn find_by_transfer(&self, transfer_id: Uuid) -> Result<Vec<TransactionRecord>> {
        let rows = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT id, account_id, transfer_id, amount, type, created_at
            FROM transactions
            WHERE transfer_id = $1
            ORDER BY amount ASC
            "#,
        )
        .bind(transfer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::store)?;

        Ok(rows)
    }

    /// Sum of every signed amount recorded against an account.
    pub async fn sum_for_account(&self, account_id: Uuid) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT
            FROM transactions
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::store)?;

        Ok(row.0)
    }

    /// Counts ledger rows for an account.
    pub async fn count_for_account(&self, account_id: Uuid) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM transactions
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::store)?;

        Ok(row.0)
    }
}
