use crate::config::TransferSettings;
use crate::error::{AppError, Result};
use crate::models::{LockedBalance, TransactionRecord, TransferReceipt, TransferRequest};
use crate::observability::{get_metrics, mask_uuid, LatencyTimer};
use crate::repositories::{AccountRepository, TransactionRepository};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;
use uuid::Uuid;

/// Moves money between two accounts as one all-or-nothing database
/// transaction: lock both rows, check funds, write both balances, append the
/// debit and credit records, commit.
#[derive(Clone)]
pub struct TransferEngine {
    pool: PgPool,
    timeout: Duration,
}

impl TransferEngine {
    pub fn new(pool: PgPool, settings: &TransferSettings) -> Self {
        Self {
            pool,
            timeout: settings.timeout(),
        }
    }

    /// Transfers `amount` minor units from `from_id` to `to_id`.
    ///
    /// Not idempotent: two identical calls perform two independent transfers.
    pub async fn transfer(&self, from_id: Uuid, to_id: Uuid, amount: i64) -> Result<TransferReceipt> {
        self.execute(TransferRequest::new(from_id, to_id, amount)).await
    }

    pub async fn execute(&self, request: TransferRequest) -> Result<TransferReceipt> {
        let timer = LatencyTimer::new();
        let metrics = get_metrics();

        let result = match request.validate() {
            Ok(()) => self.run_with_timeout(request).await,
            Err(e) => Err(e),
        };

        metrics.record_transfer_latency(timer.elapsed_ms());
        match &result {
            Ok(receipt) => {
                metrics.record_transfer_completed();
                tracing::info!(
                    transfer_id = %receipt.transfer_id,
                    from = %mask_uuid(&request.from_id),
                    to = %mask_uuid(&request.to_id),
                    "Transfer committed"
                );
            }
            Err(e) => {
                metrics.record_transfer_failed(e.code());
                tracing::warn!(
                    from = %mask_uuid(&request.from_id),
                    to = %mask_uuid(&request.to_id),
                    reason = e.code(),
                    "Transfer rejected: {}",
                    e
                );
            }
        }

        result
    }

    async fn run_with_timeout(&self, request: TransferRequest) -> Result<TransferReceipt> {
        // Only the pre-commit work is bounded. Dropping a timed-out `prepare`
        // drops its open Transaction, which rolls back.
        let (tx, receipt) = match tokio::time::timeout(self.timeout, self.prepare(request)).await {
            Ok(prepared) => prepared?,
            Err(_) => {
                return Err(AppError::StoreUnavailable(format!(
                    "Transfer timed out after {}ms and was rolled back",
                    self.timeout.as_millis()
                )))
            }
        };

        // Once the writes are staged the outcome is decided by commit alone.
        tx.commit().await.map_err(AppError::store)?;
        Ok(receipt)
    }

    /// Stages the transfer inside an open transaction without committing it.
    async fn prepare(
        &self,
        request: TransferRequest,
    ) -> Result<(Transaction<'static, Postgres>, TransferReceipt)> {
        let mut tx = self.pool.begin().await.map_err(AppError::store)?;

        // Lock both rows in id order; an early return below rolls back on drop.
        let [first, second] = request.lock_order();
        let first_row = AccountRepository::lock_for_update(&mut tx, first).await?;
        let second_row = AccountRepository::lock_for_update(&mut tx, second).await?;
        let locked = [first_row, second_row];

        let from = find_locked(&locked, request.from_id)?;
        let to = find_locked(&locked, request.to_id)?;

        let (from_after, to_after) = request.settle(&from, &to)?;

        let from_balance = AccountRepository::set_balance(&mut tx, from.id, from_after).await?;
        let to_balance = AccountRepository::set_balance(&mut tx, to.id, to_after).await?;

        let transfer_id = Uuid::new_v4();
        let debit = TransactionRepository::append(
            &mut tx,
            &TransactionRecord::debit(transfer_id, from.id, request.amount),
        )
        .await?;
        let credit = TransactionRepository::append(
            &mut tx,
            &TransactionRecord::credit(transfer_id, to.id, request.amount),
        )
        .await?;

        let receipt = TransferReceipt {
            transfer_id,
            from_id: request.from_id,
            to_id: request.to_id,
            amount: request.amount,
            debit,
            credit,
            from_balance,
            to_balance,
        };
        Ok((tx, receipt))
    }
}

fn find_locked(rows: &[Option<LockedBalance>], id: Uuid) -> Result<LockedBalance> {
    rows.iter()
        .flatten()
        .find(|row| row.id == id)
        .copied()
        .ok_or_else(|| AppError::not_found(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_locked_present() {
        let a = LockedBalance { id: Uuid::new_v4(), balance: 10 };
        let b = LockedBalance { id: Uuid::new_v4(), balance: 20 };
        let rows = [Some(a), Some(b)];

        assert_eq!(find_locked(&rows, b.id).unwrap(), b);
        assert_eq!(find_locked(&rows, a.id).unwrap(), a);
    }

    #[test]
    fn test_find_locked_missing_row_is_not_found() {
        let a = LockedBalance { id: Uuid::new_v4(), balance: 10 };
        let missing = Uuid::new_v4();
        let rows = [Some(a), None];

        assert!(matches!(find_locked(&rows, missing), Err(AppError::AccountNotFound(_))));
    }
}
