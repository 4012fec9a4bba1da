use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{LockedBalance, TransactionRecord};

/// Ephemeral input to the transfer engine. Never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub amount: i64,
}

impl TransferRequest {
    pub fn new(from_id: Uuid, to_id: Uuid, amount: i64) -> Self {
        Self { from_id, to_id, amount }
    }

    /// Checks the preconditions that need no store access.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= 0 {
            return Err(AppError::InvalidInput("Amount must be positive".to_string()));
        }

        if self.from_id == self.to_id {
            return Err(AppError::InvalidInput(
                "Source and destination accounts must be different".to_string(),
            ));
        }

        Ok(())
    }

    /// The two account ids in the order their rows must be locked.
    ///
    /// Every transfer locks the lower id first, so two transfers over the same
    /// pair in opposite directions queue on the same row instead of deadlocking.
    pub fn lock_order(&self) -> [Uuid; 2] {
        if self.from_id <= self.to_id {
            [self.from_id, self.to_id]
        } else {
            [self.to_id, self.from_id]
        }
    }

    /// Computes the post-transfer balances from the locked rows.
    pub fn settle(&self, from: &LockedBalance, to: &LockedBalance) -> Result<(i64, i64)> {
        if from.balance < self.amount {
            return Err(AppError::InsufficientFunds {
                account_id: from.id,
                requested: self.amount,
                available: from.balance,
            });
        }

        let from_after = from.balance - self.amount;
        let to_after = to.balance.checked_add(self.amount).ok_or_else(|| {
            AppError::InvalidInput(format!("Transfer would overflow the balance of '{}'", to.id))
        })?;

        Ok((from_after, to_after))
    }
}

/// Outcome of a committed transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub transfer_id: Uuid,
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub amount: i64,
    pub debit: TransactionRecord,
    pub credit: TransactionRecord,
    pub from_balance: i64,
    pub to_balance: i64,
}
