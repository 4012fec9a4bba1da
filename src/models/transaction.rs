use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Direction of a ledger record from the owning account's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money left the account. Amount is negative.
    Sent,
    /// Money arrived in the account. Amount is positive.
    Received,
}

impl TransactionType {
    /// Sign applied to the transfer amount for this side.
    pub fn sign(&self) -> i64 {
        match self {
            TransactionType::Sent => -1,
            TransactionType::Received => 1,
        }
    }
}

/// Immutable, append-only ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Shared by the debit and credit halves of one transfer.
    pub transfer_id: Uuid,
    /// Signed amount: negative for a debit, positive for a credit.
    pub amount: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Debit half of a transfer. `amount` is the positive transfer amount.
    pub fn debit(transfer_id: Uuid, account_id: Uuid, amount: i64) -> Self {
        Self::new(transfer_id, account_id, amount, TransactionType::Sent)
    }

    /// Credit half of a transfer. `amount` is the positive transfer amount.
    pub fn credit(transfer_id: Uuid, account_id: Uuid, amount: i64) -> Self {
        Self::new(transfer_id, account_id, amount, TransactionType::Received)
    }

    fn new(transfer_id: Uuid, account_id: Uuid, amount: i64, transaction_type: TransactionType) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            transfer_id,
            amount: transaction_type.sign() * amount,
            transaction_type,
            created_at: Utc::now(),
        }
    }

    pub fn is_debit(&self) -> bool {
        self.transaction_type == TransactionType::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_and_credit_signs() {
        let transfer_id = Uuid::new_v4();
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();

        let debit = TransactionRecord::debit(transfer_id, from, 30);
        let credit = TransactionRecord::credit(transfer_id, to, 30);

        assert_eq!(debit.amount, -30);
        assert_eq!(debit.transaction_type, TransactionType::Sent);
        assert!(debit.is_debit());
        assert_eq!(credit.amount, 30);
        assert_eq!(credit.transaction_type, TransactionType::Received);
        assert_eq!(debit.transfer_id, credit.transfer_id);
        assert_eq!(debit.amount + credit.amount, 0);
    }

    #[test]
    fn test_type_serialization() {
        let json = serde_json::to_string(&TransactionType::Received).unwrap();
        assert_eq!(json, "\"RECEIVED\"");
    }
}
