use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A bank customer and their single balance.
///
/// Users and accounts are one entity: the identity fields and the balance
/// live on the same row, so a transfer only ever has to lock account rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Opaque password digest. Never leaves the service.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Balance in currency minor units.
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account with a freshly assigned id.
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
        balance: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            password_hash,
            balance,
            created_at: Utc::now(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Owner identity fields supplied at registration.
#[derive(Debug, Clone)]
pub struct AccountProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Row shape returned when a transfer locks an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct LockedBalance {
    pub id: Uuid,
    pub balance: i64,
}
