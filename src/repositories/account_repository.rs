use crate::error::{AppError, Result};
use crate::models::{Account, LockedBalance};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Repository for Account CRUD operations and the row-level primitives the
/// transfer engine runs inside its transaction.
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new account in the database.
    pub async fn create(&self, account: &Account) -> Result<Account> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, first_name, last_name, email, password_hash, balance, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, first_name, last_name, email, password_hash, balance, created_at
            "#,
        )
        .bind(account.id)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.balance)
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::store)?;

        Ok(row)
    }

    /// Finds an account by its UUID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, balance, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::store)?;

        Ok(row)
    }

    /// Finds an account by its (unique) email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, balance, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::store)?;

        Ok(row)
    }

    /// Lists all accounts, oldest first.
    pub async fn list(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, balance, created_at
            FROM accounts
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::store)?;

        Ok(rows)
    }

    /// Reads only the balance column.
    pub async fn find_balance(&self, id: Uuid) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT balance FROM accounts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::store)?;

        Ok(row.map(|r| r.0))
    }

    /// Hard-deletes an account. Returns false when no row matched.
    ///
    /// The DELETE waits on the row lock of any in-flight transfer touching the
    /// account.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM accounts WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::store)?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks if an account exists by email.
    pub async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::store)?;

        Ok(row.0)
    }

    /// Locks an account row for the rest of the enclosing transaction.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<LockedBalance>> {
        let row = sqlx::query_as::<_, LockedBalance>(
            r#"
            SELECT id, balance
            FROM accounts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::store)?;

        Ok(row)
    }

    /// Writes the new balance of a row already locked by `lock_for_update`.
    pub async fn set_balance(conn: &mut PgConnection, id: Uuid, balance: i64) -> Result<i64> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE accounts
            SET balance = $2
            WHERE id = $1
            RETURNING balance
            "#,
        )
        .bind(id)
        .bind(balance)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::store)?;

        row.map(|r| r.0).ok_or_else(|| AppError::not_found(id))
    }
}
