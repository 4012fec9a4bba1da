use crate::auth::hash_password;
use crate::config::{BankSettings, Settings};
use crate::error::{AppError, Result};
use crate::models::{Account, AccountProfile, TransactionRecord};
use crate::observability::{get_metrics, mask_email};
use crate::repositories::{AccountRepository, TransactionRepository};
use sqlx::PgPool;
use uuid::Uuid;

const DEFAULT_STARTING_BALANCE: i64 = 100;
const DEFAULT_PASSWORD_COST: u32 = 10;
const MAX_NAME_LEN: usize = 50;
const MAX_EMAIL_LEN: usize = 255;

/// Service for account management operations.
///
/// Never writes a balance after creation; that belongs to the transfer engine.
#[derive(Clone)]
pub struct AccountService {
    account_repo: AccountRepository,
    transaction_repo: TransactionRepository,
    starting_balance: i64,
    password_cost: u32,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            account_repo: AccountRepository::new(pool.clone()),
            transaction_repo: TransactionRepository::new(pool),
            starting_balance: DEFAULT_STARTING_BALANCE,
            password_cost: DEFAULT_PASSWORD_COST,
        }
    }

    pub fn from_settings(pool: PgPool, settings: &Settings) -> Self {
        Self::new(pool)
            .with_starting_balance(settings.accounts.starting_balance)
            .with_password_cost(settings.auth.password_cost)
    }

    pub fn with_starting_balance(mut self, balance: i64) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Sets the bcrypt cost used for new password hashes.
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    /// Registers a new account with the configured starting balance.
    pub async fn create(&self, profile: AccountProfile) -> Result<Account> {
        self.create_with_balance(profile, self.starting_balance).await
    }

    async fn create_with_balance(&self, profile: AccountProfile, balance: i64) -> Result<Account> {
        validate_profile(&profile)?;

        let email = profile.email.trim().to_string();
        if self.account_repo.exists_by_email(&email).await? {
            return Err(AppError::Conflict(format!(
                "Account with email '{}' already exists",
                email
            )));
        }

        let account = Account::new(
            profile.first_name.trim().to_string(),
            profile.last_name.trim().to_string(),
            email,
            hash_password(&profile.password, self.password_cost)?,
            balance,
        );

        // The unique index still catches a concurrent registration of the same email.
        let created = self.account_repo.create(&account).await?;

        get_metrics().record_account_created();
        tracing::info!(account_id = %created.id, email = %mask_email(&created.email), "Account created");

        Ok(created)
    }

    /// Finds an account by its UUID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Account> {
        self.account_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(id))
    }

    /// Finds an account by email.
    pub async fn get_by_email(&self, email: &str) -> Result<Account> {
        self.account_repo
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| {
                AppError::AccountNotFound(format!("Account with email '{}' not found", email))
            })
    }

    /// Deletes an account. Deleting an id that does not exist is an error.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.account_repo.delete(id).await? {
            return Err(AppError::not_found(id));
        }

        get_metrics().record_account_deleted();
        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<Account>> {
        self.account_repo.list().await
    }

    pub async fn get_balance(&self, id: Uuid) -> Result<i64> {
        self.account_repo
            .find_balance(id)
            .await?
            .ok_or_else(|| AppError::not_found(id))
    }

    /// Returns the account's ledger, oldest record first.
    pub async fn get_history(&self, id: Uuid) -> Result<Vec<TransactionRecord>> {
        // Verify account exists
        self.get_by_id(id).await?;

        self.transaction_repo.find_by_account(id).await
    }

    /// Creates the house account unless an account with its email exists.
    pub async fn ensure_bank_account(&self, bank: &BankSettings) -> Result<Account> {
        if let Some(existing) = self.account_repo.find_by_email(&bank.email).await? {
            tracing::info!(account_id = %existing.id, "Bank account already exists");
            return Ok(existing);
        }

        let profile = AccountProfile {
            first_name: bank.first_name.clone(),
            last_name: bank.last_name.clone(),
            email: bank.email.clone(),
            password: bank.password.clone(),
        };

        match self.create_with_balance(profile, bank.initial_balance).await {
            Ok(account) => Ok(account),
            // Another instance seeded it between our lookup and insert.
            Err(AppError::Conflict(_)) => self.get_by_email(&bank.email).await,
            Err(e) => Err(e),
        }
    }
}

/// Field checks that need no store access.
pub fn validate_profile(profile: &AccountProfile) -> Result<()> {
    let first_name = profile.first_name.trim();
    let last_name = profile.last_name.trim();
    let email = profile.email.trim();

    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::InvalidInput("First and last name are required".to_string()));
    }

    if first_name.chars().count() > MAX_NAME_LEN || last_name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::InvalidInput(format!(
            "Names cannot exceed {} characters",
            MAX_NAME_LEN
        )));
    }

    let well_formed = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains('@'))
        .unwrap_or(false);
    if !well_formed || email.len() > MAX_EMAIL_LEN {
        return Err(AppError::InvalidInput(format!("Invalid email '{}'", email)));
    }

    if profile.password.is_empty() {
        return Err(AppError::InvalidInput("Password cannot be empty".to_string()));
    }

    Ok(())
}
