pub mod account_repository;
pub mod transaction_repository;

pub use account_repository::AccountRepository;
pub use transaction_repository::TransactionRepository;
