pub mod account;
pub mod transaction;
pub mod transfer;

pub use account::{Account, AccountProfile, LockedBalance};
pub use transaction::{TransactionRecord, TransactionType};
pub use transfer::{TransferReceipt, TransferRequest};
