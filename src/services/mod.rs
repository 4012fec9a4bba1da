pub mod account_service;
pub mod transfer_engine;

pub use account_service::AccountService;
pub use transfer_engine::TransferEngine;
