pub mod extractors;
pub mod handlers;
pub mod requests;
pub mod responses;
pub mod routes;

pub use routes::{create_router, AppState};
