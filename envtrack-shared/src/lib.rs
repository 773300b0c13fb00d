//! Shared building blocks for the environmental tracker services: the JSON
//! envelope, the error taxonomy, observability middleware and the database pool.

pub mod types;
pub mod errors;
pub mod middleware;
pub mod clients;

pub use types::*;
pub use errors::{AppError, ErrorCode, AppResult};
