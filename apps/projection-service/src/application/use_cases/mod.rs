//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod error;
mod get_projection;
mod run_projection;

pub use error::ProjectionError;
pub use get_projection::{DEFAULT_LIST_LIMIT, GetProjectionUseCase, MAX_LIST_LIMIT};
pub use run_projection::{ProjectionSettings, RunProjectionUseCase};
