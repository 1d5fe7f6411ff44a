//! Shared value objects.

mod identifiers;
mod symbol;

pub use identifiers::ProjectionId;
pub use symbol::Symbol;
