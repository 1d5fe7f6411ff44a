//! Persistence Adapters
//!
//! Storage implementations of `ProjectionRepositoryPort`.

mod in_memory;

pub use in_memory::InMemoryProjectionRepository;
