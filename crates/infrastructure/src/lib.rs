//! Persistence adapters for the application ports.

#![forbid(unsafe_code)]

mod in_memory_preset_repository;
mod postgres_preset_repository;

pub use in_memory_preset_repository::InMemoryPresetRepository;
pub use postgres_preset_repository::PostgresPresetRepository;
