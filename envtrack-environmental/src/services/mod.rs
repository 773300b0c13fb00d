pub mod pg_store;
pub mod queries;
pub mod store;

#[cfg(test)]
pub mod memory_store;

pub use pg_store::PgStore;
pub use store::{EntryFilter, EnvironmentalStore};
