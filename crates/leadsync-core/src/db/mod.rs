//! Storage layer for leadsync

mod connection;
mod memory;
mod migrations;
mod repository;

pub use connection::Database;
pub use memory::MemoryLeadStore;
pub use repository::{LeadStore, SqliteLeadStore};
