//! SQLite storage implementation for Tradebook.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the `TradeRepositoryTrait` defined in `tradebook-core` and contains:
//! - Database bootstrap, connection pooling and migrations
//! - The single writer actor that serializes ledger mutations
//! - The trade repository and its Diesel model types
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!      core (domain)
//!            │
//!            ▼
//!  storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod trades;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use trades::TradeRepository;

// Re-export from tradebook-core for convenience
pub use tradebook_core::errors::{DatabaseError, Error, Result};
