//! Game state storage for Shadow Roll.
//!
//! This crate provides a trait-based abstraction over the game database:
//! the character catalog, per-user inventories and balances, and the four
//! bonus-source tables feeding the core aggregator. One synchronous SQLite
//! implementation backs the CLI.
//!
//! # Example
//!
//! ```no_run
//! use shadowroll_db::{CatalogFilter, GameRepository, SqliteDb};
//!
//! let db = SqliteDb::open("shadowroll.db").unwrap();
//! db.init().unwrap();
//!
//! let characters = db.list_characters(&CatalogFilter::default()).unwrap();
//! ```

pub mod repository;
pub mod shared;
pub mod sqlite;
pub mod types;

// Re-export types
pub use types::*;

// Re-export the repository trait
pub use repository::{GameRepository, RepoError, RepoResult};

// Re-export the implementation
pub use sqlite::{SqliteDb, DEFAULT_DB_PATH};
