//! Core library for Sowgate.
//!
//! This crate provides the domain models, database operations and the SOW
//! approval workflow engine, independent of any transport layer (HTTP, CLI).
//!
//! # Usage
//!
//! ```no_run
//! use sowgate_core::db::Database;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let sows = db.list_sows()?;
//! # Ok::<(), sowgate_core::Error>(())
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod workflow;

// Re-export commonly used types at crate root
pub use db::Database;
pub use error::{Error, Result};
