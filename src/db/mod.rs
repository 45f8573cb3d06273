//! Database abstraction layer.
//!
//! This module provides trait-based abstractions for data access,
//! allowing different storage backends to be swapped without changing
//! business logic.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities (User, Post, Property, PropertyUnit,
//!   PropertyOwnership, RentalLease, Transaction)
//! - `money`: Fixed-point decimal amounts
//! - `upload`: File reference namespaces
//! - `repository`: Trait definitions for data access
//! - `sqlite`: SQLite implementation

mod error;
mod models;
mod money;
mod repository;
pub mod sqlite;
pub mod upload;
pub mod utils;


pub use error::{DbError, DbResult};
pub use models::*;
pub use money::{Money, MoneyError};
pub use repository::*;
pub use sqlite::SqliteDatabase;
