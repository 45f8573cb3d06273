//! SQLite implementation of the database traits.
//!
//! This module provides a SQLite-backed implementation of the repository
//! traits defined in the parent module.

mod connection;
mod helpers;
mod lease;
mod ownership;
mod post;
mod property;
mod property_unit;
mod transaction;
mod user;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod ownership_test;
#[cfg(test)]
mod user_test;

pub use connection::SqliteDatabase;
pub use lease::SqliteLeaseRepository;
pub use ownership::SqliteOwnershipRepository;
pub use post::SqlitePostRepository;
pub use property::SqlitePropertyRepository;
pub use property_unit::SqlitePropertyUnitRepository;
pub use transaction::SqliteTransactionRepository;
pub use user::SqliteUserRepository;
