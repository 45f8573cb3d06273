//! Database error types.
//!
//! This module provides abstracted error types for database operations.
//! It uses miette for fancy diagnostic output and thiserror for derive macros.
//! The error types are storage-backend agnostic.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Entity not found: {entity_type} with id '{id}'")]
    #[diagnostic(code(estate::db::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("Validation error on '{field}': {message}")]
    #[diagnostic(code(estate::db::validation_error))]
    Validation { field: String, message: String },

    #[error("Constraint violation on '{field}': {message}")]
    #[diagnostic(code(estate::db::constraint))]
    Constraint { field: String, message: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(estate::db::database_error))]
    Database { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(estate::db::migration_error))]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(code(estate::db::connection_error))]
    Connection { message: String },
}

impl DbError {
    pub fn not_found(entity_type: &str, id: &str) -> Self {
        DbError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        DbError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn constraint(field: &str, message: impl Into<String>) -> Self {
        DbError::Constraint {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Name of the offending field, for validation and constraint failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            DbError::Validation { field, .. } | DbError::Constraint { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
