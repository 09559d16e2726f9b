//! Repository Module
//!
//! Provides the persistence operations for the SurrealDB tables.
//! Nested-field mutations (cart entries, the payment sub-record) are
//! field-scoped `UPDATE ... SET` statements, never whole-document rewrites.

pub mod food;
pub mod order;
pub mod user;

// Re-exports
pub use food::FoodRepository;
pub use order::OrderRepository;
pub use user::UserRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("{0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse an id in "table:key" or bare "key" form into a RecordId for the
/// given table. Rejects ids naming a different table.
pub fn parse_id(table: &str, id: &str) -> RepoResult<RecordId> {
    if let Some((t, key)) = id.split_once(':') {
        if t != table {
            return Err(RepoError::Validation(format!(
                "Expected {table} id, got {id}"
            )));
        }
        // Strip Surreal's angle-bracket/backtick key quoting if present
        let key = key
            .trim_start_matches(['⟨', '`'])
            .trim_end_matches(['⟩', '`']);
        Ok(RecordId::from_table_key(table, key))
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_both_forms() {
        let a = parse_id("user", "user:abc").unwrap();
        let b = parse_id("user", "abc").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "user:abc");
    }

    #[test]
    fn parse_id_rejects_wrong_table() {
        assert!(parse_id("user", "order:abc").is_err());
    }
}
