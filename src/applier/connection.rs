//! The seam between the applier and a database engine.
//!
//! Engines report failures as [`SQLError`] with a structured [`ErrorKind`],
//! so callers never inspect message text to tell faults apart.
//!
//! [`ErrorKind`]: crate::core::ErrorKind

use crate::{catalog::Catalog, core::SQLError};

/// Read-only view of what a database already contains.
pub trait LiveCatalog {
    fn table_exists(&mut self, database: &str, table: &str) -> Result<bool, SQLError>;

    fn column_exists(&mut self, database: &str, table: &str, column: &str)
        -> Result<bool, SQLError>;
}

/// An exclusively owned session with an engine. Dropping it releases it.
pub trait Connection: LiveCatalog {
    /// Executes one statement. An object that is already present must be
    /// reported with `ErrorKind::DuplicateObject`.
    fn execute(&mut self, sql: &str) -> Result<(), SQLError>;

    fn database_exists(&mut self, database: &str) -> Result<bool, SQLError>;
}

pub trait Connector {
    type Connection: Connection;

    fn connect(&self) -> Result<Self::Connection, SQLError>;
}

/// A catalog snapshot answers lookups the way `information_schema` does: an
/// unknown database simply has no tables.
impl LiveCatalog for Catalog {
    fn table_exists(&mut self, database: &str, table: &str) -> Result<bool, SQLError> {
        if !self.exists_database(database) {
            return Ok(false);
        }
        Ok(self.find_table_by_name(database, table)?.is_some())
    }

    fn column_exists(
        &mut self,
        database: &str,
        table: &str,
        column: &str,
    ) -> Result<bool, SQLError> {
        if !self.exists_database(database) {
            return Ok(false);
        }
        Ok(self
            .find_table_by_name(database, table)?
            .map_or(false, |table| table.find_column(column).is_some()))
    }
}
