pub mod document;
pub mod model;

pub use model::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("duplicate table '{table}'")]
    DuplicateTable { table: String },

    #[error("a {layout} database cannot have {tables} table(s)")]
    Layout {
        layout: DatabaseLayout,
        tables: usize,
    },
}
