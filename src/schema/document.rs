//! Schema documents handed over by the collection front end.
//!
//! Layout:
//!
//! ```json
//! { "<table>": { "<column>": ["<type>", "yes"|"no", "yes"|"no", "<ref table>"|null, "<ref column>"|null] } }
//! ```
//!
//! The second element flags a primary key, the third a foreign key.

use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use super::{ColumnSpec, DatabaseSpec, ForeignKeyRef, TableSpec};

/// File name prefix and extension used for stored documents.
pub const DOCUMENT_PREFIX: &str = "Database";
pub const DOCUMENT_EXTENSION: &str = ".json";

/// `[type, primary key flag, foreign key flag, referenced table, referenced column]`
#[derive(Debug, Deserialize)]
struct RawColumn(String, String, String, Option<String>, Option<String>);

type RawDocument = IndexMap<String, IndexMap<String, RawColumn>>;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed schema document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read schema document: {0}")]
    Io(#[from] std::io::Error),

    #[error("column '{column}' of table '{table}': expected \"yes\" or \"no\", got {value:?}")]
    InvalidFlag {
        table: String,
        column: String,
        value: String,
    },
}

fn parse_flag(table: &str, column: &str, value: &str) -> Result<bool, DocumentError> {
    match value.trim().to_lowercase().as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(DocumentError::InvalidFlag {
            table: table.to_string(),
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Builds a [`DatabaseSpec`] named `database` from a JSON document.
pub fn from_json_str(database: &str, source: &str) -> Result<DatabaseSpec, DocumentError> {
    let raw: RawDocument = serde_json::from_str(source)?;
    let mut spec = DatabaseSpec::new(database);

    for (table_name, columns) in raw {
        let mut table = TableSpec::new(table_name.clone());

        for (column_name, RawColumn(data_type, primary_key, foreign_key, ref_table, ref_column)) in columns
        {
            let mut column = ColumnSpec::new(column_name.clone(), data_type);
            column.primary_key = parse_flag(&table_name, &column_name, &primary_key)?;

            if parse_flag(&table_name, &column_name, &foreign_key)? {
                column.foreign_key = Some(ForeignKeyRef::new(
                    ref_table.unwrap_or_default(),
                    ref_column.unwrap_or_default(),
                ));
            }

            table = table.with_column(column);
        }

        spec = spec.with_table(table);
    }

    Ok(spec)
}

pub fn from_path(database: &str, path: &Path) -> Result<DatabaseSpec, DocumentError> {
    debug!("Loading schema document {}", path.display());
    let source = fs::read_to_string(path)?;
    from_json_str(database, &source)
}

/// Returns the lexicographically last `Database*.json` file in `dir`.
pub fn latest_in_dir(dir: &Path) -> Result<Option<PathBuf>, DocumentError> {
    let mut candidates = vec![];
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(DOCUMENT_PREFIX)
            && name.ends_with(DOCUMENT_EXTENSION)
            && entry.file_type()?.is_file()
        {
            candidates.push(entry.path());
        }
    }

    candidates.sort();
    Ok(candidates.pop())
}
