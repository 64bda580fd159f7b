use log::debug;
use thiserror::Error;

use super::ddl;
use crate::{
    applier::{connection::LiveCatalog, FaultKind},
    core::{types, SQLError},
    schema::{ColumnSpec, ForeignKeyRef},
};

/// A column that passed validation, already rendered into its clauses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedColumn {
    pub name: String,
    pub column_clause: String,
    pub constraint_clause: Option<String>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid data type '{data_type}' provided for column '{column}'")]
    InvalidType { column: String, data_type: String },

    #[error("missing reference table or column for foreign key on '{column}'")]
    MissingReference { column: String },

    #[error("referenced table '{table}' for column '{column}' does not exist")]
    UnresolvedTable { column: String, table: String },

    #[error("referenced column '{referenced}' in table '{table}' for column '{column}' does not exist")]
    UnresolvedColumn {
        column: String,
        table: String,
        referenced: String,
    },

    #[error("cannot look up reference for column '{column}': {source}")]
    Introspection { column: String, source: SQLError },
}

impl ValidationError {
    pub fn column(&self) -> &str {
        match self {
            ValidationError::InvalidType { column, .. }
            | ValidationError::MissingReference { column }
            | ValidationError::UnresolvedTable { column, .. }
            | ValidationError::UnresolvedColumn { column, .. }
            | ValidationError::Introspection { column, .. } => column,
        }
    }

    pub fn fault_kind(&self) -> FaultKind {
        match self {
            ValidationError::InvalidType { .. } => FaultKind::InvalidType,
            ValidationError::MissingReference { .. } => FaultKind::MissingReference,
            ValidationError::UnresolvedTable { .. } => FaultKind::UnresolvedTable,
            ValidationError::UnresolvedColumn { .. } => FaultKind::UnresolvedColumn,
            ValidationError::Introspection { .. } => FaultKind::Introspection,
        }
    }
}

pub type ValidationOutcome = Result<ValidatedColumn, ValidationError>;

/// Checks one column's type and, if it has one, its foreign key.
///
/// References resolve only against what `database` already holds in the live
/// catalog, never against other tables of the batch being compiled.
pub fn validate_column<C>(column: &ColumnSpec, database: &str, catalog: &mut C) -> ValidationOutcome
where
    C: LiveCatalog + ?Sized,
{
    let data_type = types::normalize(&column.data_type);
    if !types::is_valid(&data_type) {
        return Err(ValidationError::InvalidType {
            column: column.name.clone(),
            data_type: column.data_type.clone(),
        });
    }

    let constraint_clause = match &column.foreign_key {
        Some(reference) => {
            resolve_reference(&column.name, reference, database, catalog)?;
            Some(ddl::foreign_key_clause(&column.name, reference))
        }
        None => None,
    };

    debug!("Column {} validated as {}", column.name, data_type);

    Ok(ValidatedColumn {
        name: column.name.clone(),
        column_clause: ddl::column_clause(&column.name, &data_type, column.primary_key),
        constraint_clause,
    })
}

fn resolve_reference<C>(
    column: &str,
    reference: &ForeignKeyRef,
    database: &str,
    catalog: &mut C,
) -> Result<(), ValidationError>
where
    C: LiveCatalog + ?Sized,
{
    if !reference.is_complete() {
        return Err(ValidationError::MissingReference {
            column: column.to_string(),
        });
    }

    let introspection = |source| ValidationError::Introspection {
        column: column.to_string(),
        source,
    };

    if !catalog
        .table_exists(database, &reference.table)
        .map_err(introspection)?
    {
        return Err(ValidationError::UnresolvedTable {
            column: column.to_string(),
            table: reference.table.clone(),
        });
    }

    if !catalog
        .column_exists(database, &reference.table, &reference.column)
        .map_err(introspection)?
    {
        return Err(ValidationError::UnresolvedColumn {
            column: column.to_string(),
            table: reference.table.clone(),
            referenced: reference.column.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{
            defs::{ColumnDefinition, TableDefinition},
            Catalog,
        },
        core::ErrorKind,
    };

    fn shop() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.create_database("shop").unwrap();
        catalog
            .create_table(
                "shop",
                &TableDefinition {
                    name: "customers".to_string(),
                    columns: vec![ColumnDefinition {
                        name: "id".to_string(),
                        data_type: "int".to_string(),
                        primary_key: true,
                    }],
                    foreign_keys: vec![],
                },
            )
            .unwrap();
        catalog
    }

    struct Unreachable;

    impl LiveCatalog for Unreachable {
        fn table_exists(&mut self, _: &str, _: &str) -> Result<bool, SQLError> {
            Err(SQLError::new(ErrorKind::ConnectionError, "server has gone away"))
        }

        fn column_exists(&mut self, _: &str, _: &str, _: &str) -> Result<bool, SQLError> {
            Err(SQLError::new(ErrorKind::ConnectionError, "server has gone away"))
        }
    }

    #[test]
    fn test_plain_column() {
        let column = ColumnSpec::new("name", "VARCHAR");
        let validated = validate_column(&column, "shop", &mut shop()).unwrap();
        assert_eq!(validated.column_clause, "`name` varchar(255)");
        assert_eq!(validated.constraint_clause, None);

        let column = ColumnSpec::new("id", "int").primary_key();
        let validated = validate_column(&column, "shop", &mut shop()).unwrap();
        assert_eq!(validated.column_clause, "`id` int PRIMARY KEY");
    }

    #[test]
    fn test_invalid_type() {
        let column = ColumnSpec::new("id", "uuid");
        let err = validate_column(&column, "shop", &mut shop()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidType {
                column: "id".to_string(),
                data_type: "uuid".to_string()
            }
        );
        assert_eq!(err.fault_kind(), FaultKind::InvalidType);
    }

    #[test]
    fn test_type_is_checked_before_reference() {
        let column = ColumnSpec::new("customer_id", "uuid").references("missing", "id");
        let err = validate_column(&column, "shop", &mut shop()).unwrap_err();
        assert_eq!(err.fault_kind(), FaultKind::InvalidType);
    }

    #[test]
    fn test_resolved_reference() {
        let column = ColumnSpec::new("customer_id", "int").references("customers", "id");
        let validated = validate_column(&column, "shop", &mut shop()).unwrap();
        assert_eq!(
            validated.constraint_clause.as_deref(),
            Some("FOREIGN KEY (`customer_id`) REFERENCES `customers` (`id`)")
        );
    }

    #[test]
    fn test_reference_failures() {
        let mut catalog = shop();

        let column = ColumnSpec::new("customer_id", "int").references("", "id");
        let err = validate_column(&column, "shop", &mut catalog).unwrap_err();
        assert_eq!(err.fault_kind(), FaultKind::MissingReference);

        let column = ColumnSpec::new("customer_id", "int").references("clients", "id");
        let err = validate_column(&column, "shop", &mut catalog).unwrap_err();
        assert_eq!(err.fault_kind(), FaultKind::UnresolvedTable);

        let column = ColumnSpec::new("customer_id", "int").references("customers", "uuid");
        let err = validate_column(&column, "shop", &mut catalog).unwrap_err();
        assert_eq!(err.fault_kind(), FaultKind::UnresolvedColumn);
        assert_eq!(err.column(), "customer_id");

        // Tables of another database do not count.
        let column = ColumnSpec::new("customer_id", "int").references("customers", "id");
        let err = validate_column(&column, "other", &mut catalog).unwrap_err();
        assert_eq!(err.fault_kind(), FaultKind::UnresolvedTable);
    }

    #[test]
    fn test_lookup_failure_is_reported() {
        let column = ColumnSpec::new("customer_id", "int").references("customers", "id");
        let err = validate_column(&column, "shop", &mut Unreachable).unwrap_err();
        assert_eq!(err.fault_kind(), FaultKind::Introspection);

        // Columns without a reference never touch the catalog.
        let column = ColumnSpec::new("id", "int");
        assert!(validate_column(&column, "shop", &mut Unreachable).is_ok());
    }
}
