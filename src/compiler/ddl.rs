use log::{debug, warn};
use thiserror::Error;

use super::validator::{validate_column, ValidatedColumn, ValidationError};
use crate::{
    applier::connection::LiveCatalog,
    schema::{ForeignKeyRef, TableSpec},
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("No valid columns provided for table '{table}'{}", describe_rejected(.rejected))]
    NoValidColumns {
        table: String,
        rejected: Vec<ValidationError>,
    },
}

fn describe_rejected(rejected: &[ValidationError]) -> String {
    if rejected.is_empty() {
        return String::new();
    }
    format!(
        ": {}",
        rejected
            .iter()
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    )
}

/// A `CREATE TABLE` statement together with the columns left out of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledTable {
    pub table: String,
    pub statement: String,
    /// Names of the columns present in `statement`, in declaration order.
    pub columns: Vec<String>,
    pub skipped: Vec<ValidationError>,
}

/// Quotes an identifier with backticks, doubling embedded ones.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

pub fn column_clause(name: &str, normalized_type: &str, primary_key: bool) -> String {
    let mut clause = format!("{} {}", quote_ident(name), normalized_type);
    if primary_key {
        clause.push_str(" PRIMARY KEY");
    }
    clause
}

pub fn foreign_key_clause(column: &str, reference: &ForeignKeyRef) -> String {
    format!(
        "FOREIGN KEY ({}) REFERENCES {} ({})",
        quote_ident(column),
        quote_ident(&reference.table),
        quote_ident(&reference.column)
    )
}

/// Joins column clauses, then constraint clauses, into one statement.
///
/// Constraints always follow every column definition.
pub fn assemble(table: &str, columns: &[ValidatedColumn]) -> String {
    let clauses = columns
        .iter()
        .map(|column| column.column_clause.as_str())
        .chain(
            columns
                .iter()
                .filter_map(|column| column.constraint_clause.as_deref()),
        )
        .collect::<Vec<_>>();

    format!("CREATE TABLE {} ({})", quote_ident(table), clauses.join(", "))
}

/// Validates every column of `table` in declaration order and builds its
/// statement from the ones that pass.
pub fn compile_table<C>(
    table: &TableSpec,
    database: &str,
    catalog: &mut C,
) -> Result<CompiledTable, CompileError>
where
    C: LiveCatalog + ?Sized,
{
    let mut validated = vec![];
    let mut skipped = vec![];

    for column in table.columns.values() {
        match validate_column(column, database, catalog) {
            Ok(column) => validated.push(column),
            Err(err) => {
                warn!("Skipping column {} of table {}: {}", column.name, table.name, err);
                skipped.push(err);
            }
        }
    }

    if validated.is_empty() {
        return Err(CompileError::NoValidColumns {
            table: table.name.clone(),
            rejected: skipped,
        });
    }

    let statement = assemble(&table.name, &validated);
    debug!("Compiled table {}: {}", table.name, statement);

    Ok(CompiledTable {
        table: table.name.clone(),
        statement,
        columns: validated.into_iter().map(|column| column.name).collect(),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        applier::FaultKind,
        catalog::{
            defs::{ColumnDefinition, TableDefinition},
            Catalog,
        },
        schema::ColumnSpec,
    };

    fn catalog_with(tables: &[(&str, &[&str])]) -> Catalog {
        let mut catalog = Catalog::new();
        catalog.create_database("shop").unwrap();
        for (name, columns) in tables {
            catalog
                .create_table(
                    "shop",
                    &TableDefinition {
                        name: name.to_string(),
                        columns: columns
                            .iter()
                            .map(|column| ColumnDefinition {
                                name: column.to_string(),
                                data_type: "int".to_string(),
                                primary_key: false,
                            })
                            .collect(),
                        foreign_keys: vec![],
                    },
                )
                .unwrap();
        }
        catalog
    }

    #[test]
    fn test_columns_in_declaration_order() {
        let table = TableSpec::new("users")
            .with_column(ColumnSpec::new("id", "int").primary_key())
            .with_column(ColumnSpec::new("name", "varchar"));

        let compiled = compile_table(&table, "shop", &mut catalog_with(&[])).unwrap();
        assert_eq!(
            compiled.statement,
            "CREATE TABLE `users` (`id` int PRIMARY KEY, `name` varchar(255))"
        );
        assert_eq!(compiled.columns, vec!["id", "name"]);
        assert!(compiled.skipped.is_empty());
        assert!(!compiled.statement.contains("FOREIGN KEY"));
    }

    #[test]
    fn test_constraints_follow_all_columns() {
        let table = TableSpec::new("orders")
            .with_column(ColumnSpec::new("customer_id", "int").references("customers", "id"))
            .with_column(ColumnSpec::new("id", "bigint").primary_key())
            .with_column(ColumnSpec::new("item_id", "int").references("items", "id"));

        let mut catalog = catalog_with(&[("customers", &["id"]), ("items", &["id"])]);
        let compiled = compile_table(&table, "shop", &mut catalog).unwrap();
        assert_eq!(
            compiled.statement,
            "CREATE TABLE `orders` (`customer_id` int, `id` bigint PRIMARY KEY, `item_id` int, \
             FOREIGN KEY (`customer_id`) REFERENCES `customers` (`id`), \
             FOREIGN KEY (`item_id`) REFERENCES `items` (`id`))"
        );
    }

    #[test]
    fn test_every_flagged_column_is_a_primary_key() {
        let table = TableSpec::new("pairs")
            .with_column(ColumnSpec::new("a", "int").primary_key())
            .with_column(ColumnSpec::new("b", "int").primary_key());

        let compiled = compile_table(&table, "shop", &mut catalog_with(&[])).unwrap();
        assert_eq!(compiled.statement.matches("PRIMARY KEY").count(), 2);
    }

    #[test]
    fn test_partial_table() {
        let table = TableSpec::new("orders")
            .with_column(ColumnSpec::new("id", "int").primary_key())
            .with_column(ColumnSpec::new("customer_id", "int").references("customers", "id"))
            .with_column(ColumnSpec::new("blob_id", "int").references("blobs", "id"))
            .with_column(ColumnSpec::new("label", "string"));

        let mut catalog = catalog_with(&[("customers", &["id"])]);
        let compiled = compile_table(&table, "shop", &mut catalog).unwrap();
        assert_eq!(
            compiled.statement,
            "CREATE TABLE `orders` (`id` int PRIMARY KEY, `customer_id` int, \
             FOREIGN KEY (`customer_id`) REFERENCES `customers` (`id`))"
        );
        let kinds = compiled
            .skipped
            .iter()
            .map(ValidationError::fault_kind)
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec![FaultKind::UnresolvedTable, FaultKind::InvalidType]);
    }

    #[test]
    fn test_no_valid_columns() {
        let err = compile_table(&TableSpec::new("empty"), "shop", &mut catalog_with(&[]))
            .unwrap_err();
        assert_eq!(err.to_string(), "No valid columns provided for table 'empty'");

        let table = TableSpec::new("orders")
            .with_column(ColumnSpec::new("customer_id", "int").references("customers", "id"));
        let CompileError::NoValidColumns { table, rejected } =
            compile_table(&table, "shop", &mut catalog_with(&[])).unwrap_err();
        assert_eq!(table, "orders");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].fault_kind(), FaultKind::UnresolvedTable);
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote_ident("users"), "`users`");
        assert_eq!(quote_ident("odd`name"), "`odd``name`");
    }
}
