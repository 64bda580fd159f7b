//! In-memory description of the database to create.
//!
//! Tables and columns are keyed by name and keep declaration order, which is
//! also the order tables are applied and column clauses are emitted.

use std::fmt::Display;

use indexmap::IndexMap;

use super::SchemaError;

/// Name-based reference to `target_table.target_column`.
///
/// Either side may be empty when the source description left it out; the
/// validator reports that instead of the model refusing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignKeyRef {
    pub table: String,
    pub column: String,
}

impl ForeignKeyRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.table.is_empty() && !self.column.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: String,
    pub primary_key: bool,
    pub foreign_key: Option<ForeignKeyRef>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            primary_key: false,
            foreign_key: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKeyRef::new(table, column));
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSpec {
    pub name: String,
    pub columns: IndexMap<String, ColumnSpec>,
}

impl TableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
        }
    }

    /// Builder form of [`TableSpec::add_column`]; a repeated name replaces the
    /// earlier column in place.
    pub fn with_column(mut self, column: ColumnSpec) -> Self {
        self.columns.insert(column.name.clone(), column);
        self
    }

    pub fn add_column(&mut self, column: ColumnSpec) -> Result<(), SchemaError> {
        if self.columns.contains_key(&column.name) {
            return Err(SchemaError::DuplicateColumn {
                table: self.name.clone(),
                column: column.name,
            });
        }
        self.columns.insert(column.name.clone(), column);
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.get(name)
    }
}

/// Table-count class of a database.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatabaseLayout {
    /// One to five tables.
    Simple,
    /// Five tables or more.
    Complex,
}

impl DatabaseLayout {
    pub const SIMPLE_MAX_TABLES: usize = 5;
    pub const COMPLEX_MIN_TABLES: usize = 5;

    pub fn admits(&self, table_count: usize) -> bool {
        match self {
            DatabaseLayout::Simple => (1..=Self::SIMPLE_MAX_TABLES).contains(&table_count),
            DatabaseLayout::Complex => table_count >= Self::COMPLEX_MIN_TABLES,
        }
    }
}

impl Display for DatabaseLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseLayout::Simple => write!(f, "simple"),
            DatabaseLayout::Complex => write!(f, "complex"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseSpec {
    pub name: String,
    pub tables: IndexMap<String, TableSpec>,
}

impl DatabaseSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: IndexMap::new(),
        }
    }

    pub fn with_table(mut self, table: TableSpec) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }

    pub fn add_table(&mut self, table: TableSpec) -> Result<(), SchemaError> {
        if self.tables.contains_key(&table.name) {
            return Err(SchemaError::DuplicateTable { table: table.name });
        }
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.get(name)
    }

    pub fn check_layout(&self, layout: DatabaseLayout) -> Result<(), SchemaError> {
        if layout.admits(self.tables.len()) {
            Ok(())
        } else {
            Err(SchemaError::Layout {
                layout,
                tables: self.tables.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_is_kept() {
        let table = TableSpec::new("users")
            .with_column(ColumnSpec::new("id", "int").primary_key())
            .with_column(ColumnSpec::new("name", "varchar"))
            .with_column(ColumnSpec::new("age", "int"));

        let names = table.columns.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(names, vec!["id", "name", "age"]);
        assert!(table.column("id").unwrap().primary_key);
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let mut table = TableSpec::new("users");
        table.add_column(ColumnSpec::new("id", "int")).unwrap();
        let err = table.add_column(ColumnSpec::new("id", "bigint")).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { .. }));

        let mut db = DatabaseSpec::new("shop");
        db.add_table(TableSpec::new("users")).unwrap();
        assert!(db.add_table(TableSpec::new("users")).is_err());
    }

    #[test]
    fn test_incomplete_reference() {
        assert!(ForeignKeyRef::new("users", "id").is_complete());
        assert!(!ForeignKeyRef::new("", "id").is_complete());
        assert!(!ForeignKeyRef::new("users", "").is_complete());
    }

    #[test]
    fn test_layout_limits() {
        let mut db = DatabaseSpec::new("shop");
        assert!(db.check_layout(DatabaseLayout::Simple).is_err());

        for i in 0..5 {
            db = db.with_table(TableSpec::new(format!("t{}", i)));
        }
        assert!(db.check_layout(DatabaseLayout::Simple).is_ok());
        assert!(db.check_layout(DatabaseLayout::Complex).is_ok());

        db = db.with_table(TableSpec::new("t5"));
        assert!(db.check_layout(DatabaseLayout::Simple).is_err());
        assert!(db.check_layout(DatabaseLayout::Complex).is_ok());
    }
}
