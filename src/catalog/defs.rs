#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    /// Lower-cased type as the engine rendered it, e.g. `varchar(255)`.
    pub data_type: String,
    pub primary_key: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignKeyDefinition {
    pub column: String,
    pub foreign_table: String,
    pub referred_column: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    pub foreign_keys: Vec<ForeignKeyDefinition>,
}

impl TableDefinition {
    pub fn find_column(&self, column_name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|column| column.name == column_name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseDefinition {
    pub name: String,
    pub tables: Vec<TableDefinition>,
}
