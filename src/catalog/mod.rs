use self::defs::{DatabaseDefinition, TableDefinition};
use crate::core::{ErrorKind, SQLError};

pub mod defs;

/// Metadata store of the in-process engine.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub databases: Vec<DatabaseDefinition>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_database(&mut self, database_name: &str) -> Result<(), SQLError> {
        if self.exists_database(database_name) {
            return Err(SQLError::new(
                ErrorKind::DuplicateObject,
                format!("database `{}` already exists", database_name),
            ));
        }

        self.databases.push(DatabaseDefinition {
            name: database_name.to_string(),
            tables: vec![],
        });

        Ok(())
    }

    pub fn exists_database(&self, database_name: &str) -> bool {
        self.databases
            .iter()
            .any(|database| database.name == database_name)
    }

    pub fn list_databases(&self) -> Vec<String> {
        self.databases
            .iter()
            .map(|database| database.name.clone())
            .collect()
    }

    fn database(&self, database_name: &str) -> Result<&DatabaseDefinition, SQLError> {
        self.databases
            .iter()
            .find(|v| v.name == database_name)
            .ok_or_else(|| {
                SQLError::new(
                    ErrorKind::UndefinedObject,
                    format!("unknown database `{}`", database_name),
                )
            })
    }

    /// Registers a table after checking that every foreign key points at an
    /// existing column of an existing table in the same database.
    pub fn create_table(
        &mut self,
        database_name: &str,
        table_def: &TableDefinition,
    ) -> Result<(), SQLError> {
        let database = self.database(database_name)?;

        if database
            .tables
            .iter()
            .any(|table| table.name == table_def.name)
        {
            return Err(SQLError::new(
                ErrorKind::DuplicateObject,
                format!("table `{}` already exists", table_def.name),
            ));
        }

        for foreign_key in &table_def.foreign_keys {
            if table_def.find_column(&foreign_key.column).is_none() {
                return Err(SQLError::new(
                    ErrorKind::UndefinedObject,
                    format!(
                        "key column `{}` doesn't exist in table",
                        foreign_key.column
                    ),
                ));
            }

            let referenced = database
                .tables
                .iter()
                .find(|table| table.name == foreign_key.foreign_table)
                .ok_or_else(|| {
                    SQLError::new(
                        ErrorKind::UndefinedObject,
                        format!(
                            "failed to open the referenced table `{}`",
                            foreign_key.foreign_table
                        ),
                    )
                })?;

            match referenced.find_column(&foreign_key.referred_column) {
                None => {
                    return Err(SQLError::new(
                        ErrorKind::UndefinedObject,
                        format!(
                            "referenced column `{}` doesn't exist in table `{}`",
                            foreign_key.referred_column, foreign_key.foreign_table
                        ),
                    ))
                }
                // Primary keys are the only indexes tracked here.
                Some(column) if !column.primary_key => {
                    return Err(SQLError::new(
                        ErrorKind::ConstraintError,
                        format!(
                            "missing index for constraint on `{}`.`{}`",
                            foreign_key.foreign_table, foreign_key.referred_column
                        ),
                    ))
                }
                Some(_) => {}
            }
        }

        if let Some(database) = self.databases.iter_mut().find(|v| v.name == database_name) {
            database.tables.push(table_def.clone());
        }

        Ok(())
    }

    pub fn list_tables(&self, database_name: &str) -> Result<Vec<String>, SQLError> {
        Ok(self
            .database(database_name)?
            .tables
            .iter()
            .map(|table| table.name.clone())
            .collect())
    }

    pub fn find_table_by_name(
        &self,
        database_name: &str,
        table_name: &str,
    ) -> Result<Option<&TableDefinition>, SQLError> {
        Ok(self
            .database(database_name)?
            .tables
            .iter()
            .find(|table| table.name == table_name))
    }
}
