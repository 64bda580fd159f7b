use sqlparser::ast::{ColumnOption, Ident, ObjectName, Statement, TableConstraint};

use crate::{
    catalog::defs::{ColumnDefinition, ForeignKeyDefinition, TableDefinition},
    core::{ErrorKind, SQLError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DDLJob {
    /// Create database with the given name.
    CreateDatabase { name: String, if_not_exists: bool },
    /// Create table with the given definition (database_name, definition).
    CreateTable(String, TableDefinition),
    /// Make the given database the default for unqualified names.
    Use(String),
}

fn unsupported(what: impl AsRef<str>) -> SQLError {
    SQLError::new(
        ErrorKind::UnsupportedError,
        format!("{} is not supported", what.as_ref()),
    )
}

fn single_ident(idents: &[Ident], what: &str) -> Result<String, SQLError> {
    match idents {
        [ident] => Ok(ident.value.clone()),
        _ => Err(unsupported(format!("multi-column {}", what))),
    }
}

/// Resolve `[database.]table` against the session default.
fn qualify_table_name(
    name: &ObjectName,
    current_database: Option<&str>,
) -> Result<(String, String), SQLError> {
    match name {
        ObjectName(v) if v.len() == 1 => {
            let database = current_database.ok_or_else(|| {
                SQLError::new(ErrorKind::RuntimeError, "no database selected")
            })?;
            Ok((database.to_string(), v[0].value.clone()))
        }
        ObjectName(v) if v.len() == 2 => Ok((v[0].value.clone(), v[1].value.clone())),
        _ => Err(SQLError::new(ErrorKind::ParseError, "invalid table name")),
    }
}

/// Translate a parsed statement into a catalog job.
pub fn bind_statement(
    stmt: &Statement,
    current_database: Option<&str>,
) -> Result<DDLJob, SQLError> {
    match stmt {
        Statement::CreateDatabase {
            db_name,
            if_not_exists,
            ..
        } => {
            let name = match db_name {
                ObjectName(v) if v.len() == 1 => v[0].value.clone(),
                _ => return Err(SQLError::new(ErrorKind::ParseError, "invalid database name")),
            };

            Ok(DDLJob::CreateDatabase {
                name,
                if_not_exists: *if_not_exists,
            })
        }

        Statement::CreateTable {
            if_not_exists,
            name,
            columns,
            constraints,
            ..
        } => {
            if *if_not_exists {
                return Err(unsupported("CREATE TABLE IF NOT EXISTS"));
            }

            let (database_name, table_name) = qualify_table_name(name, current_database)?;

            let mut columns = columns
                .iter()
                .map(|col| ColumnDefinition {
                    name: col.name.value.clone(),
                    data_type: col.data_type.to_string().to_lowercase(),
                    primary_key: col.options.iter().any(|opt| {
                        matches!(opt.option, ColumnOption::Unique { is_primary: true, .. })
                    }),
                })
                .collect::<Vec<_>>();

            let mut foreign_keys = vec![];
            for constraint in constraints {
                match constraint {
                    TableConstraint::ForeignKey {
                        columns: local,
                        foreign_table,
                        referred_columns,
                        ..
                    } => {
                        let (foreign_database, foreign_table) =
                            qualify_table_name(foreign_table, Some(&database_name))?;
                        if foreign_database != database_name {
                            return Err(unsupported("cross-database foreign key"));
                        }

                        foreign_keys.push(ForeignKeyDefinition {
                            column: single_ident(local, "foreign key")?,
                            foreign_table,
                            referred_column: single_ident(referred_columns, "foreign key")?,
                        });
                    }
                    TableConstraint::Unique {
                        columns: keyed,
                        is_primary: true,
                        ..
                    } => {
                        let keyed = single_ident(keyed, "primary key")?;
                        let column = columns
                            .iter_mut()
                            .find(|column| column.name == keyed)
                            .ok_or_else(|| {
                                SQLError::new(
                                    ErrorKind::UndefinedObject,
                                    format!("key column `{}` doesn't exist in table", keyed),
                                )
                            })?;
                        column.primary_key = true;
                    }
                    other => return Err(unsupported(format!("constraint {}", other))),
                }
            }

            Ok(DDLJob::CreateTable(
                database_name,
                TableDefinition {
                    name: table_name,
                    columns,
                    foreign_keys,
                },
            ))
        }

        Statement::Use { db_name } => Ok(DDLJob::Use(db_name.value.clone())),

        other => Err(unsupported(format!("statement `{}`", other))),
    }
}
