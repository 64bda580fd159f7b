//! In-process relational engine.
//!
//! Executes the DDL the applier emits against a shared [`Catalog`] and
//! answers introspection queries from it. Several connections may be open on
//! one engine; each keeps its own default database.

pub mod ddl;
pub mod parser;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::info;

use self::{
    ddl::{bind_statement, DDLJob},
    parser::parse_sql,
};
use crate::{
    applier::connection::{Connection, Connector, LiveCatalog},
    catalog::Catalog,
    core::{ErrorKind, SQLError},
};

#[derive(Debug, Default)]
struct EngineState {
    catalog: Catalog,
    /// Every statement that executed successfully, in order.
    journal: Vec<String>,
    offline: bool,
    open_connections: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    state: Arc<Mutex<EngineState>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// While offline, new connections are refused.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    pub fn open_connections(&self) -> usize {
        self.lock().open_connections
    }

    pub fn journal(&self) -> Vec<String> {
        self.lock().journal.clone()
    }

    pub fn catalog(&self) -> Catalog {
        self.lock().catalog.clone()
    }
}

impl Connector for MemoryEngine {
    type Connection = MemoryConnection;

    fn connect(&self) -> Result<MemoryConnection, SQLError> {
        let mut state = self.lock();
        if state.offline {
            return Err(SQLError::new(
                ErrorKind::ConnectionError,
                "can't connect to server: connection refused",
            ));
        }
        state.open_connections += 1;

        Ok(MemoryConnection {
            engine: self.clone(),
            current_database: None,
        })
    }
}

pub struct MemoryConnection {
    engine: MemoryEngine,
    current_database: Option<String>,
}

impl MemoryConnection {
    pub fn current_database(&self) -> Option<&str> {
        self.current_database.as_deref()
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        let mut state = self.engine.lock();
        state.open_connections = state.open_connections.saturating_sub(1);
    }
}

impl Connection for MemoryConnection {
    fn execute(&mut self, sql: &str) -> Result<(), SQLError> {
        info!("Executing SQL: {}", sql);

        let statement = parse_sql(sql)?;
        let job = bind_statement(&statement, self.current_database.as_deref())?;

        let mut state = self.engine.lock();
        match job {
            DDLJob::CreateDatabase {
                name,
                if_not_exists,
            } => {
                if !(if_not_exists && state.catalog.exists_database(&name)) {
                    state.catalog.create_database(&name)?;
                }
            }
            DDLJob::CreateTable(database_name, table_def) => {
                state.catalog.create_table(&database_name, &table_def)?;
            }
            DDLJob::Use(database_name) => {
                if !state.catalog.exists_database(&database_name) {
                    return Err(SQLError::new(
                        ErrorKind::UndefinedObject,
                        format!("unknown database `{}`", database_name),
                    ));
                }
                self.current_database = Some(database_name);
            }
        }
        state.journal.push(sql.to_string());

        Ok(())
    }

    fn database_exists(&mut self, database: &str) -> Result<bool, SQLError> {
        Ok(self.engine.lock().catalog.exists_database(database))
    }
}

impl LiveCatalog for MemoryConnection {
    fn table_exists(&mut self, database: &str, table: &str) -> Result<bool, SQLError> {
        self.engine.lock().catalog.table_exists(database, table)
    }

    fn column_exists(
        &mut self,
        database: &str,
        table: &str,
        column: &str,
    ) -> Result<bool, SQLError> {
        self.engine
            .lock()
            .catalog
            .column_exists(database, table, column)
    }
}
