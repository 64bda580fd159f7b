//! Applies a [`DatabaseSpec`] to a live engine.
//!
//! A run moves through connecting, creating the database and processing the
//! tables, in that order. It halts without touching any table when the
//! connection fails or the database cannot be freshly created; a database
//! that already exists is refused, never reused. Table faults are recorded
//! and the next table is processed.

pub mod audit;
pub mod connection;
pub mod report;

use self::{
    audit::{AuditSink, LogSink},
    connection::{Connection, Connector},
};
pub use self::report::{ApplyReport, ExecutionFailure, FaultKind, ObjectKind, Outcome, ReportEntry};
use crate::{
    compiler::{compile_table, ddl::quote_ident},
    config::{ApplierConfig, ProbePolicy},
    schema::{DatabaseSpec, TableSpec},
};

/// Object name used for entries about the server connection.
pub const SERVER_OBJECT: &str = "server";

pub struct Applier<C> {
    connector: C,
    config: ApplierConfig,
}

impl<C: Connector> Applier<C> {
    pub fn new(connector: C, config: ApplierConfig) -> Self {
        Self { connector, config }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Runs one batch, logging through the `log` facade.
    pub fn apply_logged(&self, spec: DatabaseSpec) -> ApplyReport {
        let mut sink = LogSink::for_database(spec.name.clone());
        self.apply(spec, &mut sink)
    }

    /// Runs one batch. Never fails: every fault ends up in the report.
    pub fn apply(&self, spec: DatabaseSpec, sink: &mut dyn AuditSink) -> ApplyReport {
        let mut report = ApplyReport::new(spec.name.clone());

        let mut conn = match self.connector.connect() {
            Ok(conn) => conn,
            Err(err) => {
                sink.error(&format!("Failed to connect to database server: {}", err));
                report.push(SERVER_OBJECT, ObjectKind::Server, Outcome::ConnectionFailed(err));
                report.halt();
                return report;
            }
        };
        sink.info("Connection to database server successful.");

        if self.create_database(&mut conn, &spec.name, sink, &mut report) {
            for table in spec.tables.values() {
                let outcome = self.apply_table(&mut conn, &spec.name, table, sink);
                report.push(table.name.clone(), ObjectKind::Table, outcome);
            }
            sink.info(&format!(
                "Finished processing {} table(s), {} created.",
                spec.tables.len(),
                report.tables_created().len()
            ));
        } else {
            report.halt();
        }

        drop(conn);
        sink.info("Connection closed.");

        report
    }

    /// Returns whether tables may be processed.
    fn create_database(
        &self,
        conn: &mut C::Connection,
        database: &str,
        sink: &mut dyn AuditSink,
        report: &mut ApplyReport,
    ) -> bool {
        if self.config.probe != ProbePolicy::Skip {
            match conn.database_exists(database) {
                Ok(true) => {
                    sink.warn(&format!("Database {} already exists. Exiting.", database));
                    report.push(database, ObjectKind::Database, Outcome::DatabaseExists);
                    return false;
                }
                Ok(false) => {}
                Err(err) => {
                    let refuse = self.config.probe == ProbePolicy::RefuseOnError;
                    let message = format!(
                        "Error checking if database {} exists: {}",
                        database, err
                    );
                    if refuse {
                        sink.error(&message);
                    } else {
                        sink.warn(&message);
                    }
                    report.push(database, ObjectKind::Database, Outcome::ProbeFailed(err));
                    if refuse {
                        return false;
                    }
                }
            }
        }

        if let Err(err) = conn.execute(&format!("CREATE DATABASE {}", quote_ident(database))) {
            if err.is_duplicate_object() {
                sink.warn(&format!("Database {} already exists. Exiting.", database));
                report.push(database, ObjectKind::Database, Outcome::DatabaseExists);
            } else {
                sink.error(&format!("Failed creating database {}: {}", database, err));
                report.push(database, ObjectKind::Database, Outcome::DatabaseFailed(err));
            }
            return false;
        }
        sink.info(&format!("Database {} created successfully.", database));
        report.push(database, ObjectKind::Database, Outcome::DatabaseCreated);

        if let Err(err) = conn.execute(&format!("USE {}", quote_ident(database))) {
            sink.error(&format!("Failed selecting database {}: {}", database, err));
            report.push(database, ObjectKind::Database, Outcome::DatabaseFailed(err));
            return false;
        }
        sink.info(&format!("Using database {}", database));

        true
    }

    fn apply_table(
        &self,
        conn: &mut C::Connection,
        database: &str,
        table: &TableSpec,
        sink: &mut dyn AuditSink,
    ) -> Outcome {
        let compiled = match compile_table(table, database, conn) {
            Ok(compiled) => compiled,
            Err(err) => {
                sink.error(&err.to_string());
                return Outcome::TableRejected(err);
            }
        };

        for skipped in &compiled.skipped {
            sink.warn(&format!("Table {}: skipped {}", table.name, skipped));
        }

        match conn.execute(&compiled.statement) {
            Ok(()) => {
                sink.info(&format!(
                    "Table {} created successfully in database {}.",
                    table.name, database
                ));
                Outcome::TableCreated(compiled)
            }
            Err(error) => {
                sink.error(&format!(
                    "Failed creating table {} in database {}: {}",
                    table.name, database, error
                ));
                Outcome::TableFailed(ExecutionFailure {
                    statement: compiled.statement,
                    error,
                })
            }
        }
    }
}
