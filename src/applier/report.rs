use std::fmt::Display;

use enum_as_inner::EnumAsInner;

use crate::{
    compiler::{CompileError, CompiledTable, ValidationError},
    core::SQLError,
};

/// Classification of every fault a batch run can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultKind {
    ConnectionFailed,
    DatabaseAlreadyExists,
    DatabaseCreationFailed,
    ProbeFailed,
    InvalidType,
    MissingReference,
    UnresolvedTable,
    UnresolvedColumn,
    Introspection,
    NoValidColumns,
    StatementExecutionFailed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Server,
    Database,
    Table,
}

/// The engine rejected a compiled statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionFailure {
    pub statement: String,
    pub error: SQLError,
}

#[derive(Clone, Debug, PartialEq, Eq, EnumAsInner)]
pub enum Outcome {
    ConnectionFailed(SQLError),
    ProbeFailed(SQLError),
    DatabaseCreated,
    DatabaseExists,
    DatabaseFailed(SQLError),
    TableCreated(CompiledTable),
    TableRejected(CompileError),
    TableFailed(ExecutionFailure),
}

impl Outcome {
    pub fn fault_kind(&self) -> Option<FaultKind> {
        match self {
            Outcome::ConnectionFailed(_) => Some(FaultKind::ConnectionFailed),
            Outcome::ProbeFailed(_) => Some(FaultKind::ProbeFailed),
            Outcome::DatabaseExists => Some(FaultKind::DatabaseAlreadyExists),
            Outcome::DatabaseFailed(_) => Some(FaultKind::DatabaseCreationFailed),
            Outcome::TableRejected(_) => Some(FaultKind::NoValidColumns),
            Outcome::TableFailed(_) => Some(FaultKind::StatementExecutionFailed),
            Outcome::DatabaseCreated | Outcome::TableCreated(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportEntry {
    pub object: String,
    pub kind: ObjectKind,
    pub outcome: Outcome,
}

/// Per-object results of one batch run, in processing order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplyReport {
    database: String,
    entries: Vec<ReportEntry>,
    halted: bool,
}

impl ApplyReport {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            entries: vec![],
            halted: false,
        }
    }

    pub(crate) fn push(&mut self, object: impl Into<String>, kind: ObjectKind, outcome: Outcome) {
        self.entries.push(ReportEntry {
            object: object.into(),
            kind,
            outcome,
        });
    }

    pub(crate) fn halt(&mut self) {
        self.halted = true;
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Whether the run stopped before processing tables.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn tables_created(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, Outcome::TableCreated(_)))
            .map(|entry| entry.object.as_str())
            .collect()
    }

    /// `CREATE TABLE` statements that the engine accepted.
    pub fn statements(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| entry.outcome.as_table_created())
            .map(|compiled| compiled.statement.as_str())
            .collect()
    }

    pub fn outcome_of(&self, object: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|entry| entry.object == object)
            .map(|entry| &entry.outcome)
    }

    /// Every fault, including columns skipped from created tables, which are
    /// named `table.column`.
    pub fn faults(&self) -> Vec<(String, FaultKind)> {
        let mut faults = vec![];
        for entry in &self.entries {
            if let Some(kind) = entry.outcome.fault_kind() {
                faults.push((entry.object.clone(), kind));
            }
            let skipped: &[ValidationError] = match &entry.outcome {
                Outcome::TableCreated(compiled) => compiled.skipped.as_slice(),
                Outcome::TableRejected(CompileError::NoValidColumns { rejected, .. }) => {
                    rejected.as_slice()
                }
                _ => &[],
            };
            for err in skipped {
                faults.push((
                    format!("{}.{}", entry.object, err.column()),
                    err.fault_kind(),
                ));
            }
        }
        faults
    }

    pub fn status_line(&self, entry: &ReportEntry) -> String {
        let database = &self.database;
        match &entry.outcome {
            Outcome::ConnectionFailed(err) => {
                format!("Error connecting to database server: {}", err)
            }
            Outcome::ProbeFailed(err) => format!(
                "Could not verify whether database {} exists: {}",
                database, err
            ),
            Outcome::DatabaseCreated => format!("Database {} created successfully.", database),
            Outcome::DatabaseExists => format!("Database {} already exists.", database),
            Outcome::DatabaseFailed(err) => {
                format!("Failed creating database {}: {}", database, err)
            }
            Outcome::TableCreated(compiled) => {
                let mut line = format!(
                    "Table {} created successfully in database {}.",
                    entry.object, database
                );
                if !compiled.skipped.is_empty() {
                    line.push_str(" Skipped columns: ");
                    line.push_str(
                        &compiled
                            .skipped
                            .iter()
                            .map(|err| err.to_string())
                            .collect::<Vec<_>>()
                            .join("; "),
                    );
                }
                line
            }
            Outcome::TableRejected(err) => err.to_string(),
            Outcome::TableFailed(failure) => format!(
                "Failed creating table {} in database {}: {}",
                entry.object, database, failure.error
            ),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| self.status_line(entry))
            .collect()
    }
}

impl Display for ApplyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;

    fn compiled(table: &str) -> CompiledTable {
        CompiledTable {
            table: table.to_string(),
            statement: format!("CREATE TABLE `{}` (`id` int)", table),
            columns: vec!["id".to_string()],
            skipped: vec![],
        }
    }

    #[test]
    fn test_tables_created_skips_faults() {
        let mut report = ApplyReport::new("shop");
        report.push("shop", ObjectKind::Database, Outcome::DatabaseCreated);
        report.push("a", ObjectKind::Table, Outcome::TableCreated(compiled("a")));
        report.push(
            "empty",
            ObjectKind::Table,
            Outcome::TableRejected(CompileError::NoValidColumns {
                table: "empty".to_string(),
                rejected: vec![],
            }),
        );
        report.push(
            "b",
            ObjectKind::Table,
            Outcome::TableFailed(ExecutionFailure {
                statement: "CREATE TABLE `b` (`id` int)".to_string(),
                error: SQLError::new(ErrorKind::RuntimeError, "lost"),
            }),
        );
        report.push("c", ObjectKind::Table, Outcome::TableCreated(compiled("c")));

        assert_eq!(report.tables_created(), vec!["a", "c"]);
        assert_eq!(
            report.statements(),
            vec!["CREATE TABLE `a` (`id` int)", "CREATE TABLE `c` (`id` int)"]
        );
        assert_eq!(
            report.faults(),
            vec![
                ("empty".to_string(), FaultKind::NoValidColumns),
                ("b".to_string(), FaultKind::StatementExecutionFailed),
            ]
        );
    }
}
