//! Diagnostic stream of a single batch run.

use log::Level;

pub trait AuditSink {
    fn record(&mut self, level: Level, message: &str);

    fn info(&mut self, message: &str) {
        self.record(Level::Info, message);
    }

    fn warn(&mut self, message: &str) {
        self.record(Level::Warn, message);
    }

    fn error(&mut self, message: &str) {
        self.record(Level::Error, message);
    }
}

/// Forwards entries to the `log` facade, prefixed with the database name.
#[derive(Debug, Clone)]
pub struct LogSink {
    database: String,
}

impl LogSink {
    pub fn for_database(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
        }
    }
}

impl AuditSink for LogSink {
    fn record(&mut self, level: Level, message: &str) {
        log::log!(target: "schemac::apply", level, "[{}] {}", self.database, message);
    }
}

/// Keeps entries in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub entries: Vec<(Level, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages_at(&self, level: Level) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(entry_level, _)| *entry_level == level)
            .map(|(_, message)| message.as_str())
            .collect()
    }
}

impl AuditSink for MemorySink {
    fn record(&mut self, level: Level, message: &str) {
        self.entries.push((level, message.to_string()));
    }
}
