use std::{io::Write, path::PathBuf};

use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use thiserror::Error;

use crate::{
    applier::{audit::LogSink, Applier, ApplyReport},
    config::{ApplierConfig, ProbePolicy},
    engine::MemoryEngine,
    schema::{
        document::{self, DocumentError},
        DatabaseLayout, SchemaError,
    },
};

#[derive(Parser, Debug, Clone)]
#[command(name = "schemac", version, about = "Compile a schema document into DDL and apply it")]
pub struct Args {
    /// Schema document, or a directory holding `Database*.json` documents
    pub input: PathBuf,

    /// Name of the database to create
    #[arg(short, long)]
    pub database: String,

    /// Enforce the table-count limits of a database layout
    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Existence probe before creating the database
    #[arg(long, value_enum, default_value_t = ProbeArg::Skip)]
    pub probe: ProbeArg,

    /// Print the statements that were executed
    #[arg(long)]
    pub print_sql: bool,

    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutArg {
    Simple,
    Complex,
}

impl From<LayoutArg> for DatabaseLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Simple => DatabaseLayout::Simple,
            LayoutArg::Complex => DatabaseLayout::Complex,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeArg {
    Skip,
    Refuse,
    Proceed,
}

impl From<ProbeArg> for ProbePolicy {
    fn from(value: ProbeArg) -> Self {
        match value {
            ProbeArg::Skip => ProbePolicy::Skip,
            ProbeArg::Refuse => ProbePolicy::RefuseOnError,
            ProbeArg::Proceed => ProbePolicy::ProceedOnError,
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("no Database*.json document found in {}", .0.display())]
    NoDocument(PathBuf),

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Batch front end: loads a document, applies it to the in-process engine
/// and writes the report to `output`.
pub struct CliApp<O: Write> {
    engine: MemoryEngine,
    output: O,
}

impl<O: Write> CliApp<O> {
    pub fn new(output: O) -> Self {
        Self::with_engine(MemoryEngine::new(), output)
    }

    pub fn with_engine(engine: MemoryEngine, output: O) -> Self {
        Self { engine, output }
    }

    pub fn into_output(self) -> O {
        self.output
    }

    fn resolve_input(&self, args: &Args) -> Result<PathBuf, CliError> {
        if args.input.is_dir() {
            document::latest_in_dir(&args.input)?
                .ok_or_else(|| CliError::NoDocument(args.input.clone()))
        } else {
            Ok(args.input.clone())
        }
    }

    pub fn run(&mut self, args: &Args) -> Result<ApplyReport, CliError> {
        let path = self.resolve_input(args)?;
        info!("Reading schema document {}", path.display());

        let spec = document::from_path(&args.database, &path)?;
        if let Some(layout) = args.layout {
            spec.check_layout(layout.into())?;
        }

        let config = ApplierConfig::new().with_probe(args.probe.into());
        let applier = Applier::new(self.engine.clone(), config);
        let mut sink = LogSink::for_database(args.database.clone());
        let report = applier.apply(spec, &mut sink);

        for line in report.lines() {
            writeln!(self.output, "{}", line)?;
        }
        if args.print_sql {
            writeln!(self.output)?;
            for statement in self.engine.journal() {
                writeln!(self.output, "{};", statement)?;
            }
        }
        self.output.flush()?;

        Ok(report)
    }
}
