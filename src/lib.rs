//! Schema-definition compiler: validates declarative table descriptions,
//! compiles them into `CREATE TABLE` statements and applies them to a
//! database engine in declaration order.

#[macro_use]
extern crate lazy_static;

pub mod applier;
pub mod catalog;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod core;
pub mod engine;
pub mod schema;
pub mod util;

pub use applier::{Applier, ApplyReport, FaultKind, Outcome};
pub use config::{ApplierConfig, ProbePolicy};
pub use schema::{ColumnSpec, DatabaseSpec, ForeignKeyRef, TableSpec};
