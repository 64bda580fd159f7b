//! Turns table specs into `CREATE TABLE` statements.

pub mod ddl;
pub mod validator;

pub use ddl::{compile_table, CompileError, CompiledTable};
pub use validator::{validate_column, ValidatedColumn, ValidationError, ValidationOutcome};
