//! Módulo de base de datos
//!
//! Scripts de esquema embebidos y el runner que los aplica sobre PostgreSQL.

pub mod migrations;

pub use migrations::{MigrationError, MigrationReport, MigrationRunner, MigrationScript, RunOptions, MIGRATIONS};
