//! Migraciones del esquema
//!
//! Este módulo embebe los scripts de `migrations/` y los aplica en orden.
//! Todo el DDL es idempotente (`IF NOT EXISTS`), así que volver a aplicar
//! un script no cambia el esquema. Los nombres aplicados se registran en
//! `schema_migrations`. Cada script se aplica en su propia transacción: un
//! fallo aborta la ejecución y revierte el script afectado por completo.

use std::collections::HashSet;

use sqlx::PgPool;
use thiserror::Error;

/// Script de migración embebido en el binario
#[derive(Debug, Clone, Copy)]
pub struct MigrationScript {
    pub name: &'static str,
    pub sql: &'static str,
}

/// Scripts en orden de aplicación
pub const MIGRATIONS: &[MigrationScript] = &[
    MigrationScript {
        name: "0001_create_dealers.sql",
        sql: include_str!("../../migrations/0001_create_dealers.sql"),
    },
    MigrationScript {
        name: "0002_create_customers.sql",
        sql: include_str!("../../migrations/0002_create_customers.sql"),
    },
    MigrationScript {
        name: "0003_create_test_drive_entries.sql",
        sql: include_str!("../../migrations/0003_create_test_drive_entries.sql"),
    },
    MigrationScript {
        name: "0004_create_cost_tables.sql",
        sql: include_str!("../../migrations/0004_create_cost_tables.sql"),
    },
];

const LEDGER_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    name TEXT PRIMARY KEY,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("{file}: statement #{index} failed: {source}")]
    Statement {
        file: &'static str,
        index: usize,
        #[source]
        source: sqlx::Error,
    },

    #[error("migration ledger error: {0}")]
    Ledger(#[from] sqlx::Error),
}

/// Opciones del runner
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Solo listar los scripts pendientes
    pub dry_run: bool,
    /// Ejecutar también los scripts ya registrados
    pub reapply: bool,
}

/// Resultado de una ejecución
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
    pub pending: Vec<&'static str>,
}

/// Divide un script en sentencias, ignorando comentarios `--` y los `;`
/// dentro de literales entre comillas simples.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_literal = false;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_literal = !in_literal;
                current.push(c);
            }
            '-' if !in_literal && chars.peek() == Some(&'-') => {
                // comentario hasta fin de línea
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            ';' if !in_literal => {
                push_statement(&mut statements, &current);
                current.clear();
            }
            _ => current.push(c),
        }
    }
    push_statement(&mut statements, &current);
    statements
}

fn push_statement(statements: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}

/// Aplica los scripts embebidos sobre un pool de PostgreSQL
pub struct MigrationRunner<'a> {
    pool: &'a PgPool,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn ledger_exists(&self) -> Result<bool, MigrationError> {
        let exists: bool = sqlx::query_scalar("SELECT to_regclass('schema_migrations') IS NOT NULL")
            .fetch_one(self.pool)
            .await?;
        Ok(exists)
    }

    /// Nombres ya registrados en `schema_migrations`
    pub async fn applied_names(&self) -> Result<HashSet<String>, MigrationError> {
        if !self.ledger_exists().await? {
            return Ok(HashSet::new());
        }
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM schema_migrations")
            .fetch_all(self.pool)
            .await?;
        Ok(names.into_iter().collect())
    }

    /// Ejecuta los scripts en orden. Se detiene en la primera sentencia fallida
    /// y revierte el script afectado; los anteriores quedan aplicados.
    pub async fn run(
        &self,
        scripts: &[MigrationScript],
        options: RunOptions,
    ) -> Result<MigrationReport, MigrationError> {
        let mut report = MigrationReport::default();

        if options.dry_run {
            let applied = self.applied_names().await?;
            for script in scripts {
                if applied.contains(script.name) && !options.reapply {
                    report.skipped.push(script.name);
                } else {
                    report.pending.push(script.name);
                }
            }
            return Ok(report);
        }

        sqlx::query(LEDGER_DDL).execute(self.pool).await?;
        let applied = self.applied_names().await?;

        for script in scripts {
            if applied.contains(script.name) && !options.reapply {
                tracing::debug!("⏭️ {} ya aplicada", script.name);
                report.skipped.push(script.name);
                continue;
            }

            tracing::info!("📜 Aplicando {}", script.name);
            // cada script en su transacción: si falla no queda a medias
            let mut tx = self.pool.begin().await?;
            for (index, statement) in split_statements(script.sql).iter().enumerate() {
                if let Err(source) = sqlx::query(statement).execute(&mut *tx).await {
                    tracing::error!("❌ {} sentencia #{} fallida: {}", script.name, index + 1, source);
                    return Err(MigrationError::Statement {
                        file: script.name,
                        index: index + 1,
                        source,
                    });
                }
            }

            sqlx::query("INSERT INTO schema_migrations (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(script.name)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            report.applied.push(script.name);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_are_ordered_and_unique() {
        let names: Vec<&str> = MIGRATIONS.iter().map(|m| m.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn every_create_statement_is_guarded() {
        let ledger = split_statements(LEDGER_DDL);
        let statements = MIGRATIONS
            .iter()
            .flat_map(|m| split_statements(m.sql))
            .chain(ledger);

        for statement in statements {
            let upper = statement.to_uppercase();
            assert!(upper.starts_with("CREATE"), "unexpected statement: {}", statement);
            assert!(upper.contains("IF NOT EXISTS"), "unguarded statement: {}", statement);
            assert!(!upper.contains("DROP "), "destructive statement: {}", statement);
        }
    }

    #[test]
    fn tenant_tables_index_dealer_id() {
        let all_sql: String = MIGRATIONS.iter().map(|m| m.sql).collect();
        for table in ["customers", "test_drive_entries", "vehicle_costs", "return_costs"] {
            let index = format!("ON {} (dealer_id)", table);
            assert!(all_sql.contains(&index), "missing dealer_id index on {}", table);
        }
    }

    #[test]
    fn split_skips_comments_and_literals() {
        let sql = "-- cabecera; con punto y coma\nCREATE TABLE IF NOT EXISTS t (a TEXT DEFAULT 'x;y');\n\nCREATE INDEX IF NOT EXISTS i ON t (a); -- fin";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("'x;y'"));
        assert!(statements[1].starts_with("CREATE INDEX"));
    }
}
