//! Runner de migraciones
//!
//! Aplica los scripts embebidos sobre `DATABASE_URL` y cierra el pool
//! al terminar, tanto si la ejecución tiene éxito como si falla.

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dealership_manager::config::DatabaseConfig;
use dealership_manager::database::{MigrationRunner, RunOptions, MIGRATIONS};

#[derive(Parser, Debug)]
#[command(name = "migrate")]
#[command(about = "Apply the dealership database schema migrations")]
#[command(version)]
struct Args {
    #[arg(long, help = "List pending migrations without executing them")]
    dry_run: bool,

    #[arg(long, help = "Execute every migration again, including recorded ones")]
    reapply: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")))
        .init();

    let args = Args::parse();

    let config = DatabaseConfig::from_lookup(&|key: &str| std::env::var(key).ok())?
        .context("DATABASE_URL must be set")?;
    let pool = config.create_pool().await.context("failed to connect to the database")?;

    let options = RunOptions {
        dry_run: args.dry_run,
        reapply: args.reapply,
    };
    let outcome = MigrationRunner::new(&pool).run(MIGRATIONS, options).await;
    pool.close().await;

    match outcome {
        Ok(report) => {
            if options.dry_run {
                info!("🔎 Dry run: {} pendientes, {} ya aplicadas", report.pending.len(), report.skipped.len());
                for name in &report.pending {
                    info!("   ⏳ {}", name);
                }
            } else {
                info!("✅ Migraciones: {} aplicadas, {} omitidas", report.applied.len(), report.skipped.len());
                for name in &report.applied {
                    info!("   📜 {}", name);
                }
            }
            Ok(())
        }
        Err(e) => {
            error!("❌ Migración fallida: {}", e);
            std::process::exit(1);
        }
    }
}
