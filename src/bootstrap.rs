//! Process wiring: database, migrations, module lifecycle, HTTP server.

use anyhow::Context;
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use sqlx::SqlitePool;

use crate::modules;

/// Connect to the database and register every module against it.
pub async fn prepare(settings: &Settings) -> anyhow::Result<(SqlitePool, ModuleRegistry)> {
    let pool = bookstore_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &pool);

    Ok((pool, registry))
}

/// Apply pending module migrations and return how many ran.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let (pool, registry) = prepare(settings).await?;
    let applied = bookstore_db::migrate(&pool, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    pool.close().await;
    Ok(applied)
}

/// Run the service until Ctrl-C or SIGTERM.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookstore bootstrap starting"
    );

    let (pool, registry) = prepare(&settings).await?;
    let applied = bookstore_db::migrate(&pool, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied, "migrations complete");

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!("bookstore bootstrap complete");

    let served = bookstore_http::start_server(&registry, &settings, shutdown_signal()).await;

    registry.stop_modules().await?;
    pool.close().await;
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
