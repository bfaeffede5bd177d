//! SQLite connection pool and module migration runner.

use anyhow::Context;
use bookstore_kernel::{settings::DatabaseSettings, Migration};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

const MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

/// Open a connection pool for the configured database.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    tracing::info!(target: "bookstore-db", url = %settings.url, "connecting to database");

    let mut options = SqlitePoolOptions::new().max_connections(settings.max_connections);

    // An in-memory database lives and dies with its single connection.
    if settings.url.contains(":memory:") {
        options = options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    options
        .connect(&settings.url)
        .await
        .with_context(|| format!("failed to connect to database '{}'", settings.url))
}

/// Apply every migration not yet recorded in `_migrations`, in the given order.
///
/// Returns the number of migrations applied by this call.
pub async fn migrate(pool: &SqlitePool, migrations: &[(String, Migration)]) -> anyhow::Result<usize> {
    sqlx::query(MIGRATIONS_TABLE)
        .execute(pool)
        .await
        .context("failed to create migrations table")?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let seen: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM _migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(migration.id)
                .fetch_one(pool)
                .await
                .context("failed to read migrations table")?;
        if seen > 0 {
            tracing::debug!(target: "bookstore-db", module, id = migration.id, "migration already applied");
            continue;
        }

        let mut tx = pool.begin().await.context("failed to open migration transaction")?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
        sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .context("failed to record migration")?;
        tx.commit().await.context("failed to commit migration")?;

        tracing::info!(target: "bookstore-db", module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
