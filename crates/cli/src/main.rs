use anyhow::Context;
use bookstore_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bookstore", version, about = "Book catalogue service")]
struct Cli {
    /// Override the database URL from configuration
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply migrations and serve the HTTP API
    Serve {
        /// Override the listen port from configuration
        #[arg(long)]
        port: Option<u16>,
    },
    /// Apply pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load bookstore settings")?;
    if let Some(url) = cli.database_url {
        settings.database.url = url;
    }
    bookstore_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            bookstore_app::bootstrap::run(settings).await
        }
        Command::Migrate => {
            let applied = bookstore_app::bootstrap::migrate(&settings).await?;
            tracing::info!(applied, "migrations applied");
            println!("applied {} migration(s)", applied);
            Ok(())
        }
    }
}
