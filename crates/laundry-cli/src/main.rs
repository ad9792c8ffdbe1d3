use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use laundry_application::{AlwaysConfirm, ConfirmPrompt};
use laundry_core::config::LogSettings;
use laundry_infrastructure::{AdminPaths, ConfigService, ServiceType};

mod commands;
mod context;
mod prompt;
mod render;

use commands::catalog::{CatalogOp, ServiceAction, ServiceFields, UserAction, UserFields};
use context::AppContext;
use prompt::ReadlineConfirm;

#[derive(Parser)]
#[command(name = "laundry-admin")]
#[command(author, version, about = "Laundry Admin - manage users and services of the laundry API", long_about = None)]
struct Cli {
    /// Directory holding config.toml, session.json and logs/
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in operator
    Whoami,
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage laundry services
    Services {
        #[command(subcommand)]
        action: ServiceAction,
    },
    /// Interactive workspace with tabs
    Shell,
}

/// Installs the stderr logger and, when enabled, a daily rolling file under
/// `<config>/logs/`. `RUST_LOG` overrides the configured level.
fn init_logging(paths: &AdminPaths, settings: &LogSettings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    if !settings.file {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    }

    let log_dir = paths.get_path(ServiceType::Logs)?.into_path_buf();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("laundry-admin")
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create log file appender")?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = AdminPaths::new(cli.config_dir.as_deref());
    let config_service = ConfigService::new(&paths)?;
    let config = config_service.get_config();

    let _log_guard = init_logging(&paths, &config.log)?;
    tracing::debug!("[Bootstrap] Config loaded from {:?}", config_service.path());

    let confirm: Arc<dyn ConfirmPrompt> = if cli.yes {
        Arc::new(AlwaysConfirm)
    } else {
        Arc::new(ReadlineConfirm)
    };

    let ctx = AppContext::bootstrap(&paths, config, confirm).await?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&ctx, email, password).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::Users { action } => {
            ctx.require_login().await?;
            commands::catalog::run(&ctx, &ctx.users, CatalogOp::<UserFields>::from(action)).await
        }
        Commands::Services { action } => {
            ctx.require_login().await?;
            commands::catalog::run(&ctx, &ctx.services, CatalogOp::<ServiceFields>::from(action))
                .await
        }
        Commands::Shell => commands::shell::run(&ctx).await,
    }
}
