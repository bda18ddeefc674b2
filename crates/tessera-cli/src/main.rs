mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use tessera_auth::{TokenError, TokenService};
use tessera_cache::{CacheBackendKind, CacheError, create_cache};

use cli::{Cli, Commands};
use crate::config::AppConfig;
use output::print_error;

/// Token rejected, or any other request failure.
const EXIT_FAILURE: i32 = 1;
/// Configuration could not be loaded or is invalid.
const EXIT_CONFIG: i32 = 2;
/// Token store or random source unavailable.
const EXIT_BACKEND: i32 = 3;

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound) {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    observability::init_tracing();

    let cli = Cli::parse();

    let cfg = match config::loader::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            print_error(&format!("Configuration error: {e}"));
            std::process::exit(EXIT_CONFIG);
        }
    };
    observability::apply_logging_level(&cfg.logging.level);

    if let Err(e) = run(&cli, &cfg).await {
        print_error(&format!("{e:#}"));
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: &Cli, cfg: &AppConfig) -> Result<()> {
    if cfg.cache.backend == CacheBackendKind::Local {
        tracing::warn!(
            "local token store does not outlive this process; use cache.backend = \"redis\" to verify tokens across invocations"
        );
    }

    let cache = create_cache(&cfg.cache)
        .await
        .context("failed to initialize token store")?;
    let service = TokenService::new(cfg.security.secrets(), cache);

    match &cli.command {
        Commands::Oat(args) => commands::oat::run(&service, &cfg.security, args).await,
        Commands::Spt(args) => commands::spt::run(&service, &cfg.security, args).await,
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<TokenError>() {
            return if e.is_server_error() {
                EXIT_BACKEND
            } else {
                EXIT_FAILURE
            };
        }
        if cause.downcast_ref::<CacheError>().is_some() {
            return EXIT_BACKEND;
        }
    }
    EXIT_FAILURE
}
