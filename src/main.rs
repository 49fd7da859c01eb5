//! polyglot-service entry point.
//!
//! Parses the command line, loads optional TOML configuration, initializes
//! tracing, builds the router and serves `/health` until shut down.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use polyglot_service::config::{
    AppConfig, LoggingConfig, DEFAULT_BIND_ADDR, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER,
};
use polyglot_service::{create_router, http, AppState, StartupError};

/// Rust service template exposing a JSON health check
#[derive(Parser, Debug)]
#[command(name = "polyglot-service", version, about, after_help = AFTER_HELP)]
struct Args {
    /// Path to configuration file (optional when left at the default)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "polyglot_service=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Address to bind, overriding the config file
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding PORT and the config file
    #[arg(short, long)]
    port: Option<u16>,
}

const AFTER_HELP: &str = const_format::formatcp!(
    "Listens on {} unless configured otherwise. A non-empty PORT environment variable overrides the configured port.",
    DEFAULT_BIND_ADDR
);

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    match run(args, &log_filter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Without a subscriber the error would vanish
            if matches!(e, StartupError::Logging(_)) {
                eprintln!("Error: {}", e);
            } else {
                tracing::error!(error = %e, "Startup failed");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, log_filter: &str) -> Result<(), StartupError> {
    let explicit = args.config.is_some();
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

    let config = match load_config(config_path, explicit, args.host, args.port) {
        Ok(config) => config,
        Err(e) => {
            // Report the failure through the default text subscriber
            if let Err(log_err) = init_tracing(log_filter, &LoggingConfig::default()) {
                eprintln!("Error: {}", e);
                return Err(log_err);
            }
            return Err(e);
        }
    };
    init_tracing(log_filter, &config.logging)?;

    tracing::info!(
        config = %config_path,
        from_file = explicit || std::path::Path::new(config_path).exists(),
        "Loaded configuration"
    );

    let state = AppState::new(&config)?;
    let app = create_router(state);

    http::start_server(app, &config).await?;
    Ok(())
}

/// File (or defaults), then PORT, then CLI flags.
fn load_config(
    path: &str,
    explicit: bool,
    host: Option<String>,
    port: Option<u16>,
) -> Result<AppConfig, StartupError> {
    let mut config = AppConfig::load_or_default(path, explicit)?;
    let env_port = AppConfig::port_from_env(std::env::var("PORT").ok().as_deref())?;
    config.apply_overrides(host, port.or(env_port));
    config.validate()?;
    Ok(config)
}

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// the startup line.
fn init_tracing(filter: &str, logging: &LoggingConfig) -> Result<(), StartupError> {
    let filter = EnvFilter::try_new(filter).map_err(|e| StartupError::Logging(e.to_string()))?;

    let result = if logging.is_json() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| StartupError::Logging(e.to_string()))
}
