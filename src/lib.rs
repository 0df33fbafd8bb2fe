pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod services;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::Config;

use cli::{Cli, Commands};
use services::{AccountService, NewAccount, SeaOrmAccountService};

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) | None => run_server(config).await,

        Some(Commands::CreateAdmin { email, name }) => cmd_create_admin(config, &email, name).await,

        Some(Commands::Init) => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists.");
            }
            Ok(())
        }
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("accountd v{} starting...", env!("CARGO_PKG_VERSION"));

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    let port = config.server.port;
    let state = api::create_app_state_from_config(config, prometheus_handle).await?;
    let app = api::router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("Error listening for shutdown: {e}");
            } else {
                info!("Shutdown signal received");
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn cmd_create_admin(
    config: Config,
    email: &str,
    name: Option<String>,
) -> anyhow::Result<()> {
    let store = db::Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    println!("Password for {email}:");
    let mut password = String::new();
    std::io::stdin().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);

    let service = SeaOrmAccountService::new(store, config.security.clone());

    let mut new_account = NewAccount::new(email, password).superuser();
    if let Some(name) = name {
        new_account = new_account.with_name(name);
    }

    match service.create_account(new_account).await {
        Ok(account) => {
            println!("✓ Created admin account: {}", account.email);
            Ok(())
        }
        Err(e) => anyhow::bail!("Failed to create admin account: {e}"),
    }
}
