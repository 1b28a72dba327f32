pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod services;

use std::io;

use clap::CommandFactory;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
pub use config::Config;
use db::Store;

/// Installs the global subscriber. `RUST_LOG` wins over `general.log_level`.
/// An already installed subscriber is kept.
pub fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .ok();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init().ok();
    }
}

fn prepare(config: &Config) -> anyhow::Result<()> {
    config.validate()?;
    init_tracing(config);
    Ok(())
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut out = io::stdout();

    match command {
        Commands::Init => cli::cmd_init(cli.config.as_deref(), &mut out),

        Commands::Serve => {
            prepare(&config)?;
            cli::cmd_serve(config).await
        }

        Commands::Initdb { drop } => {
            prepare(&config)?;
            let general = &config.general;
            let store = Store::connect(
                &general.database_path,
                general.max_db_connections,
                general.min_db_connections,
            )
            .await?;
            cli::cmd_initdb(&store, drop, &mut out).await
        }

        Commands::Forge => {
            prepare(&config)?;
            let store = Store::from_config(&config).await?;
            cli::cmd_forge(&store, &config.security, &mut out).await
        }

        Commands::Admin { username, password } => {
            prepare(&config)?;
            let store = Store::from_config(&config).await?;
            info!("Updating administrator account");
            cli::cmd_admin(&store, &config.security, &username, &password, &mut out).await
        }
    }
}
