use clap::Parser;
use watchlist::{
    Config,
    cli::{Cli, Commands},
    run,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match cli.command {
        // The file may not exist yet.
        Some(Commands::Init) => Config::default(),
        _ => Config::load_from(cli.config.as_deref())?,
    };
    let worker_threads = config.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(run(cli, config))
}
