use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod graphics;
mod render;

use config::{Mode, Opts};

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match opts.mode {
        Mode::Cli => cli::main(&opts)?,
        Mode::Gui => graphics::main(&opts)?,
    }

    Ok(())
}
