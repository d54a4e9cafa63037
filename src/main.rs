#![warn(
    clippy::all,
    // clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    // clippy::unwrap_used
)]
use clap::Parser;

use cli::Command;
use logger::LogExt as _;

pub mod calendar;
mod cli;
pub mod config;
pub mod driver;
mod logger;
#[cfg(test)]
mod test_support;

fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = cli::Cli::parse();
    let config = config::init(cli.config).log_error("Could not load the configuration file")?;
    log::debug!("Configuration: {config:?}");

    match cli.command {
        Command::Batch => driver::batch::Job::new(&config)?.run(),
        Command::Serve { listen } => {
            let addr = listen.unwrap_or(config.server.listen);

            tokio::runtime::Runtime::new()?.block_on(driver::server::serve(&config, addr))
        }
    }
}
