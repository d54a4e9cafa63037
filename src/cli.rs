use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[clap(bin_name = env!("CARGO_PKG_NAME"), version = env!("CARGO_PKG_VERSION"), about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// Path to the configuration file, built-in defaults when omitted
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fix every configured department feed and deliver the results
    Batch,
    /// Serve corrected feeds for the export arguments of each request
    Serve {
        /// Address to listen on, overrides the configuration
        #[clap(long)]
        listen: Option<SocketAddr>,
    },
}
