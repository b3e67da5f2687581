mod constants;
mod core_cli;
mod core_ftpcommand;
mod core_network;
mod core_reply;
mod core_transfer;
mod server;
mod session;

use crate::core_cli::Cli;
use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use std::io::Write;

/// Runtime settings, assembled from the command line.
#[derive(Debug)]
pub struct Config {
    pub listen_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    let config = Config {
        listen_port: args.port,
    };

    // Run the FTP server
    server::run(config).await?;

    Ok(())
}
