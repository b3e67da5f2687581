use crate::core_network::network;
use crate::Config;
use anyhow::Result;
use log::{error, info};

/// Runs the FTP server with the provided configuration.
///
/// This function starts the control-connection listener and only returns
/// if the listener itself fails; per-session failures are logged and
/// contained by the session tasks.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config: {:?}", config);

    match network::start_server(config.listen_port).await {
        Ok(_) => info!("Server stopped."),
        Err(e) => {
            error!("Failed to run server: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
