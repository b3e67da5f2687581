use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "ferroftpd", about = "A minimal active-mode FTP server.")]
pub struct Cli {
    /// TCP port the control-connection listener binds to
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,
}
