//! problem-server: answers text problems over TCP.
//!
//! Each connection carries one request:
//! - `<problem id>\n` followed by the input lines that problem needs
//! - the server replies with one line of text and closes
//!
//! Configuration comes from CLI arguments or a TOML file.

use problem_server::config::Config;
use problem_server::logging;
use problem_server::server::Server;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let log_file = logging::init(&config.log_level, config.log_dir.as_deref())?;

    info!(
        host = %config.host,
        port = config.port,
        report_errors = config.report_errors,
        log_file = ?log_file,
        "Starting problem server"
    );

    let server = Server::new(config);
    server.run().await?;
    Ok(())
}
