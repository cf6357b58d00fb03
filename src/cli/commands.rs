//! CLI command implementations

use std::io;
use std::path::Path;

use crate::config::Config;
use crate::http_server::HttpServer;
use crate::observability::{log_event, log_event_with_fields, Event};

use super::args::Command;
use super::client::ApiClient;
use super::errors::{CliError, CliResult};
use super::shell::Shell;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Shell { api_gateway, owner } => shell(&api_gateway, &owner),
    }
}

/// Load configuration and serve the HTTP API until interrupted
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    log_event(Event::BootStart);

    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    let bucket_path = config.bucket_path().display().to_string();
    let listing_mode = format!("{:?}", config.listing_mode);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("bucket_path", bucket_path.as_str()),
            ("listing_mode", listing_mode.as_str()),
            ("public_base_url", config.public_base_url.as_str()),
        ],
    );

    let server = HttpServer::from_config(&config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(server.start()).map_err(|e| {
        let reason = e.to_string();
        log_event_with_fields(Event::BootFailed, &[("reason", reason.as_str())]);
        CliError::boot_failed(format!("HTTP server failed: {}", e))
    })
}

/// Interactive shell on stdin/stdout, files read from and written to the
/// current directory
pub fn shell(api_gateway: &str, owner: &str) -> CliResult<()> {
    if owner.is_empty() {
        return Err(CliError::config_error("Owner's name cannot be empty."));
    }

    let client = ApiClient::new(api_gateway);
    let workdir = std::env::current_dir()?;
    let shell = Shell::new(&client, owner, workdir);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell.run(stdin.lock(), &mut stdout)
}
