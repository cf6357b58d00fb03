//! CLI argument definitions using clap
//!
//! Commands:
//! - filedrop serve --config <path> [--port <port>]
//! - filedrop shell --api-gateway <url> [--owner <owner>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// filedrop - owner-scoped file storage with temporary download links
#[derive(Parser, Debug)]
#[command(name = "filedrop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP file service
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./filedrop.json")]
        config: PathBuf,

        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Interactive shell against a running service
    Shell {
        /// Base URL of the service, without the API path
        #[arg(long, env = "API_GATEWAY")]
        api_gateway: String,

        /// Owner used for `put` and `view`
        #[arg(long, default_value = "p")]
        owner: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["filedrop", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Command::Serve { config, port } => {
                assert_eq!(config, PathBuf::from("./filedrop.json"));
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_shell() {
        let cli = Cli::try_parse_from([
            "filedrop",
            "shell",
            "--api-gateway",
            "http://localhost:54321",
            "--owner",
            "alice",
        ])
        .unwrap();
        match cli.command {
            Command::Shell { api_gateway, owner } => {
                assert_eq!(api_gateway, "http://localhost:54321");
                assert_eq!(owner, "alice");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
