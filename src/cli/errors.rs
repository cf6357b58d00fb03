//! CLI-specific error types

use std::fmt;
use std::io;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Local I/O error (stdin/stdout, files)
    IoError,
    /// Server failed to start
    BootFailed,
    /// Request to the service failed or was refused
    RequestFailed,
    /// Service answered with an unexpected body
    InvalidResponse,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FILEDROP_CLI_CONFIG_ERROR",
            Self::IoError => "FILEDROP_CLI_IO_ERROR",
            Self::BootFailed => "FILEDROP_CLI_BOOT_FAILED",
            Self::RequestFailed => "FILEDROP_CLI_REQUEST_FAILED",
            Self::InvalidResponse => "FILEDROP_CLI_INVALID_RESPONSE",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RequestFailed, msg)
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidResponse, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::invalid_response(e.to_string())
        } else {
            Self::request_failed(e.to_string())
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
