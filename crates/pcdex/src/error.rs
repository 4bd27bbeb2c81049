//! CLI error types with miette diagnostics.
//!
//! Maps library errors into user-facing diagnostics with actionable
//! help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the inventory server")]
    #[diagnostic(
        code(pcdex::connection_failed),
        help(
            "Check that the server is running and the URL is right.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("TLS error")]
    #[diagnostic(
        code(pcdex::tls_error),
        help(
            "The server certificate could not be verified.\n\
             Use --insecure (-k) for self-signed setups, or --ca-cert <PEM>.\n\
             Reason: {reason}"
        )
    )]
    TlsError { reason: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource} not found: {message}")]
    #[diagnostic(code(pcdex::not_found), help("Run: pcdex {list_command} to see what exists"))]
    NotFound {
        resource: String,
        message: String,
        list_command: String,
    },

    #[error("Conflict: {message}")]
    #[diagnostic(code(pcdex::conflict))]
    Conflict { message: String },

    // ── Server ───────────────────────────────────────────────────────
    #[error("Server error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    #[diagnostic(code(pcdex::server_error))]
    Server {
        message: String,
        status: Option<u16>,
    },

    #[error("The server answered outside its contract: {message}")]
    #[diagnostic(
        code(pcdex::malformed_response),
        help("The server is reachable but returned an unexpected payload. Check its version.")
    )]
    MalformedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pcdex::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No inventory server configured")]
    #[diagnostic(
        code(pcdex::no_server),
        help(
            "Pass --server <URL>, set PCDEX_SERVER, or add `server = \"...\"`\n\
             to the config file at: {path}"
        )
    )]
    NoServer { path: String },

    #[error(transparent)]
    #[diagnostic(code(pcdex::config))]
    Config(Box<figment::Error>),

    // ── Interactive / IO ─────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library error → CliError mapping ─────────────────────────────────

impl From<pcdex_core::Error> for CliError {
    fn from(err: pcdex_core::Error) -> Self {
        match err {
            pcdex_core::Error::InvalidArgument { message } => CliError::Validation {
                field: "argument".into(),
                reason: message,
            },

            pcdex_core::Error::Remote {
                resource,
                status: Some(404),
                message,
                ..
            } => CliError::NotFound {
                list_command: match resource {
                    "tag" => "tags list".into(),
                    _ => "pcs list".into(),
                },
                resource: resource.into(),
                message,
            },

            pcdex_core::Error::Remote {
                status: Some(409),
                message,
                ..
            } => CliError::Conflict { message },

            pcdex_core::Error::Remote {
                status: None,
                message,
                ..
            } => CliError::ConnectionFailed { reason: message },

            pcdex_core::Error::Remote {
                status, message, ..
            } => CliError::Server { message, status },

            pcdex_core::Error::Decode { message, .. } => {
                CliError::MalformedResponse { message }
            }

            pcdex_core::Error::InvalidUrl(e) => CliError::Validation {
                field: "server".into(),
                reason: format!("invalid URL: {e}"),
            },

            pcdex_core::Error::Tls(reason) => CliError::TlsError { reason },
        }
    }
}
