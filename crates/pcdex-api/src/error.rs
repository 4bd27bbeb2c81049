use thiserror::Error;

/// Top-level error type for the `pcdex-api` crate.
///
/// Three failure classes matter to callers: caller misuse caught before
/// any network I/O (`InvalidArgument`), transport or HTTP-status failure
/// (`Remote`), and a reachable server answering outside the wire contract
/// (`Decode`). The distinction lets consumers tell "server unreachable"
/// apart from "server reachable but contract violated".
#[derive(Debug, Error)]
pub enum Error {
    /// Required identifier missing or empty. No request was issued.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Transport failure (connection refused, DNS, timeout) or a non-2xx
    /// response. `status` is `None` when the request never got an answer.
    #[error("{resource} {action} failed: {message}")]
    Remote {
        resource: &'static str,
        action: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// 2xx response whose body did not decode as the expected payload.
    #[error("{resource} {action} returned a malformed payload: {message}")]
    Decode {
        resource: &'static str,
        action: &'static str,
        message: String,
        body: String,
    },

    /// Base URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup failed while building the HTTP client.
    #[error("TLS error: {0}")]
    Tls(String),
}

impl Error {
    /// The HTTP status carried by this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" response.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the server rejected the request as a conflict
    /// (duplicate tag name, tag already assigned).
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Returns `true` if the failure was caught client-side, before any
    /// network call.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
