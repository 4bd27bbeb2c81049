// Session configuration.
//
// Mirrors what consumers can express (server URL, TLS trust, timeout)
// and translates it into the api crate's transport settings.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use pcdex_api::{TlsMode, TransportConfig};

/// TLS verification policy for the server connection.
#[derive(Debug, Clone)]
pub enum TlsVerification {
    SystemDefaults,
    CustomCa(PathBuf),
    DangerAcceptInvalid,
}

/// Configuration for an [`Inventory`](crate::Inventory) session.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Base URL of the inventory server.
    pub url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl InventoryConfig {
    /// Config with default TLS and timeout settings.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::SystemDefaults,
            timeout: Duration::from_secs(30),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
