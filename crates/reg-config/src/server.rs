//! HTTP listener configuration.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default listen address.
fn default_listen_addr() -> String {
    String::from("127.0.0.1:8000")
}

/// Default request body cap (10 MiB), which bounds the marksheet upload.
const fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address to bind (e.g., `0.0.0.0:8000`).
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Parse `listen_addr` into a socket address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the address does not parse.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                field: "server.listen_addr".into(),
                reason: format!("'{}': {e}", self.listen_addr),
            })
    }
}
