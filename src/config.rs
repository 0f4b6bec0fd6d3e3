//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Default cap on request bodies (2 MiB), plenty for several thousand words.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to (default: 0.0.0.0:8080).
    pub bind: SocketAddr,
    /// Replace the bundled font with a TTF/OTF from disk.
    pub font_path: Option<PathBuf>,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            font_path: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_matches_constant() {
        let parsed: SocketAddr = DEFAULT_BIND.parse().unwrap();
        assert_eq!(ServerConfig::default().bind, parsed);
    }
}
