//! Environment-only configuration for the HTTP endpoint
//!
//! - `PORT`: listen port (default 5616)
//! - `LOG_LEVEL`: trace | debug | info | warn | error (default info)
//! - `ADDRESS_SOURCE`: iface | echo (default iface)
//! - `ADDRESS_IFACE`: restrict iface discovery to one interface name
//!
//! Provider credentials are NOT configured here; they arrive with every
//! request as URL parameters.

use anyhow::Result;
use std::env;

/// Default listen port when `PORT` is unset
const DEFAULT_PORT: u16 = 5616;

/// Which discovery strategy backs auto-detected addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSourceKind {
    /// Enumerate local interface addresses (default)
    Iface,
    /// Ask an external IP-echo service
    Echo,
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub address_source: AddressSourceKind,
    pub address_iface: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT must be a port number, got: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let address_source = match env::var("ADDRESS_SOURCE").as_deref() {
            Ok("echo") => AddressSourceKind::Echo,
            Ok("iface") | Err(_) => AddressSourceKind::Iface,
            Ok(other) => anyhow::bail!(
                "ADDRESS_SOURCE '{other}' is not supported. Supported sources: iface, echo"
            ),
        };

        Ok(Self {
            port,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            address_source,
            address_iface: env::var("ADDRESS_IFACE").ok(),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("PORT cannot be 0");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => anyhow::bail!(
                "LOG_LEVEL '{other}' is not valid. Valid levels: trace, debug, info, warn, error"
            ),
        }

        Ok(())
    }
}
