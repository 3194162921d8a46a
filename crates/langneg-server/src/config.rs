//! Server configuration
//!
//! Settings come from an optional TOML file, overridden by CLI flags and
//! `LANGNEG_*` environment variables:
//!
//! ```toml
//! bind = "0.0.0.0:8080"
//! strict = false
//!
//! [negotiation]
//! priorities = ["de", "fu", "en"]
//! accept_header = "Accept-Language"
//! attribute_name = "X-language-negotiated"
//! success_level = "info"
//! ```

use clap::Parser;
use langneg_api::LogFormat;
use langneg_core::{ConfigError, ConfigResult, NegotiationConfig};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "langneg-server", version, about = "Accept-Language negotiation server")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "LANGNEG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, env = "LANGNEG_BIND")]
    pub bind: Option<SocketAddr>,

    /// Comma-separated priority languages, most preferred first
    #[arg(short, long, env = "LANGNEG_PRIORITIES", value_delimiter = ',')]
    pub priorities: Vec<String>,

    /// Reject headers containing malformed entries instead of skipping them
    #[arg(long, env = "LANGNEG_STRICT")]
    pub strict: bool,

    /// Log output format (pretty or json)
    #[arg(long, env = "LANGNEG_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Configuration file contents
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    #[serde(default)]
    pub strict: bool,
    pub negotiation: NegotiationConfig,
}

impl ServerConfig {
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        config.negotiation.validate()?;
        Ok(config)
    }

    /// Merge the file (if any) with CLI overrides.
    pub fn resolve(file: Option<&str>, cli: &Cli) -> ConfigResult<Self> {
        let mut config = match file {
            Some(contents) => Self::from_toml_str(contents)?,
            None => Self {
                bind: default_bind(),
                strict: false,
                negotiation: NegotiationConfig::new(cli.priorities.iter().cloned())?,
            },
        };

        if let Some(bind) = cli.bind {
            config.bind = bind;
        }
        if !cli.priorities.is_empty() {
            config.negotiation = config.negotiation.with_priorities(cli.priorities.iter().cloned())?;
        }
        config.strict |= cli.strict;

        Ok(config)
    }
}
