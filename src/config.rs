// Configuration module for relgraph
// Reads from environment variables with sensible defaults

use std::env;
use std::sync::OnceLock;
use tracing::warn;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum bytes kept from a call expression's source text (RELGRAPH_SNIPPET_MAX_BYTES)
    pub snippet_max_bytes: usize,

    /// Files larger than this are skipped by the directory scanner (RELGRAPH_MAX_FILE_BYTES)
    pub max_file_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snippet_max_bytes: 200,
            max_file_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(val) = env::var("RELGRAPH_SNIPPET_MAX_BYTES") {
            match val.parse() {
                Ok(parsed) => config.snippet_max_bytes = parsed,
                Err(_) => warn!(
                    "invalid RELGRAPH_SNIPPET_MAX_BYTES value: {}, using default: {}",
                    val, config.snippet_max_bytes
                ),
            }
        }

        if let Ok(val) = env::var("RELGRAPH_MAX_FILE_BYTES") {
            match val.parse() {
                Ok(parsed) => config.max_file_bytes = parsed,
                Err(_) => warn!(
                    "invalid RELGRAPH_MAX_FILE_BYTES value: {}, using default: {}",
                    val, config.max_file_bytes
                ),
            }
        }

        config
    }

    /// Get the global configuration instance
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(Config::from_env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.snippet_max_bytes, 200);
        assert_eq!(config.max_file_bytes, 10 * 1024 * 1024);
    }
}
