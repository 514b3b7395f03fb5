//! Runtime configuration for check runs.
//!
//! Configuration is built once at startup from CLI arguments and threaded
//! into the pipeline as an explicit value; stages only ever read it. The
//! server addresses are carried verbatim for the engine boundary, with no
//! validation performed here.

use crate::output::OutputFormat;

/// Default gremlin server address
pub const DEFAULT_GREMLIN_SERVER: &str = "localhost:8182";

/// Default zookeeper server address
pub const DEFAULT_ZK_SERVER: &str = "localhost:2181";

/// Settings shared by every pipeline stage, read-only after startup.
#[derive(Debug, Clone)]
pub struct FsckConfig {
    /// Human-readable text or one JSON line per check
    pub output_format: OutputFormat,
    /// Gremlin server address
    pub gremlin_server: String,
    /// Zookeeper server address
    pub zk_server: String,
}

impl Default for FsckConfig {
    fn default() -> Self {
        FsckConfig {
            output_format: OutputFormat::Human,
            gremlin_server: DEFAULT_GREMLIN_SERVER.to_string(),
            zk_server: DEFAULT_ZK_SERVER.to_string(),
        }
    }
}

impl FsckConfig {
    /// True when structured JSON output is active.
    pub fn json_output(&self) -> bool {
        self.output_format == OutputFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_human_mode() {
        let config = FsckConfig::default();
        assert!(!config.json_output());
        assert_eq!(config.gremlin_server, DEFAULT_GREMLIN_SERVER);
        assert_eq!(config.zk_server, DEFAULT_ZK_SERVER);
    }

    #[test]
    fn test_json_output_flag() {
        let config = FsckConfig {
            output_format: OutputFormat::Json,
            ..FsckConfig::default()
        };
        assert!(config.json_output());
    }
}
