//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ids::AccountId;
use crate::{Error, Result};

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Network nodes
    pub nodes: Vec<NodeConfig>,

    /// Operator paying for transactions
    pub operator: Option<OperatorConfig>,

    /// Attempts per request before giving up
    pub max_attempts: u32,

    /// First delay between attempts (milliseconds)
    pub min_backoff_ms: u64,

    /// Upper bound on the delay between attempts (milliseconds)
    pub max_backoff_ms: u64,

    /// Deadline for a single network call (milliseconds)
    pub grpc_deadline_ms: u64,

    /// Overall deadline of one logical operation (milliseconds)
    pub request_timeout_ms: u64,

    /// First readmission delay of a failing node (milliseconds)
    pub node_min_backoff_ms: u64,

    /// Longest readmission delay of a failing node (milliseconds)
    pub node_max_backoff_ms: u64,

    /// Failures after which a node is no longer used at all
    pub max_node_failures: Option<u32>,

    /// Connection establishment timeout (milliseconds)
    pub connect_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            operator: None,
            max_attempts: 10,
            min_backoff_ms: 250,
            max_backoff_ms: 8_000,
            grpc_deadline_ms: 10_000,
            request_timeout_ms: 120_000,     // 2 minutes
            node_min_backoff_ms: 8_000,
            node_max_backoff_ms: 3_600_000,  // 1 hour
            max_node_failures: None,
            connect_timeout_ms: 10_000,
        }
    }
}

/// A network node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node account, `shard.realm.num`
    pub account_id: String,

    /// gRPC address, `host:port`
    pub address: String,
}

/// Operator account and key
#[derive(Clone, Serialize, Deserialize)]
pub struct OperatorConfig {
    /// Operator account, `shard.realm.num`
    pub account_id: String,

    /// Hex encoded Ed25519 secret
    pub private_key: String,
}

impl std::fmt::Debug for OperatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorConfig")
            .field("account_id", &self.account_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl ClientConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = ClientConfig::default();

        if let Ok(nodes) = std::env::var("LEDGER_SDK_NODES") {
            config.nodes = parse_node_list(&nodes)?;
        }

        if let (Ok(account_id), Ok(private_key)) = (
            std::env::var("LEDGER_SDK_OPERATOR_ID"),
            std::env::var("LEDGER_SDK_OPERATOR_KEY"),
        ) {
            config.operator = Some(OperatorConfig {
                account_id,
                private_key,
            });
        }

        if let Ok(value) = std::env::var("LEDGER_SDK_MAX_ATTEMPTS") {
            config.max_attempts = value
                .parse()
                .map_err(|e| Error::Config(format!("LEDGER_SDK_MAX_ATTEMPTS: {}", e)))?;
        }

        if let Ok(value) = std::env::var("LEDGER_SDK_REQUEST_TIMEOUT_MS") {
            config.request_timeout_ms = value
                .parse()
                .map_err(|e| Error::Config(format!("LEDGER_SDK_REQUEST_TIMEOUT_MS: {}", e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants between fields
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".to_string()));
        }
        if self.min_backoff_ms > self.max_backoff_ms {
            return Err(Error::Config(format!(
                "min_backoff_ms ({}) exceeds max_backoff_ms ({})",
                self.min_backoff_ms, self.max_backoff_ms
            )));
        }
        for node in &self.nodes {
            node.account_id.parse::<AccountId>()?;
        }
        Ok(())
    }

    /// First delay between attempts
    pub fn min_backoff(&self) -> Duration {
        Duration::from_millis(self.min_backoff_ms)
    }

    /// Upper bound on the delay between attempts
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// Deadline of a single network call
    pub fn grpc_deadline(&self) -> Duration {
        Duration::from_millis(self.grpc_deadline_ms)
    }

    /// Overall deadline of one logical operation
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Parse `0.0.3=host:port,0.0.4=host:port`
fn parse_node_list(value: &str) -> Result<Vec<NodeConfig>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (account_id, address) = entry
                .split_once('=')
                .ok_or_else(|| Error::Config(format!("expected account=address, got {:?}", entry)))?;
            Ok(NodeConfig {
                account_id: account_id.trim().to_string(),
                address: address.trim().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.max_attempts, 10);
        assert_eq!(config.min_backoff(), Duration::from_millis(250));
        assert_eq!(config.max_backoff(), Duration::from_secs(8));
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
        assert!(config.operator.is_none());
    }

    #[test]
    fn test_parse_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            max_attempts = 3

            [[nodes]]
            account_id = "0.0.3"
            address = "127.0.0.1:50211"

            [operator]
            account_id = "0.0.1001"
            private_key = "aa"
            "#,
        )
        .unwrap();

        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.min_backoff_ms, 250);
        assert_eq!(config.nodes.len(), 1);
        assert_eq!(config.operator.unwrap().account_id, "0.0.1001");
    }

    #[test]
    fn test_parse_node_list() {
        let nodes = parse_node_list("0.0.3=a:1, 0.0.4=b:2,").unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].account_id, "0.0.4");
        assert_eq!(nodes[1].address, "b:2");

        assert!(parse_node_list("0.0.3").is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = ClientConfig::default();
        config.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.nodes.push(NodeConfig {
            account_id: "not-an-id".to_string(),
            address: "x:1".to_string(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_operator_debug_redacts_key() {
        let operator = OperatorConfig {
            account_id: "0.0.2".to_string(),
            private_key: "deadbeef".to_string(),
        };
        assert!(!format!("{:?}", operator).contains("deadbeef"));
    }
}
