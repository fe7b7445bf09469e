//! Client context shared by all operations
//!
//! Holds the node set, the operator identity and the default retry settings.
//! Cloning is cheap; clones share the same network and operator.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::channel::{Channel, GrpcChannel};
use crate::config::ClientConfig;
use crate::ids::AccountId;
use crate::network::{Network, Node};
use crate::signer::{Ed25519Signer, Signer};
use crate::{Error, Result};

/// Account paying for transactions, with its signing key
#[derive(Clone)]
pub struct Operator {
    /// Operator account
    pub account_id: AccountId,
    /// Key signing on behalf of the account
    pub signer: Arc<dyn Signer>,
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator")
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

struct ClientInner {
    network: Network,
    operator: RwLock<Option<Operator>>,
    config: ClientConfig,
}

/// Entry point for executing requests against the network
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Build a client connecting to the configured nodes over gRPC.
    ///
    /// Must be called from within a Tokio runtime; connections are established
    /// lazily on first use.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let connect_timeout = Duration::from_millis(config.connect_timeout_ms);
        let mut nodes: Vec<(AccountId, String, Arc<dyn Channel>)> = Vec::with_capacity(config.nodes.len());
        for node in &config.nodes {
            let account_id: AccountId = node.account_id.parse()?;
            let channel = GrpcChannel::connect_lazy(&node.address, connect_timeout).map_err(|e| {
                Error::Config(format!("node {} at {}: {}", account_id, node.address, e))
            })?;
            nodes.push((account_id, node.address.clone(), Arc::new(channel)));
        }

        let operator = match &config.operator {
            Some(op) => Some(Operator {
                account_id: op.account_id.parse()?,
                signer: Arc::new(Ed25519Signer::from_hex(&op.private_key)?),
            }),
            None => None,
        };

        info!(nodes = nodes.len(), operator = operator.is_some(), "Client configured");

        let client = Self::with_channels(nodes, config);
        *client.inner.operator.write() = operator;
        Ok(client)
    }

    /// Build a client over pre-built channels
    pub fn with_channels(
        nodes: Vec<(AccountId, String, Arc<dyn Channel>)>,
        config: ClientConfig,
    ) -> Self {
        let min = Duration::from_millis(config.node_min_backoff_ms);
        let max = Duration::from_millis(config.node_max_backoff_ms);
        let nodes = nodes
            .into_iter()
            .map(|(account_id, address, channel)| {
                Arc::new(Node::new(account_id, address, channel, min, max))
            })
            .collect();

        Self {
            inner: Arc::new(ClientInner {
                network: Network::new(nodes, config.max_node_failures),
                operator: RwLock::new(None),
                config,
            }),
        }
    }

    /// Set the operator paying for transactions
    pub fn set_operator(&self, account_id: AccountId, signer: Arc<dyn Signer>) {
        *self.inner.operator.write() = Some(Operator { account_id, signer });
    }

    /// Remove the operator
    pub fn clear_operator(&self) {
        *self.inner.operator.write() = None;
    }

    /// Current operator
    pub fn operator(&self) -> Option<Operator> {
        self.inner.operator.read().clone()
    }

    /// Current operator account
    pub fn operator_account_id(&self) -> Option<AccountId> {
        self.inner.operator.read().as_ref().map(|op| op.account_id)
    }

    /// Candidate nodes
    pub fn network(&self) -> &Network {
        &self.inner.network
    }

    /// Default settings
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("network", &self.inner.network)
            .field("operator", &self.operator_account_id())
            .finish()
    }
}
