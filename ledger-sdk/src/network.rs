//! Network nodes and node selection
//!
//! Every node tracks its own health. A node that fails at the transport level
//! is parked for an exponentially growing readmission delay and comes back
//! automatically once the delay has passed; a success resets it. When a
//! failure budget is configured, a node that exhausts it is not selected
//! again.
//!
//! Health state sits behind a per-node mutex, so concurrent operations
//! sharing a client update it atomically.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::channel::Channel;
use crate::ids::AccountId;
use crate::metrics::NODE_UNHEALTHY_TOTAL;
use crate::{Error, Result};

/// Health bookkeeping of one node
#[derive(Debug, Clone)]
struct NodeHealth {
    consecutive_failures: u32,
    total_failures: u32,
    readmit_at: Option<Instant>,
}

/// A network node reachable through a [`Channel`]
pub struct Node {
    account_id: AccountId,
    address: String,
    channel: Arc<dyn Channel>,
    health: Mutex<NodeHealth>,
    min_backoff: Duration,
    max_backoff: Duration,
}

impl Node {
    /// Create a node with the given readmission backoff bounds
    pub fn new(
        account_id: AccountId,
        address: impl Into<String>,
        channel: Arc<dyn Channel>,
        min_backoff: Duration,
        max_backoff: Duration,
    ) -> Self {
        Self {
            account_id,
            address: address.into(),
            channel,
            health: Mutex::new(NodeHealth {
                consecutive_failures: 0,
                total_failures: 0,
                readmit_at: None,
            }),
            min_backoff,
            max_backoff,
        }
    }

    /// Node account
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Node address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Channel to the node
    pub fn channel(&self) -> &Arc<dyn Channel> {
        &self.channel
    }

    /// Whether the node's readmission delay has passed
    pub fn is_healthy(&self) -> bool {
        match self.health.lock().readmit_at {
            Some(at) => Instant::now() >= at,
            None => true,
        }
    }

    /// Failures recorded over the node's lifetime
    pub fn total_failures(&self) -> u32 {
        self.health.lock().total_failures
    }

    /// Park the node after a failure
    pub fn mark_unhealthy(&self) {
        let mut health = self.health.lock();
        health.consecutive_failures = health.consecutive_failures.saturating_add(1);
        health.total_failures = health.total_failures.saturating_add(1);

        let exponent = health.consecutive_failures.saturating_sub(1).min(31);
        let backoff = self
            .min_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff);
        health.readmit_at = Some(Instant::now() + backoff);

        NODE_UNHEALTHY_TOTAL
            .with_label_values(&[self.account_id.to_string().as_str()])
            .inc();
        warn!(
            node = %self.account_id,
            failures = health.consecutive_failures,
            backoff_ms = backoff.as_millis() as u64,
            "Node marked unhealthy"
        );
    }

    /// Reset the node after a successful exchange
    pub fn mark_healthy(&self) {
        let mut health = self.health.lock();
        if health.consecutive_failures > 0 {
            debug!(node = %self.account_id, "Node readmitted");
        }
        health.consecutive_failures = 0;
        health.readmit_at = None;
    }

    fn readmit_at(&self) -> Option<Instant> {
        self.health.lock().readmit_at
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("account_id", &self.account_id)
            .field("address", &self.address)
            .field("health", &*self.health.lock())
            .finish()
    }
}

/// The set of candidate nodes
#[derive(Debug)]
pub struct Network {
    nodes: Vec<Arc<Node>>,
    cursor: AtomicUsize,
    max_node_failures: Option<u32>,
}

impl Network {
    /// Create a network; selection starts at a random node
    pub fn new(nodes: Vec<Arc<Node>>, max_node_failures: Option<u32>) -> Self {
        let start = if nodes.is_empty() {
            0
        } else {
            rand::random::<usize>() % nodes.len()
        };
        Self {
            nodes,
            cursor: AtomicUsize::new(start),
            max_node_failures,
        }
    }

    /// All nodes
    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    /// Node with the given account
    pub fn node(&self, account_id: AccountId) -> Option<Arc<Node>> {
        self.nodes
            .iter()
            .find(|node| node.account_id == account_id)
            .cloned()
    }

    /// Next node in round-robin order.
    ///
    /// Skips parked nodes and nodes over the failure budget. When every usable
    /// node is parked, returns the one readmitted soonest.
    pub fn next_node(&self) -> Result<Arc<Node>> {
        let usable: Vec<&Arc<Node>> = self.nodes.iter().filter(|n| self.within_budget(n)).collect();
        if usable.is_empty() {
            return Err(Error::NoNodes);
        }

        let start = self.cursor.fetch_add(1, Ordering::Relaxed);
        Ok(pick(&usable, start))
    }

    /// Choose among an explicit node list, rotating by `attempt`.
    ///
    /// Nodes over the failure budget are skipped. A single pinned node is
    /// always used, since the answer may only exist on that node.
    pub fn select_from(&self, account_ids: &[AccountId], attempt: usize) -> Result<Arc<Node>> {
        let pinned = account_ids
            .iter()
            .map(|id| {
                self.node(*id)
                    .ok_or_else(|| Error::Config(format!("node {} is not part of the network", id)))
            })
            .collect::<Result<Vec<_>>>()?;
        if let [only] = pinned.as_slice() {
            return Ok(only.clone());
        }

        let usable: Vec<&Arc<Node>> = pinned.iter().filter(|n| self.within_budget(n)).collect();
        if usable.is_empty() {
            return Err(Error::NoNodes);
        }
        Ok(pick(&usable, attempt))
    }

    fn within_budget(&self, node: &Node) -> bool {
        match self.max_node_failures {
            Some(budget) => node.total_failures() < budget,
            None => true,
        }
    }
}

/// First healthy node at or after `start`, else the one readmitted soonest
fn pick(candidates: &[&Arc<Node>], start: usize) -> Arc<Node> {
    let len = candidates.len();
    (0..len)
        .map(|offset| candidates[(start + offset) % len])
        .find(|node| node.is_healthy())
        .or_else(|| candidates.iter().copied().min_by_key(|node| node.readmit_at()))
        .unwrap_or(candidates[start % len])
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MockChannel;

    fn node(num: u64) -> Arc<Node> {
        Arc::new(Node::new(
            AccountId::new(0, 0, num),
            format!("node{}:50211", num),
            Arc::new(MockChannel::new()),
            Duration::from_secs(8),
            Duration::from_secs(3600),
        ))
    }

    #[tokio::test]
    async fn test_round_robin_visits_every_node() {
        let network = Network::new(vec![node(3), node(4), node(5)], None);
        let mut seen: Vec<u64> = (0..3)
            .map(|_| network.next_node().unwrap().account_id().num)
            .collect();
        seen.sort();
        assert_eq!(seen, vec![3, 4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unhealthy_node_is_skipped_until_readmitted() {
        let sick = node(3);
        let network = Network::new(vec![sick.clone(), node(4)], None);
        sick.mark_unhealthy();

        for _ in 0..4 {
            assert_eq!(network.next_node().unwrap().account_id().num, 4);
        }

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(sick.is_healthy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_readmission_backoff_grows_and_resets() {
        let n = node(3);
        n.mark_unhealthy();
        n.mark_unhealthy();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(!n.is_healthy(), "second failure parks for 16s");

        tokio::time::advance(Duration::from_secs(8)).await;
        assert!(n.is_healthy());

        n.mark_healthy();
        n.mark_unhealthy();
        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(n.is_healthy(), "success resets the backoff");
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_parked_returns_soonest() {
        let a = node(3);
        let b = node(4);
        let network = Network::new(vec![a.clone(), b.clone()], None);

        a.mark_unhealthy();
        a.mark_unhealthy();
        b.mark_unhealthy();

        assert_eq!(network.next_node().unwrap().account_id().num, 4);
    }

    #[tokio::test]
    async fn test_failure_budget_excludes_node() {
        let a = node(3);
        let network = Network::new(vec![a.clone()], Some(1));
        a.mark_unhealthy();

        assert!(matches!(network.next_node(), Err(Error::NoNodes)));
    }

    #[tokio::test]
    async fn test_select_from_pinned_nodes() {
        let network = Network::new(vec![node(3), node(4)], None);
        let pinned = [AccountId::new(0, 0, 4)];

        assert_eq!(network.select_from(&pinned, 0).unwrap().account_id().num, 4);
        assert_eq!(network.select_from(&pinned, 7).unwrap().account_id().num, 4);
        assert!(network
            .select_from(&[AccountId::new(0, 0, 99)], 0)
            .is_err());
    }

    #[tokio::test]
    async fn test_select_from_respects_failure_budget() {
        let spent = node(3);
        let network = Network::new(vec![spent.clone(), node(4)], Some(1));
        spent.mark_unhealthy();

        let both = [AccountId::new(0, 0, 3), AccountId::new(0, 0, 4)];
        for attempt in 0..4 {
            assert_eq!(network.select_from(&both, attempt).unwrap().account_id().num, 4);
        }

        // a lone pinned node is still reachable
        let only = [AccountId::new(0, 0, 3)];
        assert_eq!(network.select_from(&only, 0).unwrap().account_id().num, 3);

        let all_spent = Network::new(vec![node(5), node(6)], Some(1));
        for n in all_spent.nodes() {
            n.mark_unhealthy();
        }
        let pair = [AccountId::new(0, 0, 5), AccountId::new(0, 0, 6)];
        assert!(matches!(all_spent.select_from(&pair, 0), Err(Error::NoNodes)));
    }
}
