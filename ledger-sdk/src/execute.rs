//! Generic request execution
//!
//! Every request sent to the network, transaction or query, goes through
//! [`execute`]. It picks a node, sends the encoded request over the node's
//! channel and classifies the answer:
//!
//! - Transport failures park the node and retry on the next attempt
//! - Retryable precheck answers back off and retry, possibly on another node
//! - Accepted answers are handed to [`Executable::make_response`]
//! - Rejections fail immediately with the error built by the request type
//!
//! Attempts stop at whichever comes first: the attempt budget or the caller's
//! deadline. When the budget runs out the last observed error is returned.

use bytes::Bytes;
use prost::Message;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::channel::{Method, TransportError};
use crate::client::Client;
use crate::error::PrecheckStatusError;
use crate::ids::{AccountId, TransactionId};
use crate::metrics::{REQUESTS_TOTAL, REQUEST_DURATION, RETRIES_TOTAL};
use crate::retry::ExponentialBackoff;
use crate::status::{PrecheckDisposition, Status};
use crate::{Error, Result};

/// Outcome of classifying one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    /// Done; map the response to the output
    Finished,
    /// Transient; try again after backing off
    Retry,
    /// Rejected; fail with the request's status error
    Error,
}

/// Per-call overrides of the client defaults
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Attempts before giving up
    pub max_attempts: Option<u32>,
    /// First delay between attempts
    pub min_backoff: Option<Duration>,
    /// Upper bound on the delay between attempts
    pub max_backoff: Option<Duration>,
    /// Deadline of a single network call
    pub grpc_deadline: Option<Duration>,
    /// Absolute deadline of the whole operation
    pub deadline: Option<Instant>,
}

impl ExecuteOptions {
    /// Override the attempt budget
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Override the backoff bounds
    pub fn with_backoff(mut self, min: Duration, max: Duration) -> Self {
        self.min_backoff = Some(min);
        self.max_backoff = Some(max);
        self
    }

    /// Override the per-call deadline
    pub fn with_grpc_deadline(mut self, deadline: Duration) -> Self {
        self.grpc_deadline = Some(deadline);
        self
    }

    /// Stop retrying at `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop retrying `timeout` from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }
}

/// A request the network can answer
///
/// Implementations describe how to build the wire request for a node and how
/// to interpret the answer; [`execute`] owns node selection and retries.
pub trait Executable: Send + Sync {
    /// Wire request
    type Request: Message + Send;
    /// Wire response
    type Response: Message + Default + Send;
    /// Value handed back to the caller
    type Output: Send;

    /// Remote method serving this request
    fn method(&self) -> Method;

    /// Nodes the request is pinned to, if any
    fn node_account_ids(&self) -> Option<&[AccountId]> {
        None
    }

    /// Transaction the request is about, for error reporting
    fn transaction_id(&self) -> Option<TransactionId>;

    /// Build the request for `node`
    fn make_request(&self, node: AccountId) -> Result<Self::Request>;

    /// Precheck code from the response header
    fn precheck_code(&self, response: &Self::Response) -> Result<i32>;

    /// Classify an answer
    fn should_retry(&self, status: Status, _response: &Self::Response) -> ExecutionState {
        match status.precheck_disposition() {
            PrecheckDisposition::Accepted => ExecutionState::Finished,
            PrecheckDisposition::Retry => ExecutionState::Retry,
            PrecheckDisposition::Rejected => ExecutionState::Error,
        }
    }

    /// Map an accepted answer to the output
    fn make_response(
        &self,
        response: Self::Response,
        node: AccountId,
        request: &Self::Request,
    ) -> Result<Self::Output>;

    /// Error for a rejected answer
    fn make_status_error(&self, status: Status, _response: &Self::Response, node: AccountId) -> Error {
        PrecheckStatusError::new(status, node, self.transaction_id()).into()
    }

    /// Error remembered for a retried answer, surfaced if attempts run out
    fn make_retry_error(&self, status: Status, response: &Self::Response, node: AccountId) -> Error {
        self.make_status_error(status, response, node)
    }
}

/// Run `executable` against the client's network
pub async fn execute<E>(executable: &E, client: &Client, options: &ExecuteOptions) -> Result<E::Output>
where
    E: Executable + ?Sized,
{
    let method = executable.method();
    let label = method.to_string();
    let _timer = REQUEST_DURATION.with_label_values(&[label.as_str()]).start_timer();

    let result = run(executable, client, options, method, &label).await;

    let outcome = match &result {
        Ok(_) => "success",
        Err(Error::PrecheckStatus(_)) => "precheck",
        Err(Error::ReceiptStatus(_)) => "receipt",
        Err(Error::Transport { .. }) => "transport",
        Err(Error::DeadlineExceeded) => "deadline",
        Err(_) => "error",
    };
    REQUESTS_TOTAL.with_label_values(&[label.as_str(), outcome]).inc();

    result
}

async fn run<E>(
    executable: &E,
    client: &Client,
    options: &ExecuteOptions,
    method: Method,
    label: &str,
) -> Result<E::Output>
where
    E: Executable + ?Sized,
{
    let config = client.config();
    let max_attempts = options.max_attempts.unwrap_or(config.max_attempts).max(1);
    let grpc_deadline = options.grpc_deadline.unwrap_or_else(|| config.grpc_deadline());
    let mut backoff = ExponentialBackoff::new(
        options.min_backoff.unwrap_or_else(|| config.min_backoff()),
        options.max_backoff.unwrap_or_else(|| config.max_backoff()),
    );

    let mut last_error: Option<Error> = None;

    for attempt in 0..max_attempts as usize {
        if attempt > 0 {
            let delay = backoff.next_delay();
            match remaining(options.deadline) {
                Some(left) => tokio::time::sleep(delay.min(left)).await,
                None => tokio::time::sleep(delay).await,
            }
        }
        if expired(options.deadline) {
            debug!(method = %method, attempt, "Deadline reached");
            break;
        }

        let network = client.network();
        let node = match executable.node_account_ids() {
            Some(ids) if !ids.is_empty() => network.select_from(ids, attempt)?,
            _ => network.next_node()?,
        };
        let node_id = node.account_id();

        let request = executable.make_request(node_id)?;
        let call_deadline = match remaining(options.deadline) {
            Some(left) => grpc_deadline.min(left),
            None => grpc_deadline,
        };

        debug!(method = %method, node = %node_id, attempt, "Sending request");
        let submitted = tokio::time::timeout(
            call_deadline,
            node.channel()
                .submit(method, Bytes::from(request.encode_to_vec())),
        )
        .await
        .unwrap_or(Err(TransportError::DeadlineExceeded));

        let bytes = match submitted {
            Ok(bytes) => bytes,
            Err(source) => {
                node.mark_unhealthy();
                let retryable = source.is_retryable();
                warn!(method = %method, node = %node_id, attempt, error = %source, "Transport failure");
                let err = Error::Transport { node: node_id, source };
                if !retryable {
                    return Err(err);
                }
                RETRIES_TOTAL.with_label_values(&[label, "transport"]).inc();
                last_error = Some(err);
                continue;
            }
        };
        node.mark_healthy();

        let response = E::Response::decode(bytes)?;
        let status = Status::try_from(executable.precheck_code(&response)?)?;

        match executable.should_retry(status, &response) {
            ExecutionState::Finished => {
                debug!(method = %method, node = %node_id, attempt, "Request finished");
                return executable.make_response(response, node_id, &request);
            }
            ExecutionState::Retry => {
                if status == Status::PlatformNotActive {
                    node.mark_unhealthy();
                }
                debug!(method = %method, node = %node_id, attempt, status = %status, "Retrying");
                RETRIES_TOTAL.with_label_values(&[label, status.name()]).inc();
                last_error = Some(executable.make_retry_error(status, &response, node_id));
            }
            ExecutionState::Error => {
                warn!(method = %method, node = %node_id, status = %status, "Request rejected");
                return Err(executable.make_status_error(status, &response, node_id));
            }
        }
    }

    Err(last_error.unwrap_or(Error::DeadlineExceeded))
}

fn remaining(deadline: Option<Instant>) -> Option<Duration> {
    deadline.map(|at| at.saturating_duration_since(Instant::now()))
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.map_or(false, |at| Instant::now() >= at)
}
