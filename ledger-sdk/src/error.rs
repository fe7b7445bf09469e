//! Error types for the SDK

use crate::channel::TransportError;
use crate::contract::ContractFunctionResult;
use crate::ids::{AccountId, TransactionId};
use crate::receipt::TransactionReceipt;
use crate::status::Status;
use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, Error>;

/// SDK errors
#[derive(Error, Debug)]
pub enum Error {
    /// The channel to a node failed
    #[error("Transport error on node {node}: {source}")]
    Transport {
        /// Node the request was sent to
        node: AccountId,
        /// Underlying transport failure
        #[source]
        source: TransportError,
    },

    /// A node rejected the request before consensus
    #[error(transparent)]
    PrecheckStatus(#[from] PrecheckStatusError),

    /// A finalized receipt reported a non-success status
    #[error(transparent)]
    ReceiptStatus(Box<ReceiptStatusError>),

    /// A node answered with a code outside the status registry
    #[error("Unrecognized status code {0}: SDK and network protocol versions differ")]
    UnknownStatus(i32),

    /// An operation needed the operator account but none is configured
    #[error("Configuration error: no operator account is set on the client")]
    NoOperator,

    /// No node is available to send the request to
    #[error("No nodes available")]
    NoNodes,

    /// The caller's deadline passed before any attempt completed
    #[error("Deadline exceeded before any attempt completed")]
    DeadlineExceeded,

    /// Wire decoding failed
    #[error("Decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// A required field was absent from a decoded message
    #[error("Missing field in response: {0}")]
    MissingField(&'static str),

    /// An identifier could not be parsed
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Signing failed or a key could not be loaded
    #[error("Signature error: {0}")]
    Signature(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Status carried by a precheck or receipt failure
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::PrecheckStatus(e) => Some(e.status),
            Error::ReceiptStatus(e) => Some(e.status),
            _ => None,
        }
    }
}

impl From<ReceiptStatusError> for Error {
    fn from(err: ReceiptStatusError) -> Self {
        Error::ReceiptStatus(Box::new(err))
    }
}

/// A node rejected a request at precheck
#[derive(Error, Debug, Clone)]
#[error("{} failed precheck on node {node_id} with status {status}", describe_transaction(.transaction_id.as_ref()))]
pub struct PrecheckStatusError {
    /// Rejection status
    pub status: Status,
    /// Node that answered
    pub node_id: AccountId,
    /// Transaction the request was about, if any
    pub transaction_id: Option<TransactionId>,
    /// Partial execution data returned by a failed local contract call
    pub contract_function_result: Option<ContractFunctionResult>,
}

impl PrecheckStatusError {
    /// Create a precheck error without contract data
    pub fn new(status: Status, node_id: AccountId, transaction_id: Option<TransactionId>) -> Self {
        Self {
            status,
            node_id,
            transaction_id,
            contract_function_result: None,
        }
    }
}

/// A receipt reported a status other than success
#[derive(Error, Debug, Clone)]
#[error("receipt for transaction {transaction_id} contained error status {status}")]
pub struct ReceiptStatusError {
    /// Receipt status
    pub status: Status,
    /// Transaction the receipt belongs to
    pub transaction_id: TransactionId,
    /// The full receipt, including child and duplicate receipts
    pub receipt: TransactionReceipt,
}

impl ReceiptStatusError {
    /// Wrap a receipt whose status is not success
    pub fn new(receipt: TransactionReceipt, transaction_id: TransactionId) -> Self {
        Self {
            status: receipt.status,
            transaction_id,
            receipt,
        }
    }
}

fn describe_transaction(transaction_id: Option<&TransactionId>) -> String {
    match transaction_id {
        Some(id) => format!("transaction {}", id),
        None => "query".to_string(),
    }
}
