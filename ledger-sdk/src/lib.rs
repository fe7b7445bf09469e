//! Ledger SDK
//!
//! Client-side core for submitting transactions to a ledger network and
//! resolving their receipts.
//!
//! # Architecture
//!
//! - **Executable**: one retry loop shared by transactions and queries
//! - **Status registry**: closed set of network status codes with strict decoding
//! - **Receipts**: polling until consensus, resubmission under a new id on congestion
//! - **Channels**: gRPC for real nodes, a scripted in-process channel for tests
//!
//! # Retry layers
//!
//! - Inside one request: transport failures and "not final yet" answers back
//!   off exponentially within the request's attempt budget
//! - Across submissions: congestion at consensus resubmits the transaction
//!   under a fresh id, at most five times per receipt lookup
//!
//! Both layers stop at the caller's deadline.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod channel;
pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod execute;
pub mod ids;
pub mod metrics;
pub mod network;
pub mod query;
pub mod receipt;
pub mod record;
pub mod response;
pub mod retry;
pub mod signer;
pub mod status;
pub mod transaction;

// Re-exports
pub use channel::{Channel, GrpcChannel, Method, MockChannel, TransportError};
pub use client::{Client, Operator};
pub use config::{ClientConfig, NodeConfig, OperatorConfig};
pub use contract::ContractFunctionResult;
pub use error::{Error, PrecheckStatusError, ReceiptStatusError, Result};
pub use execute::{ExecuteOptions, Executable, ExecutionState};
pub use ids::{AccountId, ContractId, FileId, ScheduleId, TokenId, TopicId, TransactionId};
pub use query::{ContractCallQuery, TransactionReceiptQuery, TransactionRecordQuery};
pub use receipt::{CreatedEntity, ExchangeRate, ExchangeRates, TransactionReceipt};
pub use record::TransactionRecord;
pub use response::TransactionResponse;
pub use retry::{CongestionBackoff, CongestionPolicy, ExponentialBackoff};
pub use signer::{Ed25519Signer, Signer};
pub use status::Status;
pub use transaction::Transaction;
