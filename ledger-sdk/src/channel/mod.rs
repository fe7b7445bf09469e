//! Node channel interface
//!
//! A [`Channel`] carries one encoded request to one node and brings back the
//! encoded response. The SDK core only depends on this trait; the gRPC
//! implementation lives in [`grpc`] and an in-process scripted channel for
//! tests lives in [`mock`].

pub mod grpc;
pub mod mock;

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use thiserror::Error;

pub use grpc::GrpcChannel;
pub use mock::MockChannel;

/// Remote procedure addressed on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Method {
    /// Service name, e.g. `CryptoService`
    pub service: &'static str,
    /// Method name, e.g. `getTransactionReceipts`
    pub name: &'static str,
}

impl Method {
    /// Create a method reference
    pub const fn new(service: &'static str, name: &'static str) -> Self {
        Self { service, name }
    }

    /// gRPC path, `/proto.<service>/<name>`
    pub fn path(&self) -> String {
        format!("/proto.{}/{}", self.service, self.name)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.name)
    }
}

/// Transport-level failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Could not establish a connection
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The per-call deadline elapsed
    #[error("Deadline exceeded")]
    DeadlineExceeded,

    /// The node is unavailable or shedding load
    #[error("Node unavailable: {0}")]
    Unavailable(String),

    /// Any other RPC failure
    #[error("RPC failed with code {code}: {message}")]
    Rpc {
        /// RPC status code
        code: i32,
        /// Status message
        message: String,
    },
}

impl TransportError {
    /// Whether the same request may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Connection(_)
                | TransportError::DeadlineExceeded
                | TransportError::Unavailable(_)
        )
    }
}

/// A connection to a single node
#[async_trait]
pub trait Channel: Send + Sync {
    /// Send `request` to `method` and return the encoded response
    async fn submit(&self, method: Method, request: Bytes) -> Result<Bytes, TransportError>;
}
