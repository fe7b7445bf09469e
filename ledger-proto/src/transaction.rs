//! Signed transaction envelope and precheck acknowledgement.

use crate::basic::{EntityId, SignatureMap, TransactionId};

/// Outer envelope sent to a node.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Transaction {
    /// Encoded [`SignedTransaction`]
    #[prost(bytes = "vec", tag = "1")]
    pub signed_transaction_bytes: ::prost::alloc::vec::Vec<u8>,
}

/// Body bytes plus the signatures over them.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignedTransaction {
    /// Encoded [`TransactionBody`]
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub sig_map: ::core::option::Option<SignatureMap>,
}

/// Fields common to every transaction plus the operation-specific body.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionBody {
    #[prost(message, optional, tag = "1")]
    pub transaction_id: ::core::option::Option<TransactionId>,
    /// Node the transaction is addressed to
    #[prost(message, optional, tag = "2")]
    pub node_account_id: ::core::option::Option<EntityId>,
    /// Maximum fee the payer is willing to pay, in tinybars
    #[prost(uint64, tag = "3")]
    pub transaction_fee: u64,
    #[prost(message, optional, tag = "4")]
    pub transaction_valid_duration: ::core::option::Option<::prost_types::Duration>,
    #[prost(string, tag = "5")]
    pub memo: ::prost::alloc::string::String,
    /// Encoded operation body (transfer, file append, token mint, ...)
    #[prost(bytes = "vec", tag = "6")]
    pub operation: ::prost::alloc::vec::Vec<u8>,
}

/// Immediate answer to a submitted transaction.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionResponse {
    #[prost(int32, tag = "1")]
    pub node_transaction_precheck_code: i32,
    /// Fee that would have been charged, when the precheck failed on cost
    #[prost(uint64, tag = "2")]
    pub cost: u64,
}
