//! Transaction records.

use crate::basic::TransactionId;
use crate::receipt::TransactionReceipt;

/// Full record of a transaction after consensus.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionRecord {
    #[prost(message, optional, tag = "1")]
    pub receipt: ::core::option::Option<TransactionReceipt>,
    /// SHA-384 hash of the signed transaction bytes
    #[prost(bytes = "vec", tag = "2")]
    pub transaction_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub consensus_timestamp: ::core::option::Option<::prost_types::Timestamp>,
    #[prost(message, optional, tag = "4")]
    pub transaction_id: ::core::option::Option<TransactionId>,
    #[prost(string, tag = "5")]
    pub memo: ::prost::alloc::string::String,
    /// Fee actually charged, in tinybars
    #[prost(uint64, tag = "6")]
    pub transaction_fee: u64,
}
