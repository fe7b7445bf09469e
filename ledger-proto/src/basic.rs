//! Identifiers and signatures shared by every message.

/// Identifier of a network entity (account, file, contract, topic, token or schedule).
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct EntityId {
    /// Shard number
    #[prost(int64, tag = "1")]
    pub shard: i64,
    /// Realm number
    #[prost(int64, tag = "2")]
    pub realm: i64,
    /// Entity number within the realm
    #[prost(int64, tag = "3")]
    pub num: i64,
}

/// Identifier of a submitted transaction.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionId {
    /// Payer account
    #[prost(message, optional, tag = "1")]
    pub account_id: ::core::option::Option<EntityId>,
    /// Start of the validity window
    #[prost(message, optional, tag = "2")]
    pub transaction_valid_start: ::core::option::Option<::prost_types::Timestamp>,
    /// Whether this identifies a scheduled execution
    #[prost(bool, tag = "3")]
    pub scheduled: bool,
    /// Nonce of an internally spawned child transaction
    #[prost(int32, tag = "4")]
    pub nonce: i32,
}

/// A single public key prefix and its signature.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignaturePair {
    /// Leading bytes (or all) of the signing public key
    #[prost(bytes = "vec", tag = "1")]
    pub pub_key_prefix: ::prost::alloc::vec::Vec<u8>,
    /// Ed25519 signature over the body bytes
    #[prost(bytes = "vec", tag = "2")]
    pub ed25519: ::prost::alloc::vec::Vec<u8>,
}

/// All signatures attached to a transaction body.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignatureMap {
    #[prost(message, repeated, tag = "1")]
    pub sig_pair: ::prost::alloc::vec::Vec<SignaturePair>,
}
