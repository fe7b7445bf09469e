//! Consensus receipts.

use crate::basic::TransactionId;

/// Exchange rate between hbar and US cents.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExchangeRate {
    #[prost(int32, tag = "1")]
    pub hbar_equiv: i32,
    #[prost(int32, tag = "2")]
    pub cent_equiv: i32,
    #[prost(message, optional, tag = "3")]
    pub expiration_time: ::core::option::Option<::prost_types::Timestamp>,
}

/// Current and next exchange rate.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExchangeRateSet {
    #[prost(message, optional, tag = "1")]
    pub current_rate: ::core::option::Option<ExchangeRate>,
    #[prost(message, optional, tag = "2")]
    pub next_rate: ::core::option::Option<ExchangeRate>,
}

/// Consensus outcome of a single transaction.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionReceipt {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(oneof = "transaction_receipt::CreatedEntity", tags = "2, 3, 4, 5, 6, 7")]
    pub created_entity: ::core::option::Option<transaction_receipt::CreatedEntity>,
    #[prost(message, optional, tag = "8")]
    pub exchange_rate: ::core::option::Option<ExchangeRateSet>,
    #[prost(uint64, tag = "9")]
    pub topic_sequence_number: u64,
    #[prost(bytes = "vec", tag = "10")]
    pub topic_running_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint64, tag = "11")]
    pub topic_running_hash_version: u64,
    #[prost(uint64, tag = "12")]
    pub new_total_supply: u64,
    #[prost(message, optional, tag = "13")]
    pub scheduled_transaction_id: ::core::option::Option<TransactionId>,
    #[prost(int64, repeated, tag = "14")]
    pub serial_numbers: ::prost::alloc::vec::Vec<i64>,
    #[prost(uint64, tag = "15")]
    pub node_id: u64,
}

/// Nested message and enum types in `TransactionReceipt`.
pub mod transaction_receipt {
    use crate::basic::EntityId;

    /// At most one entity is created per transaction.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum CreatedEntity {
        #[prost(message, tag = "2")]
        AccountId(EntityId),
        #[prost(message, tag = "3")]
        FileId(EntityId),
        #[prost(message, tag = "4")]
        ContractId(EntityId),
        #[prost(message, tag = "5")]
        TopicId(EntityId),
        #[prost(message, tag = "6")]
        TokenId(EntityId),
        #[prost(message, tag = "7")]
        ScheduleId(EntityId),
    }
}
