//! Query envelopes.

use crate::basic::{EntityId, TransactionId};

/// How the node should answer a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ResponseType {
    /// Return the answer
    AnswerOnly = 0,
    /// Return the answer and a state proof
    AnswerStateProof = 1,
    /// Return only the cost of the answer
    CostAnswer = 2,
    /// Return only the cost of answer plus state proof
    CostAnswerStateProof = 3,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryHeader {
    #[prost(enumeration = "ResponseType", tag = "1")]
    pub response_type: i32,
}

/// Ask for the receipt of a transaction.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionGetReceiptQuery {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<QueryHeader>,
    #[prost(message, optional, tag = "2")]
    pub transaction_id: ::core::option::Option<TransactionId>,
    #[prost(bool, tag = "3")]
    pub include_duplicates: bool,
    #[prost(bool, tag = "4")]
    pub include_child_receipts: bool,
}

/// Ask for the full record of a transaction.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionGetRecordQuery {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<QueryHeader>,
    #[prost(message, optional, tag = "2")]
    pub transaction_id: ::core::option::Option<TransactionId>,
    #[prost(bool, tag = "3")]
    pub include_duplicates: bool,
    #[prost(bool, tag = "4")]
    pub include_child_records: bool,
}

/// Execute a contract function locally on the answering node.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractCallLocalQuery {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<QueryHeader>,
    #[prost(message, optional, tag = "2")]
    pub contract_id: ::core::option::Option<EntityId>,
    #[prost(int64, tag = "3")]
    pub gas: i64,
    #[prost(bytes = "vec", tag = "4")]
    pub function_parameters: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "5")]
    pub sender_id: ::core::option::Option<EntityId>,
}

/// Top-level query envelope.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Query {
    #[prost(oneof = "query::Query", tags = "1, 2, 3")]
    pub query: ::core::option::Option<query::Query>,
}

/// Nested message and enum types in `Query`.
pub mod query {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Query {
        #[prost(message, tag = "1")]
        TransactionGetReceipt(super::TransactionGetReceiptQuery),
        #[prost(message, tag = "2")]
        TransactionGetRecord(super::TransactionGetRecordQuery),
        #[prost(message, tag = "3")]
        ContractCallLocal(super::ContractCallLocalQuery),
    }
}
