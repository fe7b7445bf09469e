//! Query response envelopes.

use crate::contract::ContractFunctionResult;
use crate::receipt::TransactionReceipt;
use crate::record::TransactionRecord;

/// Header every query response carries.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResponseHeader {
    #[prost(int32, tag = "1")]
    pub node_transaction_precheck_code: i32,
    #[prost(uint64, tag = "2")]
    pub cost: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionGetReceiptResponse {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<ResponseHeader>,
    #[prost(message, optional, tag = "2")]
    pub receipt: ::core::option::Option<TransactionReceipt>,
    #[prost(message, repeated, tag = "3")]
    pub duplicate_transaction_receipts: ::prost::alloc::vec::Vec<TransactionReceipt>,
    #[prost(message, repeated, tag = "4")]
    pub child_transaction_receipts: ::prost::alloc::vec::Vec<TransactionReceipt>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionGetRecordResponse {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<ResponseHeader>,
    #[prost(message, optional, tag = "2")]
    pub transaction_record: ::core::option::Option<TransactionRecord>,
    #[prost(message, repeated, tag = "3")]
    pub duplicate_transaction_records: ::prost::alloc::vec::Vec<TransactionRecord>,
    #[prost(message, repeated, tag = "4")]
    pub child_transaction_records: ::prost::alloc::vec::Vec<TransactionRecord>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractCallLocalResponse {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<ResponseHeader>,
    #[prost(message, optional, tag = "2")]
    pub function_result: ::core::option::Option<ContractFunctionResult>,
}

/// Top-level response envelope.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Response {
    #[prost(oneof = "response::Response", tags = "1, 2, 3")]
    pub response: ::core::option::Option<response::Response>,
}

/// Nested message and enum types in `Response`.
pub mod response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Response {
        #[prost(message, tag = "1")]
        TransactionGetReceipt(super::TransactionGetReceiptResponse),
        #[prost(message, tag = "2")]
        TransactionGetRecord(super::TransactionGetRecordResponse),
        #[prost(message, tag = "3")]
        ContractCallLocal(super::ContractCallLocalResponse),
    }
}
