//! Smart contract call results.

use crate::basic::EntityId;

/// Result of executing a contract function.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractFunctionResult {
    #[prost(message, optional, tag = "1")]
    pub contract_id: ::core::option::Option<EntityId>,
    /// Raw ABI-encoded return data
    #[prost(bytes = "vec", tag = "2")]
    pub contract_call_result: ::prost::alloc::vec::Vec<u8>,
    /// Revert reason or execution error, empty on success
    #[prost(string, tag = "3")]
    pub error_message: ::prost::alloc::string::String,
    #[prost(uint64, tag = "4")]
    pub gas_used: u64,
}
