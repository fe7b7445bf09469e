//! Smart contract call results

use ledger_proto as proto;
use serde::Serialize;

use crate::ids::ContractId;

/// Result of executing a contract function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractFunctionResult {
    /// Contract that was called
    pub contract_id: Option<ContractId>,
    /// ABI-encoded return data
    pub bytes: Vec<u8>,
    /// Revert reason or execution error, `None` on success
    pub error_message: Option<String>,
    /// Gas consumed by the call
    pub gas_used: u64,
}

impl ContractFunctionResult {
    /// From the wire form
    pub fn from_proto(result: proto::ContractFunctionResult) -> Self {
        Self {
            contract_id: result.contract_id.as_ref().map(ContractId::from_proto),
            bytes: result.contract_call_result,
            error_message: (!result.error_message.is_empty()).then_some(result.error_message),
            gas_used: result.gas_used,
        }
    }

    /// 32-byte word at `index` of the return data
    pub fn word(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(32)?;
        self.bytes.get(start..start.checked_add(32)?)
    }
}
