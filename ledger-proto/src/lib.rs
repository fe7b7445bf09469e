//! Ledger wire protocol
//!
//! Protocol-buffer messages exchanged with network nodes. The types mirror
//! what `prost-build` emits for the `proto` package and are encoded and
//! decoded through [`prost::Message`].
//!
//! Only the envelopes the SDK core depends on live here:
//!
//! - Entity and transaction identifiers
//! - The signed transaction envelope and its precheck acknowledgement
//! - Query/response envelopes for receipts, records and local contract calls
//! - Receipts, records, exchange rates and contract call results

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod basic;
pub mod contract;
pub mod queries;
pub mod receipt;
pub mod record;
pub mod responses;
pub mod transaction;

pub use basic::{EntityId, SignatureMap, SignaturePair, TransactionId};
pub use contract::ContractFunctionResult;
pub use queries::{
    query, ContractCallLocalQuery, Query, QueryHeader, ResponseType, TransactionGetReceiptQuery,
    TransactionGetRecordQuery,
};
pub use receipt::{transaction_receipt, ExchangeRate, ExchangeRateSet, TransactionReceipt};
pub use record::TransactionRecord;
pub use responses::{
    response, ContractCallLocalResponse, Response, ResponseHeader, TransactionGetReceiptResponse,
    TransactionGetRecordResponse,
};
pub use transaction::{SignedTransaction, Transaction, TransactionBody, TransactionResponse};

/// Re-exported well-known types used by the messages above.
pub use prost_types::{Duration, Timestamp};

/// gRPC service names nodes expose.
pub mod services {
    /// Account and transfer operations, and receipt/record queries.
    pub const CRYPTO: &str = "CryptoService";
    /// File operations.
    pub const FILE: &str = "FileService";
    /// Smart contract operations.
    pub const SMART_CONTRACT: &str = "SmartContractService";
    /// Consensus topic operations.
    pub const CONSENSUS: &str = "ConsensusService";
    /// Token operations.
    pub const TOKEN: &str = "TokenService";
    /// Scheduled transaction operations.
    pub const SCHEDULE: &str = "ScheduleService";
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_receipt_with_children_decodes() {
        let receipt = TransactionReceipt {
            status: 22,
            created_entity: Some(transaction_receipt::CreatedEntity::AccountId(EntityId {
                shard: 0,
                realm: 0,
                num: 1001,
            })),
            ..Default::default()
        };
        let response = Response {
            response: Some(response::Response::TransactionGetReceipt(
                TransactionGetReceiptResponse {
                    header: Some(ResponseHeader {
                        node_transaction_precheck_code: 0,
                        cost: 0,
                    }),
                    receipt: Some(receipt.clone()),
                    duplicate_transaction_receipts: vec![],
                    child_transaction_receipts: vec![receipt.clone()],
                },
            )),
        };

        let bytes = response.encode_to_vec();
        let decoded = Response::decode(bytes.as_slice()).unwrap();

        match decoded.response {
            Some(response::Response::TransactionGetReceipt(r)) => {
                assert_eq!(r.receipt, Some(receipt));
                assert_eq!(r.child_transaction_receipts.len(), 1);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_empty_bytes_decode_to_defaults() {
        let header = ResponseHeader::decode(&[0u8; 0][..]).unwrap();
        assert_eq!(header.node_transaction_precheck_code, 0);

        let query = Query::decode(&[0u8; 0][..]).unwrap();
        assert!(query.query.is_none());
    }
}
