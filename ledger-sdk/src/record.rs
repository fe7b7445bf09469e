//! Transaction records

use chrono::{DateTime, Utc};
use ledger_proto as proto;
use serde::Serialize;

use crate::ids::{timestamp_from_proto, TransactionId};
use crate::receipt::TransactionReceipt;
use crate::{Error, Result};

/// Full record of a transaction after consensus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    /// Receipt of the transaction
    pub receipt: TransactionReceipt,
    /// SHA-384 hash of the signed transaction bytes
    pub transaction_hash: Vec<u8>,
    /// Consensus timestamp
    pub consensus_timestamp: Option<DateTime<Utc>>,
    /// Transaction the record belongs to
    pub transaction_id: Option<TransactionId>,
    /// Memo attached to the transaction
    pub memo: String,
    /// Fee charged, in tinybars
    pub transaction_fee: u64,
    /// Records of child transactions
    pub children: Vec<TransactionRecord>,
    /// Records of duplicate submissions
    pub duplicates: Vec<TransactionRecord>,
}

impl TransactionRecord {
    /// From the wire form
    pub fn from_proto(record: proto::TransactionRecord) -> Result<Self> {
        Self::from_proto_with_related(record, Vec::new(), Vec::new())
    }

    /// From the wire form, with duplicates and children
    pub fn from_proto_with_related(
        record: proto::TransactionRecord,
        duplicates: Vec<proto::TransactionRecord>,
        children: Vec<proto::TransactionRecord>,
    ) -> Result<Self> {
        let transaction_id = record
            .transaction_id
            .as_ref()
            .map(TransactionId::from_proto)
            .transpose()?;
        let receipt = record
            .receipt
            .ok_or(Error::MissingField("transaction_record.receipt"))?;

        Ok(Self {
            receipt: TransactionReceipt::from_proto(receipt, transaction_id)?,
            transaction_hash: record.transaction_hash,
            consensus_timestamp: record
                .consensus_timestamp
                .as_ref()
                .map(timestamp_from_proto)
                .transpose()?,
            transaction_id,
            memo: record.memo,
            transaction_fee: record.transaction_fee,
            children: children
                .into_iter()
                .map(TransactionRecord::from_proto)
                .collect::<Result<_>>()?,
            duplicates: duplicates
                .into_iter()
                .map(TransactionRecord::from_proto)
                .collect::<Result<_>>()?,
        })
    }
}
