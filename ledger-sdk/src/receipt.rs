//! Transaction receipts

use chrono::{DateTime, Utc};
use ledger_proto as proto;
use serde::Serialize;

use crate::ids::{
    timestamp_from_proto, AccountId, ContractId, FileId, ScheduleId, TokenId, TopicId,
    TransactionId,
};
use crate::status::Status;
use crate::Result;

/// Entity created by the transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CreatedEntity {
    /// New account
    Account(AccountId),
    /// New file
    File(FileId),
    /// New contract
    Contract(ContractId),
    /// New topic
    Topic(TopicId),
    /// New token
    Token(TokenId),
    /// New schedule
    Schedule(ScheduleId),
}

/// Exchange rate between hbar and US cents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeRate {
    /// Hbar side of the rate
    pub hbars: i32,
    /// Cent side of the rate
    pub cents: i32,
    /// When the rate stops applying
    pub expiration_time: Option<DateTime<Utc>>,
}

/// Current and next exchange rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeRates {
    /// Rate in effect
    pub current: Option<ExchangeRate>,
    /// Rate taking effect next
    pub next: Option<ExchangeRate>,
}

/// Consensus outcome of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionReceipt {
    /// Outcome status
    pub status: Status,
    /// Transaction the receipt belongs to, when known
    pub transaction_id: Option<TransactionId>,
    /// Entity created by the transaction
    pub created_entity: Option<CreatedEntity>,
    /// Exchange rates at consensus
    pub exchange_rates: Option<ExchangeRates>,
    /// Sequence number of a submitted topic message
    pub topic_sequence_number: u64,
    /// Running hash of a topic after a submitted message
    pub topic_running_hash: Option<Vec<u8>>,
    /// Version of the topic running hash algorithm
    pub topic_running_hash_version: u64,
    /// Token supply after a mint, burn or wipe
    pub total_supply: u64,
    /// Id the scheduled transaction will execute under
    pub scheduled_transaction_id: Option<TransactionId>,
    /// Serial numbers of minted unique tokens
    pub serials: Vec<i64>,
    /// Node id assigned by a node lifecycle transaction
    pub node_id: u64,
    /// Receipts of child transactions spawned by this one
    pub children: Vec<TransactionReceipt>,
    /// Receipts of the same transaction id submitted to other nodes
    pub duplicates: Vec<TransactionReceipt>,
}

impl TransactionReceipt {
    /// Decode a receipt; fails on a status code outside the registry
    pub fn from_proto(
        receipt: proto::TransactionReceipt,
        transaction_id: Option<TransactionId>,
    ) -> Result<Self> {
        Self::from_proto_with_related(receipt, transaction_id, Vec::new(), Vec::new())
    }

    /// Decode a receipt together with its children and duplicates
    pub fn from_proto_with_related(
        receipt: proto::TransactionReceipt,
        transaction_id: Option<TransactionId>,
        duplicates: Vec<proto::TransactionReceipt>,
        children: Vec<proto::TransactionReceipt>,
    ) -> Result<Self> {
        use proto::transaction_receipt::CreatedEntity as Wire;

        let created_entity = receipt.created_entity.as_ref().map(|entity| match entity {
            Wire::AccountId(id) => CreatedEntity::Account(AccountId::from_proto(id)),
            Wire::FileId(id) => CreatedEntity::File(FileId::from_proto(id)),
            Wire::ContractId(id) => CreatedEntity::Contract(ContractId::from_proto(id)),
            Wire::TopicId(id) => CreatedEntity::Topic(TopicId::from_proto(id)),
            Wire::TokenId(id) => CreatedEntity::Token(TokenId::from_proto(id)),
            Wire::ScheduleId(id) => CreatedEntity::Schedule(ScheduleId::from_proto(id)),
        });

        let exchange_rates = match &receipt.exchange_rate {
            Some(set) => Some(ExchangeRates {
                current: set.current_rate.as_ref().map(exchange_rate_from_proto).transpose()?,
                next: set.next_rate.as_ref().map(exchange_rate_from_proto).transpose()?,
            }),
            None => None,
        };

        let scheduled_transaction_id = receipt
            .scheduled_transaction_id
            .as_ref()
            .map(TransactionId::from_proto)
            .transpose()?;

        let children = children
            .into_iter()
            .map(|child| TransactionReceipt::from_proto(child, None))
            .collect::<Result<Vec<_>>>()?;
        let duplicates = duplicates
            .into_iter()
            .map(|dup| TransactionReceipt::from_proto(dup, transaction_id))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            status: Status::try_from(receipt.status)?,
            transaction_id,
            created_entity,
            exchange_rates,
            topic_sequence_number: receipt.topic_sequence_number,
            topic_running_hash: (!receipt.topic_running_hash.is_empty())
                .then_some(receipt.topic_running_hash),
            topic_running_hash_version: receipt.topic_running_hash_version,
            total_supply: receipt.new_total_supply,
            scheduled_transaction_id,
            serials: receipt.serial_numbers,
            node_id: receipt.node_id,
            children,
            duplicates,
        })
    }

    /// Account created by the transaction
    pub fn account_id(&self) -> Option<AccountId> {
        match self.created_entity {
            Some(CreatedEntity::Account(id)) => Some(id),
            _ => None,
        }
    }

    /// File created by the transaction
    pub fn file_id(&self) -> Option<FileId> {
        match self.created_entity {
            Some(CreatedEntity::File(id)) => Some(id),
            _ => None,
        }
    }

    /// Contract created by the transaction
    pub fn contract_id(&self) -> Option<ContractId> {
        match self.created_entity {
            Some(CreatedEntity::Contract(id)) => Some(id),
            _ => None,
        }
    }

    /// Topic created by the transaction
    pub fn topic_id(&self) -> Option<TopicId> {
        match self.created_entity {
            Some(CreatedEntity::Topic(id)) => Some(id),
            _ => None,
        }
    }

    /// Token created by the transaction
    pub fn token_id(&self) -> Option<TokenId> {
        match self.created_entity {
            Some(CreatedEntity::Token(id)) => Some(id),
            _ => None,
        }
    }

    /// Schedule created by the transaction
    pub fn schedule_id(&self) -> Option<ScheduleId> {
        match self.created_entity {
            Some(CreatedEntity::Schedule(id)) => Some(id),
            _ => None,
        }
    }
}

fn exchange_rate_from_proto(rate: &proto::ExchangeRate) -> Result<ExchangeRate> {
    Ok(ExchangeRate {
        hbars: rate.hbar_equiv,
        cents: rate.cent_equiv,
        expiration_time: rate.expiration_time.as_ref().map(timestamp_from_proto).transpose()?,
    })
}
