//! Entity and transaction identifiers
//!
//! Entities are addressed as `shard.realm.num`. A [`TransactionId`] is the
//! payer account plus the start of the validity window, optionally marked as
//! scheduled or carrying the nonce of an internally spawned child.

use chrono::{DateTime, Utc};
use ledger_proto as proto;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::{Error, Result};

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name {
            /// Shard number
            pub shard: u64,
            /// Realm number
            pub realm: u64,
            /// Entity number
            pub num: u64,
        }

        impl $name {
            /// Create from components
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num }
            }

            /// Wire form
            pub fn to_proto(&self) -> proto::EntityId {
                proto::EntityId {
                    shard: self.shard as i64,
                    realm: self.realm as i64,
                    num: self.num as i64,
                }
            }

            /// From the wire form
            pub fn from_proto(id: &proto::EntityId) -> Self {
                Self::new(id.shard as u64, id.realm as u64, id.num as u64)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let (shard, realm, num) = parse_entity(s)?;
                Ok(Self::new(shard, realm, num))
            }
        }
    };
}

entity_id!(
    /// Account identifier
    AccountId
);
entity_id!(
    /// File identifier
    FileId
);
entity_id!(
    /// Smart contract identifier
    ContractId
);
entity_id!(
    /// Consensus topic identifier
    TopicId
);
entity_id!(
    /// Token identifier
    TokenId
);
entity_id!(
    /// Schedule identifier
    ScheduleId
);

/// Parse `shard.realm.num`, ignoring a trailing `-checksum` annotation.
fn parse_entity(s: &str) -> Result<(u64, u64, u64)> {
    let body = s.split('-').next().unwrap_or(s);
    let parts: Vec<&str> = body.split('.').collect();
    if parts.len() != 3 {
        return Err(Error::InvalidId(format!("expected shard.realm.num, got {:?}", s)));
    }

    let parse = |part: &str| {
        part.parse::<u64>()
            .map_err(|e| Error::InvalidId(format!("{:?}: {}", s, e)))
    };

    Ok((parse(parts[0])?, parse(parts[1])?, parse(parts[2])?))
}

/// Last valid-start handed out by [`TransactionId::generate`], in nanoseconds.
static LAST_VALID_START_NANOS: AtomicI64 = AtomicI64::new(0);

/// Transaction identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    /// Payer account
    pub account_id: AccountId,
    /// Start of the validity window
    pub valid_start: DateTime<Utc>,
    /// Identifies the scheduled execution of a scheduled transaction
    pub scheduled: bool,
    /// Nonce of an internally spawned child transaction
    pub nonce: Option<i32>,
}

impl TransactionId {
    /// Generate a fresh id for `account_id` starting now.
    ///
    /// Valid-start timestamps handed out within a process are strictly
    /// increasing, so two ids generated back to back never collide.
    pub fn generate(account_id: AccountId) -> Self {
        let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        let mut last = LAST_VALID_START_NANOS.load(Ordering::Relaxed);
        let nanos = loop {
            let candidate = now.max(last.saturating_add(1));
            match LAST_VALID_START_NANOS.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break candidate,
                Err(actual) => last = actual,
            }
        };

        Self::with_valid_start(account_id, DateTime::from_timestamp_nanos(nanos))
    }

    /// Id with an explicit valid start
    pub fn with_valid_start(account_id: AccountId, valid_start: DateTime<Utc>) -> Self {
        Self {
            account_id,
            valid_start,
            scheduled: false,
            nonce: None,
        }
    }

    /// Mark as the scheduled execution of this transaction
    pub fn scheduled(mut self, scheduled: bool) -> Self {
        self.scheduled = scheduled;
        self
    }

    /// Set the child nonce; zero means no nonce, as on the wire
    pub fn with_nonce(mut self, nonce: i32) -> Self {
        self.nonce = (nonce != 0).then_some(nonce);
        self
    }

    /// Wire form
    pub fn to_proto(&self) -> proto::TransactionId {
        proto::TransactionId {
            account_id: Some(self.account_id.to_proto()),
            transaction_valid_start: Some(proto::Timestamp {
                seconds: self.valid_start.timestamp(),
                nanos: self.valid_start.timestamp_subsec_nanos() as i32,
            }),
            scheduled: self.scheduled,
            nonce: self.nonce.unwrap_or(0),
        }
    }

    /// From the wire form
    pub fn from_proto(id: &proto::TransactionId) -> Result<Self> {
        let account = id
            .account_id
            .as_ref()
            .ok_or(Error::MissingField("transaction_id.account_id"))?;
        let start = id
            .transaction_valid_start
            .as_ref()
            .ok_or(Error::MissingField("transaction_id.transaction_valid_start"))?;

        Ok(Self {
            account_id: AccountId::from_proto(account),
            valid_start: timestamp_from_proto(start)?,
            scheduled: id.scheduled,
            nonce: (id.nonce != 0).then_some(id.nonce),
        })
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.account_id,
            self.valid_start.timestamp(),
            self.valid_start.timestamp_subsec_nanos()
        )?;
        if self.scheduled {
            f.write_str("?scheduled")?;
        }
        if let Some(nonce) = self.nonce {
            write!(f, "/{}", nonce)?;
        }
        Ok(())
    }
}

impl FromStr for TransactionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidId(format!("expected account@seconds.nanos, got {:?}", s));

        let (rest, nonce) = match s.rsplit_once('/') {
            Some((rest, nonce)) => {
                let nonce = nonce.parse::<i32>().map_err(|_| invalid())?;
                (rest, (nonce != 0).then_some(nonce))
            }
            None => (s, None),
        };
        let (rest, scheduled) = match rest.strip_suffix("?scheduled") {
            Some(rest) => (rest, true),
            None => (rest, false),
        };
        let (account, start) = rest.split_once('@').ok_or_else(invalid)?;
        let (seconds, nanos) = start.split_once('.').ok_or_else(invalid)?;

        let seconds = seconds.parse::<i64>().map_err(|_| invalid())?;
        let nanos = nanos.parse::<u32>().map_err(|_| invalid())?;
        let valid_start = DateTime::from_timestamp(seconds, nanos).ok_or_else(invalid)?;

        Ok(Self {
            account_id: account.parse()?,
            valid_start,
            scheduled,
            nonce,
        })
    }
}

/// Convert a wire timestamp
pub(crate) fn timestamp_from_proto(ts: &proto::Timestamp) -> Result<DateTime<Utc>> {
    let out_of_range = || Error::InvalidId(format!("timestamp out of range: {}.{}", ts.seconds, ts.nanos));
    let nanos = u32::try_from(ts.nanos)
        .ok()
        .filter(|nanos| *nanos < 1_000_000_000)
        .ok_or_else(out_of_range)?;
    DateTime::from_timestamp(ts.seconds, nanos).ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_parse_and_display() {
        let id: AccountId = "0.0.1001".parse().unwrap();
        assert_eq!(id, AccountId::new(0, 0, 1001));
        assert_eq!(id.to_string(), "0.0.1001");

        let with_checksum: TokenId = "0.0.42-abcde".parse().unwrap();
        assert_eq!(with_checksum, TokenId::new(0, 0, 42));

        assert!("0.0".parse::<FileId>().is_err());
        assert!("0.x.1".parse::<FileId>().is_err());
    }

    #[test]
    fn test_entity_id_proto() {
        let id = ContractId::new(1, 2, 3);
        assert_eq!(ContractId::from_proto(&id.to_proto()), id);
    }

    #[test]
    fn test_generate_is_strictly_increasing() {
        let account = AccountId::new(0, 0, 2);
        let mut previous = TransactionId::generate(account);
        for _ in 0..1_000 {
            let next = TransactionId::generate(account);
            assert!(next.valid_start > previous.valid_start);
            previous = next;
        }
    }

    #[test]
    fn test_transaction_id_display_and_parse() {
        let start = DateTime::from_timestamp(1_700_000_000, 42).unwrap();
        let id = TransactionId::with_valid_start(AccountId::new(0, 0, 5), start);
        assert_eq!(id.to_string(), "0.0.5@1700000000.000000042");
        assert_eq!(id.to_string().parse::<TransactionId>().unwrap(), id);

        let child = id.scheduled(true).with_nonce(3);
        assert_eq!(child.to_string(), "0.0.5@1700000000.000000042?scheduled/3");
        assert_eq!(child.to_string().parse::<TransactionId>().unwrap(), child);

        assert!("0.0.5".parse::<TransactionId>().is_err());
    }

    #[test]
    fn test_transaction_id_proto() {
        let id = TransactionId::generate(AccountId::new(0, 0, 7));
        assert_eq!(TransactionId::from_proto(&id.to_proto()).unwrap(), id);

        let missing = proto::TransactionId::default();
        assert!(matches!(
            TransactionId::from_proto(&missing),
            Err(Error::MissingField(_))
        ));
    }

    #[test]
    fn test_zero_nonce_matches_wire_form() {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let plain = TransactionId::with_valid_start(AccountId::new(0, 0, 5), start);
        let zero = plain.with_nonce(0);
        assert_eq!(zero, plain);
        assert_eq!(TransactionId::from_proto(&zero.to_proto()).unwrap(), zero);

        let parsed: TransactionId = "0.0.5@1700000000.000000000/0".parse().unwrap();
        assert_eq!(parsed, plain);
        assert_eq!(TransactionId::from_proto(&parsed.to_proto()).unwrap(), parsed);

        let child = plain.with_nonce(4);
        assert_eq!(TransactionId::from_proto(&child.to_proto()).unwrap(), child);
    }

    #[test]
    fn test_timestamp_rejects_invalid_nanos() {
        let mut wire = TransactionId::generate(AccountId::new(0, 0, 7)).to_proto();
        if let Some(start) = wire.transaction_valid_start.as_mut() {
            start.nanos = -1;
        }
        assert!(matches!(
            TransactionId::from_proto(&wire),
            Err(Error::InvalidId(_))
        ));

        let overflow = proto::Timestamp {
            seconds: 1,
            nanos: 1_000_000_000,
        };
        assert!(matches!(timestamp_from_proto(&overflow), Err(Error::InvalidId(_))));
    }
}
