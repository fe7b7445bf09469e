//! Queries answered by a single node
//!
//! Queries share one envelope: a [`proto::Query`] whose oneof selects the
//! request and a [`proto::Response`] whose header carries the precheck code.

pub mod contract_call;
pub mod receipt;
pub mod record;

pub use contract_call::ContractCallQuery;
pub use receipt::TransactionReceiptQuery;
pub use record::TransactionRecordQuery;

use ledger_proto as proto;

use crate::{Error, Result};

/// Header asking for the answer itself
fn answer_only() -> Option<proto::QueryHeader> {
    Some(proto::QueryHeader {
        response_type: proto::ResponseType::AnswerOnly as i32,
    })
}

/// Precheck code of a response header
fn precheck_code(header: Option<&proto::ResponseHeader>) -> Result<i32> {
    header
        .map(|header| header.node_transaction_precheck_code)
        .ok_or(Error::MissingField("response.header"))
}
