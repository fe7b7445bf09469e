//! Receipt lookup
//!
//! Receipts are free and only kept by nodes for a few minutes after
//! consensus. Until consensus is final the node answers with a pending
//! status, which the executor retries.

use ledger_proto::{self as proto, services};

use super::{answer_only, precheck_code};
use crate::channel::Method;
use crate::client::Client;
use crate::error::{PrecheckStatusError, ReceiptStatusError};
use crate::execute::{execute, ExecuteOptions, Executable, ExecutionState};
use crate::ids::{AccountId, TransactionId};
use crate::receipt::TransactionReceipt;
use crate::status::Status;
use crate::{Error, Result};

/// Fetch the receipt of a transaction
#[derive(Debug, Clone)]
pub struct TransactionReceiptQuery {
    transaction_id: TransactionId,
    node_account_ids: Option<Vec<AccountId>>,
    include_children: bool,
    include_duplicates: bool,
    validate_status: bool,
}

impl TransactionReceiptQuery {
    /// Remote method serving receipts
    pub const METHOD: Method = Method::new(services::CRYPTO, "getTransactionReceipts");

    /// Query the receipt of `transaction_id`
    pub fn new(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id,
            node_account_ids: None,
            include_children: false,
            include_duplicates: false,
            validate_status: true,
        }
    }

    /// Only ask these nodes
    pub fn with_node_account_ids(mut self, node_account_ids: Vec<AccountId>) -> Self {
        self.node_account_ids = Some(node_account_ids);
        self
    }

    /// Also return receipts of child transactions
    pub fn include_children(mut self, include: bool) -> Self {
        self.include_children = include;
        self
    }

    /// Also return receipts of duplicate submissions
    pub fn include_duplicates(mut self, include: bool) -> Self {
        self.include_duplicates = include;
        self
    }

    /// Fail with [`Error::ReceiptStatus`] when the final status is not success
    pub fn validate_status(mut self, validate: bool) -> Self {
        self.validate_status = validate;
        self
    }

    /// Transaction being queried
    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    /// Execute with the client defaults
    pub async fn execute(&self, client: &Client) -> Result<TransactionReceipt> {
        execute(self, client, &ExecuteOptions::default()).await
    }

    /// Execute with per-call overrides
    pub async fn execute_with(
        &self,
        client: &Client,
        options: ExecuteOptions,
    ) -> Result<TransactionReceipt> {
        execute(self, client, &options).await
    }

    fn decode_receipt(&self, response: proto::TransactionGetReceiptResponse) -> Result<TransactionReceipt> {
        let receipt = response
            .receipt
            .ok_or(Error::MissingField("transaction_get_receipt.receipt"))?;
        TransactionReceipt::from_proto_with_related(
            receipt,
            Some(self.transaction_id),
            response.duplicate_transaction_receipts,
            response.child_transaction_receipts,
        )
    }
}

fn receipt_response(response: &proto::Response) -> Result<&proto::TransactionGetReceiptResponse> {
    match &response.response {
        Some(proto::response::Response::TransactionGetReceipt(inner)) => Ok(inner),
        _ => Err(Error::MissingField("response.transaction_get_receipt")),
    }
}

/// Receipt status of a response, if present and known
fn receipt_status(response: &proto::Response) -> Option<Status> {
    let receipt = receipt_response(response).ok()?.receipt.as_ref()?;
    Status::try_from(receipt.status).ok()
}

impl Executable for TransactionReceiptQuery {
    type Request = proto::Query;
    type Response = proto::Response;
    type Output = TransactionReceipt;

    fn method(&self) -> Method {
        Self::METHOD
    }

    fn node_account_ids(&self) -> Option<&[AccountId]> {
        self.node_account_ids.as_deref()
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        Some(self.transaction_id)
    }

    fn make_request(&self, _node: AccountId) -> Result<proto::Query> {
        Ok(proto::Query {
            query: Some(proto::query::Query::TransactionGetReceipt(
                proto::TransactionGetReceiptQuery {
                    header: answer_only(),
                    transaction_id: Some(self.transaction_id.to_proto()),
                    include_duplicates: self.include_duplicates,
                    include_child_receipts: self.include_children,
                },
            )),
        })
    }

    fn precheck_code(&self, response: &proto::Response) -> Result<i32> {
        precheck_code(receipt_response(response)?.header.as_ref())
    }

    fn should_retry(&self, status: Status, response: &proto::Response) -> ExecutionState {
        match status {
            Status::Ok => {}
            Status::Busy | Status::Unknown | Status::ReceiptNotFound | Status::PlatformNotActive => {
                return ExecutionState::Retry
            }
            _ => return ExecutionState::Error,
        }

        match receipt_status(response) {
            Some(status) if status.is_retryable_receipt() => ExecutionState::Retry,
            _ => ExecutionState::Finished,
        }
    }

    fn make_response(
        &self,
        response: proto::Response,
        _node: AccountId,
        _request: &proto::Query,
    ) -> Result<TransactionReceipt> {
        let receipt = match response.response {
            Some(proto::response::Response::TransactionGetReceipt(inner)) => self.decode_receipt(inner)?,
            _ => return Err(Error::MissingField("response.transaction_get_receipt")),
        };

        if self.validate_status && !receipt.status.is_success_receipt() {
            return Err(ReceiptStatusError::new(receipt, self.transaction_id).into());
        }
        Ok(receipt)
    }

    fn make_retry_error(&self, status: Status, response: &proto::Response, node: AccountId) -> Error {
        if status == Status::Ok {
            if let Ok(inner) = receipt_response(response) {
                if let Ok(receipt) = self.decode_receipt(inner.clone()) {
                    return ReceiptStatusError::new(receipt, self.transaction_id).into();
                }
            }
        }
        PrecheckStatusError::new(status, node, Some(self.transaction_id)).into()
    }
}
