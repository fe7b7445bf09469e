//! Record lookup

use ledger_proto::{self as proto, services};

use super::{answer_only, precheck_code};
use crate::channel::Method;
use crate::client::Client;
use crate::error::{PrecheckStatusError, ReceiptStatusError};
use crate::execute::{execute, ExecuteOptions, Executable, ExecutionState};
use crate::ids::{AccountId, TransactionId};
use crate::receipt::TransactionReceipt;
use crate::record::TransactionRecord;
use crate::status::Status;
use crate::{Error, Result};

/// Fetch the full record of a transaction
#[derive(Debug, Clone)]
pub struct TransactionRecordQuery {
    transaction_id: TransactionId,
    node_account_ids: Option<Vec<AccountId>>,
    include_children: bool,
    include_duplicates: bool,
    validate_status: bool,
}

impl TransactionRecordQuery {
    /// Remote method serving records
    pub const METHOD: Method = Method::new(services::CRYPTO, "getTxRecordByTxID");

    /// Query the record of `transaction_id`
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

    /// Also return records of child transactions
    pub fn include_children(mut self, include: bool) -> Self {
        self.include_children = include;
        self
    }

    /// Also return records of duplicate submissions
    pub fn include_duplicates(mut self, include: bool) -> Self {
        self.include_duplicates = include;
        self
    }

    /// Fail with [`Error::ReceiptStatus`] when the record's receipt is not a success
    pub fn validate_status(mut self, validate: bool) -> Self {
        self.validate_status = validate;
        self
    }

    /// Execute with the client defaults
    pub async fn execute(&self, client: &Client) -> Result<TransactionRecord> {
        execute(self, client, &ExecuteOptions::default()).await
    }

    /// Execute with per-call overrides
    pub async fn execute_with(
        &self,
        client: &Client,
        options: ExecuteOptions,
    ) -> Result<TransactionRecord> {
        execute(self, client, &options).await
    }
}

fn record_response(response: &proto::Response) -> Result<&proto::TransactionGetRecordResponse> {
    match &response.response {
        Some(proto::response::Response::TransactionGetRecord(inner)) => Ok(inner),
        _ => Err(Error::MissingField("response.transaction_get_record")),
    }
}

fn record_receipt(response: &proto::Response) -> Option<&proto::TransactionReceipt> {
    record_response(response)
        .ok()?
        .transaction_record
        .as_ref()?
        .receipt
        .as_ref()
}

impl Executable for TransactionRecordQuery {
    type Request = proto::Query;
    type Response = proto::Response;
    type Output = TransactionRecord;

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
            query: Some(proto::query::Query::TransactionGetRecord(
                proto::TransactionGetRecordQuery {
                    header: answer_only(),
                    transaction_id: Some(self.transaction_id.to_proto()),
                    include_duplicates: self.include_duplicates,
                    include_child_records: self.include_children,
                },
            )),
        })
    }

    fn precheck_code(&self, response: &proto::Response) -> Result<i32> {
        precheck_code(record_response(response)?.header.as_ref())
    }

    fn should_retry(&self, status: Status, response: &proto::Response) -> ExecutionState {
        match status {
            Status::Ok => {}
            Status::Busy
            | Status::Unknown
            | Status::ReceiptNotFound
            | Status::RecordNotFound
            | Status::PlatformNotActive => return ExecutionState::Retry,
            _ => return ExecutionState::Error,
        }

        let pending = record_receipt(response)
            .and_then(|receipt| Status::try_from(receipt.status).ok())
            .map_or(false, Status::is_retryable_receipt);
        if pending {
            ExecutionState::Retry
        } else {
            ExecutionState::Finished
        }
    }

    fn make_response(
        &self,
        response: proto::Response,
        _node: AccountId,
        _request: &proto::Query,
    ) -> Result<TransactionRecord> {
        let inner = match response.response {
            Some(proto::response::Response::TransactionGetRecord(inner)) => inner,
            _ => return Err(Error::MissingField("response.transaction_get_record")),
        };
        let record = inner
            .transaction_record
            .ok_or(Error::MissingField("transaction_get_record.transaction_record"))?;
        let record = TransactionRecord::from_proto_with_related(
            record,
            inner.duplicate_transaction_records,
            inner.child_transaction_records,
        )?;

        if self.validate_status && !record.receipt.status.is_success_receipt() {
            return Err(ReceiptStatusError::new(record.receipt, self.transaction_id).into());
        }
        Ok(record)
    }

    fn make_retry_error(&self, status: Status, response: &proto::Response, node: AccountId) -> Error {
        if status == Status::Ok {
            if let Some(receipt) = record_receipt(response) {
                if let Ok(receipt) = TransactionReceipt::from_proto(receipt.clone(), Some(self.transaction_id)) {
                    return ReceiptStatusError::new(receipt, self.transaction_id).into();
                }
            }
        }
        PrecheckStatusError::new(status, node, Some(self.transaction_id)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Channel, MockChannel, TransportError};
    use crate::config::ClientConfig;
    use bytes::Bytes;
    use prost::Message;
    use std::sync::Arc;

    fn answer(precheck: Status, receipt: Status) -> std::result::Result<Bytes, TransportError> {
        let response = proto::Response {
            response: Some(proto::response::Response::TransactionGetRecord(
                proto::TransactionGetRecordResponse {
                    header: Some(proto::ResponseHeader {
                        node_transaction_precheck_code: precheck.code(),
                        cost: 0,
                    }),
                    transaction_record: Some(proto::TransactionRecord {
                        receipt: Some(proto::TransactionReceipt {
                            status: receipt.code(),
                            ..Default::default()
                        }),
                        memo: "memo".to_string(),
                        transaction_fee: 84_000,
                        ..Default::default()
                    }),
                    duplicate_transaction_records: Vec::new(),
                    child_transaction_records: Vec::new(),
                },
            )),
        };
        Ok(Bytes::from(response.encode_to_vec()))
    }

    fn setup(answers: Vec<std::result::Result<Bytes, TransportError>>) -> (MockChannel, Client) {
        let mock = MockChannel::new();
        mock.on_sequence(TransactionRecordQuery::METHOD, answers);
        let channel: Arc<dyn Channel> = Arc::new(mock.clone());
        let client = Client::with_channels(
            vec![(AccountId::new(0, 0, 3), "mock".to_string(), channel)],
            ClientConfig::default(),
        );
        (mock, client)
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_record_exists() {
        let (mock, client) = setup(vec![
            answer(Status::RecordNotFound, Status::Unknown),
            answer(Status::Ok, Status::ReceiptNotFound),
            answer(Status::Ok, Status::Success),
        ]);

        let record = TransactionRecordQuery::new(TransactionId::generate(AccountId::new(0, 0, 2)))
            .execute(&client)
            .await
            .unwrap();

        assert_eq!(record.receipt.status, Status::Success);
        assert_eq!(record.memo, "memo");
        assert_eq!(record.transaction_fee, 84_000);
        assert_eq!(mock.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_record_is_an_error_when_validating() {
        let (_, client) = setup(vec![answer(Status::Ok, Status::ContractRevertExecuted)]);
        let id = TransactionId::generate(AccountId::new(0, 0, 2));

        let err = TransactionRecordQuery::new(id).execute(&client).await.unwrap_err();
        assert_eq!(err.status(), Some(Status::ContractRevertExecuted));

        let record = TransactionRecordQuery::new(id)
            .validate_status(false)
            .execute(&client)
            .await
            .unwrap();
        assert_eq!(record.receipt.status, Status::ContractRevertExecuted);
    }
}
