//! Handle to a submitted transaction
//!
//! A [`TransactionResponse`] remembers where and under which id a transaction
//! was accepted. [`TransactionResponse::get_receipt`] waits for consensus and
//! resubmits the transaction under a new id when the network reports
//! congestion; after a successful resubmission the handle reports the new id
//! and node, while the original ones stay available.

use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::error::ReceiptStatusError;
use crate::execute::ExecuteOptions;
use crate::ids::{AccountId, TransactionId};
use crate::metrics::RESUBMISSIONS_TOTAL;
use crate::query::{TransactionReceiptQuery, TransactionRecordQuery};
use crate::receipt::TransactionReceipt;
use crate::record::TransactionRecord;
use crate::retry::CongestionPolicy;
use crate::status::ReceiptDisposition;
use crate::transaction::{submit, Transaction};
use crate::{Error, Result};

/// Where a transaction was accepted
#[derive(Debug, Clone, PartialEq, Eq)]
struct Submitted {
    node_id: AccountId,
    transaction_id: TransactionId,
    transaction_hash: Vec<u8>,
}

/// A transaction accepted by a node
pub struct TransactionResponse {
    original: Submitted,
    current: Mutex<Submitted>,
    transaction: Arc<Transaction>,
    congestion: CongestionPolicy,
}

impl TransactionResponse {
    pub(crate) fn new(
        node_id: AccountId,
        transaction_id: TransactionId,
        transaction_hash: Vec<u8>,
        transaction: Arc<Transaction>,
    ) -> Self {
        let submitted = Submitted {
            node_id,
            transaction_id,
            transaction_hash,
        };
        Self {
            original: submitted.clone(),
            current: Mutex::new(submitted),
            transaction,
            congestion: CongestionPolicy::default(),
        }
    }

    /// Replace the congestion resubmission policy
    pub fn with_congestion_policy(mut self, policy: CongestionPolicy) -> Self {
        self.congestion = policy;
        self
    }

    /// Node that accepted the latest submission
    pub fn node_id(&self) -> AccountId {
        self.current.lock().node_id
    }

    /// Id of the latest submission
    pub fn transaction_id(&self) -> TransactionId {
        self.current.lock().transaction_id
    }

    /// SHA-384 hash of the latest submission
    pub fn transaction_hash(&self) -> Vec<u8> {
        self.current.lock().transaction_hash.clone()
    }

    /// Id the transaction was first submitted under
    pub fn original_transaction_id(&self) -> TransactionId {
        self.original.transaction_id
    }

    /// Node that accepted the first submission
    pub fn original_node_id(&self) -> AccountId {
        self.original.node_id
    }

    /// The submitted transaction
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Receipt query for the latest submission
    pub fn get_receipt_query(&self) -> TransactionReceiptQuery {
        let current = self.current.lock().clone();
        TransactionReceiptQuery::new(current.transaction_id)
            .with_node_account_ids(vec![current.node_id])
    }

    /// Record query for the latest submission
    pub fn get_record_query(&self) -> TransactionRecordQuery {
        let current = self.current.lock().clone();
        TransactionRecordQuery::new(current.transaction_id)
            .with_node_account_ids(vec![current.node_id])
    }

    /// Wait for the receipt, resubmitting on congestion.
    ///
    /// Fails with [`Error::ReceiptStatus`] when consensus reports anything but
    /// success, or when congestion persists past the resubmission budget.
    pub async fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt> {
        self.get_receipt_with(client, ExecuteOptions::default()).await
    }

    /// [`get_receipt`](Self::get_receipt) with per-call overrides.
    ///
    /// The deadline, defaulting to the client's request timeout, bounds every
    /// poll, backoff and resubmission together.
    pub async fn get_receipt_with(
        &self,
        client: &Client,
        options: ExecuteOptions,
    ) -> Result<TransactionReceipt> {
        let options = with_default_deadline(client, options);
        let resubmit_options = options.clone();
        self.poll_receipt(client, &options, |transaction_id| {
            let transaction = Arc::clone(&self.transaction);
            let options = resubmit_options.clone();
            async move {
                let response = submit(&transaction, transaction_id, client, &options).await?;
                let submitted = response.current.lock().clone();
                Ok::<Submitted, Error>(submitted)
            }
        })
        .await
    }

    /// Congestion loop; `resubmit` sends the transaction under a fresh id.
    ///
    /// A resubmission failing with [`Error::ReceiptStatus`] counts as another
    /// congested attempt; any other failure ends the loop.
    async fn poll_receipt<F, Fut>(
        &self,
        client: &Client,
        options: &ExecuteOptions,
        mut resubmit: F,
    ) -> Result<TransactionReceipt>
    where
        F: FnMut(TransactionId) -> Fut,
        Fut: Future<Output = Result<Submitted>>,
    {
        let mut congestion = self.congestion.start();
        let mut current = self.current.lock().clone();

        loop {
            let receipt = TransactionReceiptQuery::new(current.transaction_id)
                .with_node_account_ids(vec![current.node_id])
                .validate_status(false)
                .execute_with(client, options.clone())
                .await?;

            match receipt.status.receipt_disposition() {
                ReceiptDisposition::Success => {
                    debug!(transaction_id = %current.transaction_id, status = %receipt.status, "Receipt resolved");
                    return Ok(receipt);
                }
                ReceiptDisposition::Congestion => {}
                ReceiptDisposition::Pending | ReceiptDisposition::Failure => {
                    warn!(transaction_id = %current.transaction_id, status = %receipt.status, "Transaction failed");
                    return Err(ReceiptStatusError::new(receipt, current.transaction_id).into());
                }
            }

            let mut last_error = Error::from(ReceiptStatusError::new(receipt, current.transaction_id));
            current = loop {
                let Some(delay) = congestion.on_congestion() else {
                    warn!(
                        transaction_id = %current.transaction_id,
                        attempts = congestion.attempts(),
                        "Congestion persisted, giving up"
                    );
                    return Err(last_error);
                };

                if let Some(deadline) = options.deadline {
                    if Instant::now() + delay >= deadline {
                        return Err(last_error);
                    }
                }
                tokio::time::sleep(delay).await;

                let payer = client.operator_account_id().ok_or(Error::NoOperator)?;
                let transaction_id = TransactionId::generate(payer);
                info!(
                    original = %self.original.transaction_id,
                    previous = %current.transaction_id,
                    transaction_id = %transaction_id,
                    backoff_ms = delay.as_millis() as u64,
                    "Resubmitting after congestion"
                );

                match resubmit(transaction_id).await {
                    Ok(submitted) => {
                        RESUBMISSIONS_TOTAL.inc();
                        *self.current.lock() = submitted.clone();
                        break submitted;
                    }
                    Err(Error::ReceiptStatus(err)) => {
                        debug!(transaction_id = %transaction_id, status = %err.status, "Resubmission not final");
                        last_error = Error::ReceiptStatus(err);
                    }
                    Err(err) => return Err(err),
                }
            };
        }
    }

    /// Wait for the receipt, then fetch the record of the latest submission
    pub async fn get_record(&self, client: &Client) -> Result<TransactionRecord> {
        self.get_record_with(client, ExecuteOptions::default()).await
    }

    /// [`get_record`](Self::get_record) with per-call overrides
    pub async fn get_record_with(
        &self,
        client: &Client,
        options: ExecuteOptions,
    ) -> Result<TransactionRecord> {
        let options = with_default_deadline(client, options);
        self.get_receipt_with(client, options.clone()).await?;
        self.get_record_query()
            .validate_status(false)
            .execute_with(client, options)
            .await
    }
}

fn with_default_deadline(client: &Client, options: ExecuteOptions) -> ExecuteOptions {
    match options.deadline {
        Some(_) => options,
        None => {
            let timeout = client.config().request_timeout();
            options.with_timeout(timeout)
        }
    }
}

impl fmt::Debug for TransactionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.current.lock();
        f.debug_struct("TransactionResponse")
            .field("node_id", &current.node_id)
            .field("transaction_id", &current.transaction_id)
            .field("transaction_hash", &hex::encode(&current.transaction_hash))
            .field("original_transaction_id", &self.original.transaction_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Channel, Method, MockChannel, TransportError};
    use crate::config::ClientConfig;
    use crate::signer::Ed25519Signer;
    use crate::status::Status;
    use bytes::Bytes;
    use ledger_proto as proto;
    use prost::Message;
    use std::time::Duration;

    const NODE: AccountId = AccountId::new(0, 0, 3);
    const PAYER: AccountId = AccountId::new(0, 0, 1001);

    fn receipt_answer(status: Status) -> std::result::Result<Bytes, TransportError> {
        let response = proto::Response {
            response: Some(proto::response::Response::TransactionGetReceipt(
                proto::TransactionGetReceiptResponse {
                    header: Some(proto::ResponseHeader {
                        node_transaction_precheck_code: Status::Ok.code(),
                        cost: 0,
                    }),
                    receipt: Some(proto::TransactionReceipt {
                        status: status.code(),
                        ..Default::default()
                    }),
                    duplicate_transaction_receipts: Vec::new(),
                    child_transaction_receipts: Vec::new(),
                },
            )),
        };
        Ok(Bytes::from(response.encode_to_vec()))
    }

    fn setup(receipts: Vec<std::result::Result<Bytes, TransportError>>) -> (MockChannel, Client, TransactionResponse) {
        let mock = MockChannel::new();
        mock.on_sequence(TransactionReceiptQuery::METHOD, receipts);
        let channel: Arc<dyn Channel> = Arc::new(mock.clone());
        let client = Client::with_channels(vec![(NODE, "mock".to_string(), channel)], ClientConfig::default());
        client.set_operator(PAYER, Arc::new(Ed25519Signer::from_bytes(&[7u8; 32])));

        let transaction = Transaction::new(Method::new("CryptoService", "cryptoTransfer"), vec![1u8]);
        let response = TransactionResponse::new(
            NODE,
            TransactionId::generate(PAYER),
            vec![0u8; 48],
            Arc::new(transaction),
        );
        (mock, client, response)
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmission_receipt_error_keeps_polling() {
        let (mock, client, response) = setup(vec![
            receipt_answer(Status::ThrottledAtConsensus),
            receipt_answer(Status::Success),
        ]);
        let original = response.transaction_id();

        let mut attempts = Vec::new();
        let started = Instant::now();
        let receipt = response
            .poll_receipt(&client, &ExecuteOptions::default(), |transaction_id| {
                attempts.push(transaction_id);
                let first = attempts.len() == 1;
                async move {
                    if first {
                        let congested = TransactionReceipt::from_proto(
                            proto::TransactionReceipt {
                                status: Status::ThrottledAtConsensus.code(),
                                ..Default::default()
                            },
                            Some(transaction_id),
                        )
                        .unwrap();
                        return Err(Error::from(ReceiptStatusError::new(congested, transaction_id)));
                    }
                    Ok(Submitted {
                        node_id: NODE,
                        transaction_id,
                        transaction_hash: vec![1u8; 48],
                    })
                }
            })
            .await
            .unwrap();

        assert_eq!(receipt.status, Status::Success);
        assert_eq!(attempts.len(), 2);
        assert!(attempts[1].valid_start > attempts[0].valid_start);
        assert_eq!(started.elapsed(), Duration::from_millis(750));

        // the failed resubmission never became current
        assert_eq!(mock.calls_to(TransactionReceiptQuery::METHOD).len(), 2);
        assert_eq!(response.transaction_id(), attempts[1]);
        assert_eq!(response.original_transaction_id(), original);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmission_receipt_errors_exhaust_budget() {
        let (mock, client, response) = setup(vec![receipt_answer(Status::ThrottledAtConsensus)]);
        let original = response.transaction_id();

        let mut attempts = 0;
        let err = response
            .poll_receipt(&client, &ExecuteOptions::default(), |transaction_id| {
                attempts += 1;
                async move {
                    let failed = TransactionReceipt::from_proto(
                        proto::TransactionReceipt {
                            status: Status::ThrottledAtConsensus.code(),
                            ..Default::default()
                        },
                        Some(transaction_id),
                    )
                    .unwrap();
                    Err::<Submitted, Error>(Error::from(ReceiptStatusError::new(failed, transaction_id)))
                }
            })
            .await
            .unwrap_err();

        match err {
            Error::ReceiptStatus(e) => {
                assert_eq!(e.status, Status::ThrottledAtConsensus);
                assert_ne!(e.transaction_id, original);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(attempts, 4);
        assert_eq!(mock.calls_to(TransactionReceiptQuery::METHOD).len(), 1);
        assert_eq!(response.transaction_id(), original);
    }
}
