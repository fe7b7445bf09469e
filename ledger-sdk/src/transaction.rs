//! Transactions
//!
//! A [`Transaction`] carries an already-encoded operation body together with
//! the envelope fields every transaction shares. Executing it resolves the
//! transaction id, signs the body once per target node and submits it through
//! the generic executor.

use ledger_proto as proto;
use prost::Message;
use sha2::{Digest, Sha384};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::channel::Method;
use crate::client::Client;
use crate::execute::{execute, ExecuteOptions, Executable};
use crate::ids::{AccountId, TransactionId};
use crate::response::TransactionResponse;
use crate::signer::Signer;
use crate::{Error, Result};

/// Default fee ceiling, 2 hbar in tinybars
pub const DEFAULT_MAX_TRANSACTION_FEE: u64 = 200_000_000;

/// Default validity window
pub const DEFAULT_VALID_DURATION: Duration = Duration::from_secs(120);

/// A transaction ready to be submitted
#[derive(Clone)]
pub struct Transaction {
    method: Method,
    operation: Vec<u8>,
    max_transaction_fee: u64,
    memo: String,
    valid_duration: Duration,
    transaction_id: Option<TransactionId>,
    node_account_ids: Option<Vec<AccountId>>,
    signers: Vec<Arc<dyn Signer>>,
}

impl Transaction {
    /// Transaction executing `operation` through `method`
    pub fn new(method: Method, operation: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            operation: operation.into(),
            max_transaction_fee: DEFAULT_MAX_TRANSACTION_FEE,
            memo: String::new(),
            valid_duration: DEFAULT_VALID_DURATION,
            transaction_id: None,
            node_account_ids: None,
            signers: Vec::new(),
        }
    }

    /// Highest fee the payer accepts, in tinybars
    pub fn with_max_transaction_fee(mut self, fee: u64) -> Self {
        self.max_transaction_fee = fee;
        self
    }

    /// Attach a memo
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Validity window starting at the transaction id's valid start
    pub fn with_valid_duration(mut self, duration: Duration) -> Self {
        self.valid_duration = duration;
        self
    }

    /// Use an explicit transaction id instead of generating one
    pub fn with_transaction_id(mut self, transaction_id: TransactionId) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }

    /// Only submit to these nodes
    pub fn with_node_account_ids(mut self, node_account_ids: Vec<AccountId>) -> Self {
        self.node_account_ids = Some(node_account_ids);
        self
    }

    /// Add a signature beyond the operator's
    pub fn sign_with(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signers.push(signer);
        self
    }

    /// Remote method
    pub fn method(&self) -> Method {
        self.method
    }

    /// Encoded operation body
    pub fn operation(&self) -> &[u8] {
        &self.operation
    }

    /// Memo
    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// Explicit transaction id, if set
    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    /// Submit with the client defaults
    pub async fn execute(&self, client: &Client) -> Result<TransactionResponse> {
        self.execute_with(client, ExecuteOptions::default()).await
    }

    /// Submit with per-call overrides
    pub async fn execute_with(
        &self,
        client: &Client,
        options: ExecuteOptions,
    ) -> Result<TransactionResponse> {
        let transaction = Arc::new(self.clone());
        let transaction_id = match transaction.transaction_id {
            Some(id) => id,
            None => TransactionId::generate(client.operator_account_id().ok_or(Error::NoOperator)?),
        };
        submit(&transaction, transaction_id, client, &options).await
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("method", &self.method)
            .field("operation_len", &self.operation.len())
            .field("max_transaction_fee", &self.max_transaction_fee)
            .field("memo", &self.memo)
            .field("transaction_id", &self.transaction_id)
            .field("node_account_ids", &self.node_account_ids)
            .field("signers", &self.signers.len())
            .finish()
    }
}

/// Submit `transaction` under `transaction_id`.
///
/// Also used to resubmit a congested transaction under a fresh id.
pub(crate) async fn submit(
    transaction: &Arc<Transaction>,
    transaction_id: TransactionId,
    client: &Client,
    options: &ExecuteOptions,
) -> Result<TransactionResponse> {
    let mut signers: Vec<Arc<dyn Signer>> = Vec::with_capacity(transaction.signers.len() + 1);
    if let Some(operator) = client.operator() {
        signers.push(operator.signer);
    }
    signers.extend(transaction.signers.iter().cloned());

    let submission = Submission {
        transaction,
        transaction_id,
        signers,
    };
    let response = execute(&submission, client, options).await?;

    info!(
        transaction_id = %response.transaction_id(),
        node = %response.node_id(),
        method = %transaction.method,
        "Transaction submitted"
    );
    Ok(response)
}

/// One signed submission of a transaction
struct Submission<'a> {
    transaction: &'a Arc<Transaction>,
    transaction_id: TransactionId,
    signers: Vec<Arc<dyn Signer>>,
}

impl Submission<'_> {
    fn body(&self, node: AccountId) -> proto::TransactionBody {
        let tx = self.transaction;
        proto::TransactionBody {
            transaction_id: Some(self.transaction_id.to_proto()),
            node_account_id: Some(node.to_proto()),
            transaction_fee: tx.max_transaction_fee,
            transaction_valid_duration: Some(proto::Duration {
                seconds: tx.valid_duration.as_secs() as i64,
                nanos: tx.valid_duration.subsec_nanos() as i32,
            }),
            memo: tx.memo.clone(),
            operation: tx.operation.clone(),
        }
    }

    fn signature_map(&self, body_bytes: &[u8]) -> proto::SignatureMap {
        let mut sig_pair: Vec<proto::SignaturePair> = Vec::with_capacity(self.signers.len());
        for signer in &self.signers {
            let public_key = signer.public_key();
            if sig_pair.iter().any(|pair| pair.pub_key_prefix == public_key) {
                continue;
            }
            sig_pair.push(proto::SignaturePair {
                pub_key_prefix: public_key,
                ed25519: signer.sign(body_bytes),
            });
        }
        proto::SignatureMap { sig_pair }
    }
}

impl Executable for Submission<'_> {
    type Request = proto::Transaction;
    type Response = proto::TransactionResponse;
    type Output = TransactionResponse;

    fn method(&self) -> Method {
        self.transaction.method
    }

    fn node_account_ids(&self) -> Option<&[AccountId]> {
        self.transaction.node_account_ids.as_deref()
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        Some(self.transaction_id)
    }

    fn make_request(&self, node: AccountId) -> Result<proto::Transaction> {
        let body_bytes = self.body(node).encode_to_vec();
        let sig_map = self.signature_map(&body_bytes);
        let signed = proto::SignedTransaction {
            body_bytes,
            sig_map: Some(sig_map),
        };
        Ok(proto::Transaction {
            signed_transaction_bytes: signed.encode_to_vec(),
        })
    }

    fn precheck_code(&self, response: &proto::TransactionResponse) -> Result<i32> {
        Ok(response.node_transaction_precheck_code)
    }

    fn make_response(
        &self,
        _response: proto::TransactionResponse,
        node: AccountId,
        request: &proto::Transaction,
    ) -> Result<TransactionResponse> {
        let hash = Sha384::digest(&request.signed_transaction_bytes).to_vec();
        Ok(TransactionResponse::new(
            node,
            self.transaction_id,
            hash,
            Arc::clone(self.transaction),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Channel, MockChannel};
    use crate::config::ClientConfig;
    use crate::signer::Ed25519Signer;
    use crate::status::Status;
    use bytes::Bytes;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    const TRANSFER: Method = Method::new("CryptoService", "cryptoTransfer");

    fn ok_precheck() -> std::result::Result<Bytes, crate::channel::TransportError> {
        Ok(Bytes::from(
            proto::TransactionResponse {
                node_transaction_precheck_code: Status::Ok.code(),
                cost: 0,
            }
            .encode_to_vec(),
        ))
    }

    fn client(mock: &MockChannel) -> Client {
        let channel: Arc<dyn Channel> = Arc::new(mock.clone());
        let client = Client::with_channels(
            vec![(AccountId::new(0, 0, 3), "mock".to_string(), channel)],
            ClientConfig::default(),
        );
        client.set_operator(
            AccountId::new(0, 0, 1001),
            Arc::new(Ed25519Signer::from_bytes(&[7u8; 32])),
        );
        client
    }

    #[tokio::test]
    async fn test_execute_signs_and_hashes() {
        let mock = MockChannel::new();
        mock.on_sequence(TRANSFER, vec![ok_precheck()]);
        let client = client(&mock);

        let response = Transaction::new(TRANSFER, vec![1u8, 2, 3])
            .with_memo("rent")
            .execute(&client)
            .await
            .unwrap();

        assert_eq!(response.node_id(), AccountId::new(0, 0, 3));
        assert_eq!(response.transaction_id().account_id, AccountId::new(0, 0, 1001));
        assert_eq!(response.transaction_id(), response.original_transaction_id());

        let calls = mock.calls_to(TRANSFER);
        assert_eq!(calls.len(), 1);
        let envelope = proto::Transaction::decode(calls[0].request.clone()).unwrap();
        assert_eq!(
            response.transaction_hash(),
            Sha384::digest(&envelope.signed_transaction_bytes).to_vec()
        );

        let signed = proto::SignedTransaction::decode(&envelope.signed_transaction_bytes[..]).unwrap();
        let body = proto::TransactionBody::decode(&signed.body_bytes[..]).unwrap();
        assert_eq!(body.memo, "rent");
        assert_eq!(body.operation, vec![1, 2, 3]);
        assert_eq!(body.node_account_id, Some(AccountId::new(0, 0, 3).to_proto()));
        assert_eq!(body.transaction_fee, DEFAULT_MAX_TRANSACTION_FEE);

        let pairs = signed.sig_map.unwrap().sig_pair;
        assert_eq!(pairs.len(), 1);
        let key_bytes: [u8; 32] = pairs[0].pub_key_prefix.as_slice().try_into().unwrap();
        let sig_bytes: [u8; 64] = pairs[0].ed25519.as_slice().try_into().unwrap();
        VerifyingKey::from_bytes(&key_bytes)
            .unwrap()
            .verify(&signed.body_bytes, &Signature::from_bytes(&sig_bytes))
            .unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_signers_sign_once() {
        let mock = MockChannel::new();
        mock.on_sequence(TRANSFER, vec![ok_precheck()]);
        let client = client(&mock);

        Transaction::new(TRANSFER, Vec::new())
            .sign_with(Arc::new(Ed25519Signer::from_bytes(&[7u8; 32])))
            .sign_with(Arc::new(Ed25519Signer::from_bytes(&[8u8; 32])))
            .execute(&client)
            .await
            .unwrap();

        let envelope = proto::Transaction::decode(mock.calls()[0].request.clone()).unwrap();
        let signed = proto::SignedTransaction::decode(&envelope.signed_transaction_bytes[..]).unwrap();
        assert_eq!(signed.sig_map.unwrap().sig_pair.len(), 2);
    }

    #[tokio::test]
    async fn test_requires_operator_without_explicit_id() {
        let mock = MockChannel::new();
        let client = client(&mock);
        client.clear_operator();

        let err = Transaction::new(TRANSFER, Vec::new())
            .execute(&client)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoOperator));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_id_is_used() {
        let mock = MockChannel::new();
        mock.on_sequence(TRANSFER, vec![ok_precheck()]);
        let client = client(&mock);

        let id = TransactionId::generate(AccountId::new(0, 0, 5));
        let response = Transaction::new(TRANSFER, Vec::new())
            .with_transaction_id(id)
            .execute(&client)
            .await
            .unwrap();
        assert_eq!(response.transaction_id(), id);
    }

    #[tokio::test]
    async fn test_precheck_rejection_carries_transaction_id() {
        let mock = MockChannel::new();
        mock.on_sequence(
            TRANSFER,
            vec![Ok(Bytes::from(
                proto::TransactionResponse {
                    node_transaction_precheck_code: Status::InsufficientPayerBalance.code(),
                    cost: 0,
                }
                .encode_to_vec(),
            ))],
        );
        let client = client(&mock);

        let id = TransactionId::generate(AccountId::new(0, 0, 1001));
        let err = Transaction::new(TRANSFER, Vec::new())
            .with_transaction_id(id)
            .execute(&client)
            .await
            .unwrap_err();

        match err {
            Error::PrecheckStatus(e) => {
                assert_eq!(e.status, Status::InsufficientPayerBalance);
                assert_eq!(e.transaction_id, Some(id));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
