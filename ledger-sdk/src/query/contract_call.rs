//! Local contract calls
//!
//! A local call runs a contract function on a single node without reaching
//! consensus. A reverted call still returns the partial execution result,
//! which is attached to the precheck error.

use ledger_proto::{self as proto, services};

use super::{answer_only, precheck_code};
use crate::channel::Method;
use crate::client::Client;
use crate::contract::ContractFunctionResult;
use crate::error::PrecheckStatusError;
use crate::execute::{execute, ExecuteOptions, Executable};
use crate::ids::{AccountId, ContractId, TransactionId};
use crate::status::Status;
use crate::{Error, Result};

/// Call a contract function locally on one node
#[derive(Debug, Clone)]
pub struct ContractCallQuery {
    contract_id: ContractId,
    gas: u64,
    function_parameters: Vec<u8>,
    sender_id: Option<AccountId>,
    node_account_ids: Option<Vec<AccountId>>,
}

impl ContractCallQuery {
    /// Remote method serving local calls
    pub const METHOD: Method = Method::new(services::SMART_CONTRACT, "contractCallLocalMethod");

    /// Call `contract_id` with the given gas limit
    pub fn new(contract_id: ContractId, gas: u64) -> Self {
        Self {
            contract_id,
            gas,
            function_parameters: Vec::new(),
            sender_id: None,
            node_account_ids: None,
        }
    }

    /// ABI-encoded selector and arguments
    pub fn with_function_parameters(mut self, parameters: impl Into<Vec<u8>>) -> Self {
        self.function_parameters = parameters.into();
        self
    }

    /// Account the call is made on behalf of
    pub fn with_sender(mut self, sender_id: AccountId) -> Self {
        self.sender_id = Some(sender_id);
        self
    }

    /// Only ask these nodes
    pub fn with_node_account_ids(mut self, node_account_ids: Vec<AccountId>) -> Self {
        self.node_account_ids = Some(node_account_ids);
        self
    }

    /// Execute with the client defaults
    pub async fn execute(&self, client: &Client) -> Result<ContractFunctionResult> {
        execute(self, client, &ExecuteOptions::default()).await
    }

    /// Execute with per-call overrides
    pub async fn execute_with(
        &self,
        client: &Client,
        options: ExecuteOptions,
    ) -> Result<ContractFunctionResult> {
        execute(self, client, &options).await
    }
}

fn call_response(response: &proto::Response) -> Result<&proto::ContractCallLocalResponse> {
    match &response.response {
        Some(proto::response::Response::ContractCallLocal(inner)) => Ok(inner),
        _ => Err(Error::MissingField("response.contract_call_local")),
    }
}

impl Executable for ContractCallQuery {
    type Request = proto::Query;
    type Response = proto::Response;
    type Output = ContractFunctionResult;

    fn method(&self) -> Method {
        Self::METHOD
    }

    fn node_account_ids(&self) -> Option<&[AccountId]> {
        self.node_account_ids.as_deref()
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        None
    }

    fn make_request(&self, _node: AccountId) -> Result<proto::Query> {
        let gas = i64::try_from(self.gas)
            .map_err(|_| Error::Config(format!("gas limit {} out of range", self.gas)))?;
        Ok(proto::Query {
            query: Some(proto::query::Query::ContractCallLocal(proto::ContractCallLocalQuery {
                header: answer_only(),
                contract_id: Some(self.contract_id.to_proto()),
                gas,
                function_parameters: self.function_parameters.clone(),
                sender_id: self.sender_id.map(|id| id.to_proto()),
            })),
        })
    }

    fn precheck_code(&self, response: &proto::Response) -> Result<i32> {
        precheck_code(call_response(response)?.header.as_ref())
    }

    fn make_response(
        &self,
        response: proto::Response,
        _node: AccountId,
        _request: &proto::Query,
    ) -> Result<ContractFunctionResult> {
        match response.response {
            Some(proto::response::Response::ContractCallLocal(inner)) => inner
                .function_result
                .map(ContractFunctionResult::from_proto)
                .ok_or(Error::MissingField("contract_call_local.function_result")),
            _ => Err(Error::MissingField("response.contract_call_local")),
        }
    }

    fn make_status_error(&self, status: Status, response: &proto::Response, node: AccountId) -> Error {
        let mut err = PrecheckStatusError::new(status, node, None);
        err.contract_function_result = call_response(response)
            .ok()
            .and_then(|inner| inner.function_result.clone())
            .map(ContractFunctionResult::from_proto);
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Channel, MockChannel};
    use crate::config::ClientConfig;
    use bytes::Bytes;
    use prost::Message;
    use std::sync::Arc;

    fn setup(precheck: Status, error_message: &str) -> (MockChannel, Client) {
        let response = proto::Response {
            response: Some(proto::response::Response::ContractCallLocal(
                proto::ContractCallLocalResponse {
                    header: Some(proto::ResponseHeader {
                        node_transaction_precheck_code: precheck.code(),
                        cost: 0,
                    }),
                    function_result: Some(proto::ContractFunctionResult {
                        contract_id: Some(ContractId::new(0, 0, 1500).to_proto()),
                        contract_call_result: vec![0xab; 32],
                        error_message: error_message.to_string(),
                        gas_used: 30_000,
                    }),
                },
            )),
        };

        let mock = MockChannel::new();
        mock.on_sequence(
            ContractCallQuery::METHOD,
            vec![Ok(Bytes::from(response.encode_to_vec()))],
        );
        let channel: Arc<dyn Channel> = Arc::new(mock.clone());
        let client = Client::with_channels(
            vec![(AccountId::new(0, 0, 3), "mock".to_string(), channel)],
            ClientConfig::default(),
        );
        (mock, client)
    }

    #[tokio::test]
    async fn test_call_returns_result() {
        let (mock, client) = setup(Status::Ok, "");

        let result = ContractCallQuery::new(ContractId::new(0, 0, 1500), 100_000)
            .with_function_parameters(vec![0x06u8, 0xfd, 0xde, 0x03])
            .execute(&client)
            .await
            .unwrap();

        assert_eq!(result.gas_used, 30_000);
        assert_eq!(result.word(0), Some(&[0xab; 32][..]));

        let request = proto::Query::decode(mock.calls()[0].request.clone()).unwrap();
        match request.query {
            Some(proto::query::Query::ContractCallLocal(query)) => {
                assert_eq!(query.gas, 100_000);
                assert_eq!(query.function_parameters, vec![0x06, 0xfd, 0xde, 0x03]);
            }
            other => panic!("unexpected query: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_revert_carries_partial_result() {
        let (_, client) = setup(Status::ContractRevertExecuted, "out of stock");

        let err = ContractCallQuery::new(ContractId::new(0, 0, 1500), 100_000)
            .execute(&client)
            .await
            .unwrap_err();

        match err {
            Error::PrecheckStatus(e) => {
                assert_eq!(e.status, Status::ContractRevertExecuted);
                assert!(e.transaction_id.is_none());
                let partial = e.contract_function_result.unwrap();
                assert_eq!(partial.error_message.as_deref(), Some("out of stock"));
                assert_eq!(partial.gas_used, 30_000);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
