//! JSON-RPC 2.0 client over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use saros_felt::Felt;
use saros_transactions::{
    BroadcastedTransaction, DeclareTransaction, DeployAccountTransaction, InvokeTransaction,
};

use crate::types::{
    BlockId, DeclareTransactionResult, DeployAccountTransactionResult, FeeEstimate, FunctionCall,
    InvokeTransactionResult, TransactionReceipt,
};
use crate::{Provider, ProviderError};

/// HTTP JSON-RPC implementation of [`Provider`].
#[derive(Debug)]
pub struct JsonRpcClient {
    client: reqwest::Client,
    url: Url,
    request_id: AtomicU64,
}

#[derive(Serialize)]
struct JsonRpcRequest<'a, P: Serialize> {
    id: u64,
    jsonrpc: &'static str,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

impl JsonRpcClient {
    pub fn new(url: Url) -> Self {
        Self { client: reqwest::Client::new(), url, request_id: AtomicU64::new(0) }
    }

    async fn send_request<T, P>(&self, method: &str, params: P) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest { id, jsonrpc: "2.0", method, params };

        log::debug!("rpc request #{id}: {method}");
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .json(&request)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        let body: JsonRpcResponse<T> = response.json().await?;
        match (body.result, body.error) {
            (Some(result), None) => Ok(result),
            (_, Some(error)) => {
                Err(ProviderError::StarknetError { code: error.code, message: error.message })
            }
            (None, None) => Err(ProviderError::UnexpectedResponse(
                "response carries neither result nor error".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Provider for JsonRpcClient {
    async fn chain_id(&self) -> Result<Felt, ProviderError> {
        self.send_request("starknet_chainId", json!([])).await
    }

    async fn get_nonce(
        &self,
        block_id: BlockId,
        contract_address: Felt,
    ) -> Result<Felt, ProviderError> {
        self.send_request(
            "starknet_getNonce",
            json!({ "block_id": block_id, "contract_address": contract_address }),
        )
        .await
    }

    async fn call(
        &self,
        request: &FunctionCall,
        block_id: BlockId,
    ) -> Result<Vec<Felt>, ProviderError> {
        self.send_request("starknet_call", json!({ "request": request, "block_id": block_id }))
            .await
    }

    async fn estimate_fee(
        &self,
        transactions: &[BroadcastedTransaction],
        block_id: BlockId,
    ) -> Result<Vec<FeeEstimate>, ProviderError> {
        self.send_request(
            "starknet_estimateFee",
            json!({
                "request": transactions,
                "simulation_flags": [],
                "block_id": block_id,
            }),
        )
        .await
    }

    async fn add_invoke_transaction(
        &self,
        transaction: &InvokeTransaction,
    ) -> Result<InvokeTransactionResult, ProviderError> {
        self.send_request(
            "starknet_addInvokeTransaction",
            json!({ "invoke_transaction": transaction }),
        )
        .await
    }

    async fn add_declare_transaction(
        &self,
        transaction: &DeclareTransaction,
    ) -> Result<DeclareTransactionResult, ProviderError> {
        self.send_request(
            "starknet_addDeclareTransaction",
            json!({ "declare_transaction": transaction }),
        )
        .await
    }

    async fn add_deploy_account_transaction(
        &self,
        transaction: &DeployAccountTransaction,
    ) -> Result<DeployAccountTransactionResult, ProviderError> {
        self.send_request(
            "starknet_addDeployAccountTransaction",
            json!({ "deploy_account_transaction": transaction }),
        )
        .await
    }

    async fn get_transaction_receipt(
        &self,
        transaction_hash: Felt,
    ) -> Result<TransactionReceipt, ProviderError> {
        self.send_request(
            "starknet_getTransactionReceipt",
            json!({ "transaction_hash": transaction_hash }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_envelope_shape() {
        let request = JsonRpcRequest {
            id: 7,
            jsonrpc: "2.0",
            method: "starknet_getNonce",
            params: json!({ "block_id": "latest", "contract_address": "0x1" }),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 7);
        assert_eq!(value["method"], "starknet_getNonce");
        assert_eq!(value["params"]["contract_address"], "0x1");
    }

    #[test]
    fn error_response_parses() {
        let body: JsonRpcResponse<Felt> = serde_json::from_str(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"error\":{\"code\":52,\"message\":\"Invalid transaction nonce\"}}",
        )
        .unwrap();
        assert!(body.result.is_none());
        let error = body.error.unwrap();
        assert_eq!(error.code, 52);
        assert_eq!(error.message, "Invalid transaction nonce");
    }

    #[test]
    fn result_response_parses() {
        let body: JsonRpcResponse<Felt> =
            serde_json::from_str("{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":\"0x5\"}").unwrap();
        assert_eq!(body.result, Some(Felt::from(5u8)));
        assert!(body.error.is_none());
    }
}
