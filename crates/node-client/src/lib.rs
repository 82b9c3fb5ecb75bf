pub mod constants {
    pub use chainwatch_protocol::constants::*;
}

pub mod error {
    pub use chainwatch_protocol::error::*;
}

pub mod types {
    pub use chainwatch_protocol::types::*;
}

use crate::constants::{
    PATH_CHAIN, PATH_GET_PARAMS, PATH_LOGS, PATH_MEMPOOL, PATH_MINE, PATH_PEERS, PATH_RUN_ATTACK,
    PATH_SET_PARAMS, PATH_TX, balance_path,
};
use crate::error::FetchError;
use crate::types::{
    AttackRequest, BalanceView, ChainSnapshot, LogSnapshot, MempoolSnapshot, MineRequest,
    MineResponse, ParamsResponse, PeersResponse, SetParamsResponse, TxRequest, TxResponse,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Raw GET/POST access to the node. Paths are relative to a fixed base origin.
#[async_trait]
pub trait NodeGateway: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, FetchError>;

    /// A missing payload is sent as an empty JSON object.
    async fn post(&self, path: &str, payload: Option<Value>) -> Result<Value, FetchError>;
}

#[derive(Clone)]
pub struct HttpNodeGateway {
    base_url: String,
    client: Client,
}

impl HttpNodeGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl NodeGateway for HttpNodeGateway {
    async fn get(&self, path: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|err| FetchError::network(format!("GET {path}: {err}")))?;
        read_json(response, path).await
    }

    async fn post(&self, path: &str, payload: Option<Value>) -> Result<Value, FetchError> {
        let body = payload.unwrap_or_else(|| json!({}));
        let response = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .map_err(|err| FetchError::network(format!("POST {path}: {err}")))?;
        read_json(response, path).await
    }
}

async fn read_json(response: reqwest::Response, path: &str) -> Result<Value, FetchError> {
    let response = response
        .error_for_status()
        .map_err(|err| FetchError::network(format!("{path} status: {err}")))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|err| FetchError::network(format!("{path} body: {err}")))?;
    serde_json::from_slice(&bytes).map_err(|err| FetchError::parse(format!("{path} decode: {err}")))
}

fn decode<T: DeserializeOwned>(value: Value, path: &str) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|err| FetchError::parse(format!("{path} shape: {err}")))
}

fn encode<T: Serialize>(payload: &T, path: &str) -> Result<Value, FetchError> {
    serde_json::to_value(payload).map_err(|err| FetchError::parse(format!("{path} encode: {err}")))
}

/// Typed view of the node API. Every call yields a complete snapshot or a
/// `FetchError`; nothing is cached between calls.
#[derive(Clone)]
pub struct NodeApi {
    gateway: Arc<dyn NodeGateway>,
}

impl NodeApi {
    pub fn new(gateway: Arc<dyn NodeGateway>) -> Self {
        Self { gateway }
    }

    pub fn http(base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpNodeGateway::new(base_url)))
    }

    pub async fn chain(&self) -> Result<ChainSnapshot, FetchError> {
        decode(self.gateway.get(PATH_CHAIN).await?, PATH_CHAIN)
    }

    pub async fn mempool(&self) -> Result<MempoolSnapshot, FetchError> {
        decode(self.gateway.get(PATH_MEMPOOL).await?, PATH_MEMPOOL)
    }

    pub async fn balance(&self, account: &str) -> Result<BalanceView, FetchError> {
        let path = balance_path(account);
        decode(self.gateway.get(&path).await?, &path)
    }

    pub async fn logs(&self) -> Result<LogSnapshot, FetchError> {
        decode(self.gateway.get(PATH_LOGS).await?, PATH_LOGS)
    }

    pub async fn mine(&self, miner: &str) -> Result<MineResponse, FetchError> {
        let payload = encode(
            &MineRequest {
                miner: miner.to_owned(),
            },
            PATH_MINE,
        )?;
        decode(self.gateway.post(PATH_MINE, Some(payload)).await?, PATH_MINE)
    }

    pub async fn submit_tx(&self, req: &TxRequest) -> Result<TxResponse, FetchError> {
        let payload = encode(req, PATH_TX)?;
        decode(self.gateway.post(PATH_TX, Some(payload)).await?, PATH_TX)
    }

    /// The node's reply is implementation-defined and returned unvalidated.
    pub async fn run_attack(&self, req: &AttackRequest) -> Result<Value, FetchError> {
        let payload = encode(req, PATH_RUN_ATTACK)?;
        self.gateway.post(PATH_RUN_ATTACK, Some(payload)).await
    }

    pub async fn peers(&self) -> Result<PeersResponse, FetchError> {
        decode(self.gateway.get(PATH_PEERS).await?, PATH_PEERS)
    }

    pub async fn params(&self) -> Result<ParamsResponse, FetchError> {
        decode(self.gateway.get(PATH_GET_PARAMS).await?, PATH_GET_PARAMS)
    }

    pub async fn set_params(
        &self,
        params: Map<String, Value>,
    ) -> Result<SetParamsResponse, FetchError> {
        decode(
            self.gateway
                .post(PATH_SET_PARAMS, Some(Value::Object(params)))
                .await?,
            PATH_SET_PARAMS,
        )
    }
}
