use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tx {
    #[serde(default)]
    pub txid: String,
    pub sender: String,
    pub receiver: String,
    pub amount: Number,
    #[serde(default)]
    pub nonce: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub hash: String,
    pub prev_hash: String,
    #[serde(default)]
    pub txs: Vec<Tx>,
    /// Unix seconds; the node reports fractional seconds.
    pub timestamp: f64,
}

/// Genesis-first copy of the node's chain. Replaced wholesale on each fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainSnapshot(pub Vec<Block>);

impl ChainSnapshot {
    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    /// Index of the tip, `None` for an empty chain.
    pub fn height(&self) -> Option<u64> {
        (self.0.len() as u64).checked_sub(1)
    }

    pub fn tip(&self) -> Option<&Block> {
        self.0.last()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MempoolSnapshot(pub Vec<Tx>);

impl MempoolSnapshot {
    pub fn txs(&self) -> &[Tx] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceView {
    pub balance: Number,
    pub nonce: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountBalance {
    pub account: String,
    pub view: BalanceView,
}

/// Raw event log lines in node order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogSnapshot(pub Vec<String>);

impl LogSnapshot {
    pub fn lines(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef {
    pub index: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineRequest {
    pub miner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineResponse {
    pub block: BlockRef,
}

/// Amount and nonce are carried as raw JSON values: the console parses what the
/// operator typed but leaves range and sign checks to the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxRequest {
    pub sender: String,
    pub receiver: String,
    pub amount: Value,
    pub nonce: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TxResponse {
    #[serde(default)]
    pub accepted: bool,
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(default)]
    pub mined_block: Option<BlockRef>,
    #[serde(default)]
    pub attacked: Option<bool>,
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackRequest {
    pub requested_by: String,
    /// Client wall clock, unix milliseconds.
    pub ts: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeersResponse {
    #[serde(default)]
    pub peers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamsResponse {
    #[serde(default)]
    pub params: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetParamsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl SetParamsResponse {
    pub fn is_applied(&self) -> bool {
        self.status == "params_set"
    }
}
