#![allow(dead_code)]

use async_trait::async_trait;
use chainwatch_node_client::error::FetchError;
use chainwatch_node_client::{NodeApi, NodeGateway};
use chainwatch_sync::{Notifier, Pipeline, RefreshTrigger};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub struct Scripted {
    pub delay: Duration,
    pub result: Result<Value, FetchError>,
}

/// In-process node: per-path queued replies first, then a fixed reply.
#[derive(Default)]
pub struct ScriptedGateway {
    fixed: Mutex<HashMap<String, Result<Value, FetchError>>>,
    queued: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<String>>,
    posts: Mutex<Vec<(String, Value)>>,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, path: &str, value: Value) {
        self.fixed
            .lock()
            .unwrap()
            .insert(path.to_owned(), Ok(value));
    }

    pub fn fail(&self, path: &str, err: FetchError) {
        self.fixed.lock().unwrap().insert(path.to_owned(), Err(err));
    }

    pub fn enqueue(&self, path: &str, delay: Duration, result: Result<Value, FetchError>) {
        self.queued
            .lock()
            .unwrap()
            .entry(path.to_owned())
            .or_default()
            .push_back(Scripted { delay, result });
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls().iter().filter(|c| *c == path).count()
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().unwrap().clone()
    }

    async fn answer(&self, path: &str) -> Result<Value, FetchError> {
        self.calls.lock().unwrap().push(path.to_owned());
        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(VecDeque::pop_front);
        if let Some(scripted) = queued {
            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            }
            return scripted.result;
        }
        self.fixed
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::network(format!("no route {path}"))))
    }
}

#[async_trait]
impl NodeGateway for ScriptedGateway {
    async fn get(&self, path: &str) -> Result<Value, FetchError> {
        self.answer(path).await
    }

    async fn post(&self, path: &str, payload: Option<Value>) -> Result<Value, FetchError> {
        self.posts
            .lock()
            .unwrap()
            .push((path.to_owned(), payload.unwrap_or_else(|| json!({}))));
        self.answer(path).await
    }
}

pub fn api(gateway: &Arc<ScriptedGateway>) -> NodeApi {
    NodeApi::new(gateway.clone())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shown {
    Transient(String, Duration),
    Blocking(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub shown: Mutex<Vec<Shown>>,
}

impl RecordingNotifier {
    pub fn shown(&self) -> Vec<Shown> {
        self.shown.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_transient(&self, message: &str, duration: Duration) {
        self.shown
            .lock()
            .unwrap()
            .push(Shown::Transient(message.to_owned(), duration));
    }

    fn show_blocking(&self, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push(Shown::Blocking(message.to_owned()));
    }
}

#[derive(Default)]
pub struct RecordingRefresh {
    pub requested: Mutex<Vec<Pipeline>>,
}

impl RecordingRefresh {
    pub fn requested(&self) -> Vec<Pipeline> {
        self.requested.lock().unwrap().clone()
    }
}

impl RefreshTrigger for RecordingRefresh {
    fn refresh_now(&self, pipeline: Pipeline) {
        self.requested.lock().unwrap().push(pipeline);
    }
}

pub fn block(index: u64) -> Value {
    json!({
        "index": index,
        "hash": format!("{:064x}", 0xb10c + index),
        "prev_hash": if index == 0 { "GENESIS".to_owned() } else { format!("{:064x}", 0xb10c + index - 1) },
        "timestamp": 1_700_000_000.0 + index as f64,
        "nonce": 0,
        "txs": [],
    })
}

pub fn chain(len: u64) -> Value {
    Value::Array((0..len).map(block).collect())
}

pub fn tx(txid: &str, amount: i64) -> Value {
    json!({"txid": txid, "sender": "alice", "receiver": "bob", "amount": amount, "nonce": 0})
}
