use crate::notifier::Notifier;
use crate::scheduler::{Pipeline, RefreshTrigger};
use chainwatch_node_client::NodeApi;
use chainwatch_protocol::error::FetchError;
use chainwatch_protocol::types::{AttackRequest, TxRequest, TxResponse};
use chainwatch_views::display::txid_prefix;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const TX_REJECTED_NOTICE: &str = "Transaction rejected (check balance/nonce).";
pub const TX_FAILED_NOTICE: &str = "Error sending transaction: backend unreachable.";
pub const MINE_FAILED_NOTICE: &str = "Mining failed: backend unreachable.";
pub const ATTACK_ARMED_NOTICE: &str = "Attack armed! The next transaction will be intercepted.";
pub const ATTACK_FAILED_NOTICE: &str = "Could not trigger attack: backend unreachable.";

/// Raw transaction form fields as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxForm {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub receiver: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub nonce: String,
}

impl TxForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_request(&self) -> TxRequest {
        TxRequest {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            amount: parse_number(&self.amount),
            nonce: parse_number(&self.nonce),
        }
    }
}

/// Numeric coercion of a form field. Blank is zero and text that is not a
/// finite number becomes `null`; sign and range are left to the node.
pub fn parse_number(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.is_empty() {
        return Value::from(0);
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitState {
    Idle,
    Submitting,
    Accepted,
    Rejected,
    Failed,
}

impl SubmitState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Failed)
    }

    /// Legal successor, `None` for a transition the machine does not have.
    pub fn advance(self, next: SubmitState) -> Option<SubmitState> {
        let ok = match (self, next) {
            (Self::Idle, Self::Submitting) => true,
            (Self::Submitting, n) => n.is_terminal(),
            (s, Self::Idle) => s.is_terminal(),
            _ => false,
        };
        ok.then_some(next)
    }
}

/// One run of the machine. Instances never share state, so concurrent
/// submissions simply run side by side.
struct Submission {
    action: &'static str,
    state: SubmitState,
}

impl Submission {
    fn begin(action: &'static str) -> Self {
        let mut this = Self {
            action,
            state: SubmitState::Idle,
        };
        this.move_to(SubmitState::Submitting);
        this
    }

    fn move_to(&mut self, next: SubmitState) {
        match self.state.advance(next) {
            Some(state) => {
                debug!(action = self.action, from = ?self.state, to = ?state, "submission state");
                self.state = state;
            }
            None => warn!(action = self.action, from = ?self.state, to = ?next, "illegal submission transition"),
        }
    }

    fn settle(mut self, terminal: SubmitState) {
        self.move_to(terminal);
        self.move_to(SubmitState::Idle);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Accepted {
        txid: String,
        block_index: Option<u64>,
    },
    Rejected,
    Failed(FetchError),
}

impl SubmitOutcome {
    pub fn state(&self) -> SubmitState {
        match self {
            Self::Accepted { .. } => SubmitState::Accepted,
            Self::Rejected => SubmitState::Rejected,
            Self::Failed(_) => SubmitState::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MineOutcome {
    Mined { index: u64 },
    Failed(FetchError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttackOutcome {
    Armed(Value),
    Failed(FetchError),
}

pub fn accepted_notice(txid: &str, block_index: Option<u64>) -> String {
    let block = block_index
        .map(|i| i.to_string())
        .unwrap_or_else(|| "N/A".to_owned());
    format!(
        "Transaction accepted\nTXID: {}...\nIncluded in Block #{}",
        txid_prefix(txid),
        block
    )
}

pub fn mined_notice(index: u64) -> String {
    format!("Mined Block #{index}")
}

/// Builds action payloads, posts them and drives operator feedback.
#[derive(Clone)]
pub struct ActionSubmitter {
    api: NodeApi,
    notifier: Arc<dyn Notifier>,
    refresh: Arc<dyn RefreshTrigger>,
    miner: String,
    attack_requester: String,
    transient: Duration,
}

impl ActionSubmitter {
    pub fn new(
        api: NodeApi,
        notifier: Arc<dyn Notifier>,
        refresh: Arc<dyn RefreshTrigger>,
        miner: String,
        attack_requester: String,
        transient: Duration,
    ) -> Self {
        Self {
            api,
            notifier,
            refresh,
            miner,
            attack_requester,
            transient,
        }
    }

    /// On acceptance the form is cleared and dashboard plus mempool refresh
    /// immediately; on rejection or failure the form keeps its contents.
    pub async fn submit_transaction(&self, form: &mut TxForm) -> SubmitOutcome {
        let submission = Submission::begin("submit_tx");
        let req = form.to_request();
        let outcome = match self.api.submit_tx(&req).await {
            Ok(response) => interpret_tx_response(response),
            Err(err) => SubmitOutcome::Failed(err),
        };

        match &outcome {
            SubmitOutcome::Accepted { txid, block_index } => {
                info!(%txid, block = ?block_index, "transaction accepted");
                self.notifier
                    .show_transient(&accepted_notice(txid, *block_index), self.transient);
                form.clear();
                self.refresh.refresh_now(Pipeline::Dashboard);
                self.refresh.refresh_now(Pipeline::Mempool);
            }
            SubmitOutcome::Rejected => {
                info!(sender = %req.sender, "transaction rejected by node");
                self.notifier.show_blocking(TX_REJECTED_NOTICE);
            }
            SubmitOutcome::Failed(err) => {
                warn!(%err, "transaction submission failed");
                self.notifier.show_blocking(TX_FAILED_NOTICE);
            }
        }
        submission.settle(outcome.state());
        outcome
    }

    pub async fn mine(&self) -> MineOutcome {
        let submission = Submission::begin("mine");
        match self.api.mine(&self.miner).await {
            Ok(response) => {
                let index = response.block.index;
                info!(miner = %self.miner, index, "block mined");
                self.notifier.show_blocking(&mined_notice(index));
                self.refresh.refresh_now(Pipeline::Dashboard);
                submission.settle(SubmitState::Accepted);
                MineOutcome::Mined { index }
            }
            Err(err) => {
                warn!(%err, "mine request failed");
                self.notifier.show_blocking(MINE_FAILED_NOTICE);
                submission.settle(SubmitState::Failed);
                MineOutcome::Failed(err)
            }
        }
    }

    /// Fire-and-forget: the effect shows up once the log pipeline next runs.
    pub async fn trigger_attack(&self) -> AttackOutcome {
        let submission = Submission::begin("run_attack");
        let req = AttackRequest {
            requested_by: self.attack_requester.clone(),
            ts: chrono::Utc::now().timestamp_millis(),
        };
        match self.api.run_attack(&req).await {
            Ok(reply) => {
                info!(requested_by = %req.requested_by, %reply, "attack armed");
                self.notifier.show_blocking(ATTACK_ARMED_NOTICE);
                submission.settle(SubmitState::Accepted);
                AttackOutcome::Armed(reply)
            }
            Err(err) => {
                warn!(%err, "attack trigger failed");
                self.notifier.show_blocking(ATTACK_FAILED_NOTICE);
                submission.settle(SubmitState::Failed);
                AttackOutcome::Failed(err)
            }
        }
    }
}

fn interpret_tx_response(response: TxResponse) -> SubmitOutcome {
    if !response.accepted {
        return SubmitOutcome::Rejected;
    }
    match response.txid {
        Some(txid) => SubmitOutcome::Accepted {
            txid,
            block_index: response.mined_block.map(|b| b.index),
        },
        None => SubmitOutcome::Failed(FetchError::parse("accepted response without txid")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_number_mirrors_form_coercion() {
        assert_eq!(parse_number(""), json!(0));
        assert_eq!(parse_number(" 12 "), json!(12));
        assert_eq!(parse_number("-3"), json!(-3));
        assert_eq!(parse_number("2.5"), json!(2.5));
        assert_eq!(parse_number("ten"), Value::Null);
        assert_eq!(parse_number("NaN"), Value::Null);
    }

    #[test]
    fn state_machine_allows_only_documented_transitions() {
        use SubmitState::*;
        assert_eq!(Idle.advance(Submitting), Some(Submitting));
        for terminal in [Accepted, Rejected, Failed] {
            assert_eq!(Submitting.advance(terminal), Some(terminal));
            assert_eq!(terminal.advance(Idle), Some(Idle));
            assert_eq!(Idle.advance(terminal), None);
        }
        assert_eq!(Submitting.advance(Idle), None);
        assert_eq!(Accepted.advance(Submitting), None);
    }

    #[test]
    fn accepted_notice_uses_short_txid_and_block() {
        let text = accepted_notice("abcdef1234567890", Some(7));
        assert!(text.contains("abcdef1234..."));
        assert!(!text.contains("abcdef12345"));
        assert!(text.contains("Block #7"));
        assert!(accepted_notice("ff", None).contains("Block #N/A"));
    }

    #[test]
    fn accepted_without_txid_is_a_shape_failure() {
        let outcome = interpret_tx_response(TxResponse {
            accepted: true,
            ..Default::default()
        });
        assert!(matches!(outcome, SubmitOutcome::Failed(FetchError::Parse(_))));
        assert_eq!(
            interpret_tx_response(TxResponse::default()),
            SubmitOutcome::Rejected
        );
    }
}
