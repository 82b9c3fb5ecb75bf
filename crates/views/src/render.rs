//! One renderer per view. Each renderer clears its container and refills it
//! from a single snapshot, so a view never mixes two snapshots. Renderers
//! hold no state between calls and skip containers the page does not have.

use crate::classifier::{Category, classify};
use crate::display::{fmt_block_time, short_hash, short_tip_hash, short_txid};
use crate::sink::{ViewNode, ViewSink, containers};
use chainwatch_protocol::types::{AccountBalance, ChainSnapshot, LogSnapshot, MempoolSnapshot};

pub const MEMPOOL_COLUMNS: usize = 4;
pub const EMPTY_MEMPOOL_TEXT: &str = "No pending transactions";

fn fill(sink: &dyn ViewSink, container: &str, build: impl FnOnce() -> Vec<ViewNode>) {
    if !sink.has_container(container) {
        return;
    }
    sink.replace_children(container, build());
}

/// Explorer block table: index ascending, as delivered by the node.
pub fn render_chain_table(sink: &dyn ViewSink, chain: &ChainSnapshot) {
    fill(sink, containers::BLOCK_TABLE, || {
        chain
            .blocks()
            .iter()
            .map(|block| ViewNode::Row {
                cells: vec![
                    block.index.to_string(),
                    short_hash(&block.hash),
                    short_hash(&block.prev_hash),
                    block.txs.len().to_string(),
                    fmt_block_time(block.timestamp),
                ],
            })
            .collect()
    });
}

pub fn render_mempool_table(sink: &dyn ViewSink, mempool: &MempoolSnapshot) {
    fill(sink, containers::MEMPOOL_TABLE, || {
        if mempool.is_empty() {
            return vec![ViewNode::Placeholder {
                text: EMPTY_MEMPOOL_TEXT.to_owned(),
                colspan: MEMPOOL_COLUMNS,
            }];
        }
        mempool
            .txs()
            .iter()
            .map(|tx| ViewNode::Row {
                cells: vec![
                    short_txid(&tx.txid),
                    tx.sender.clone(),
                    tx.receiver.clone(),
                    tx.amount.to_string(),
                ],
            })
            .collect()
    });
}

pub fn render_chain_summary(sink: &dyn ViewSink, chain: &ChainSnapshot) {
    fill(sink, containers::CHAIN_SUMMARY, || {
        let height = chain
            .height()
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_owned());
        let tip = chain
            .tip()
            .map(|b| short_tip_hash(&b.hash))
            .unwrap_or_else(|| "-".to_owned());
        vec![
            ViewNode::Field {
                label: "Chain Height".to_owned(),
                value: height,
            },
            ViewNode::Field {
                label: "Last Block Hash".to_owned(),
                value: tip,
            },
        ]
    });
}

pub fn render_miner_balance(sink: &dyn ViewSink, miner: &AccountBalance) {
    fill(sink, containers::MINER_BALANCE, || {
        vec![ViewNode::Field {
            label: "Miner Balance".to_owned(),
            value: miner.view.balance.to_string(),
        }]
    });
}

pub fn render_account_balances(sink: &dyn ViewSink, balances: &[AccountBalance]) {
    fill(sink, containers::ACCOUNT_BALANCES, || {
        balances
            .iter()
            .map(|entry| ViewNode::Field {
                label: entry.account.clone(),
                value: format!("{} (nonce {})", entry.view.balance, entry.view.nonce),
            })
            .collect()
    });
}

/// Full event log, one line per entry in node order.
pub fn render_log_panel(sink: &dyn ViewSink, logs: &LogSnapshot) {
    fill(sink, containers::LOG_CONTAINER, || {
        logs.lines()
            .iter()
            .map(|line| ViewNode::Line {
                category: classify(line),
                text: line.clone(),
            })
            .collect()
    });
}

/// Recent attacks: the attack-success subset of the same log, same order.
pub fn render_attack_panel(sink: &dyn ViewSink, logs: &LogSnapshot) {
    fill(sink, containers::RECENT_ATTACKS, || {
        logs.lines()
            .iter()
            .filter(|line| classify(line) == Category::AttackSuccess)
            .map(|line| ViewNode::Line {
                category: Category::AttackSuccess,
                text: line.clone(),
            })
            .collect()
    });
}

pub fn render_logs(sink: &dyn ViewSink, logs: &LogSnapshot) {
    render_log_panel(sink, logs);
    render_attack_panel(sink, logs);
}
