use chainwatch_protocol::constants::balance_path;
use chainwatch_protocol::types::{
    ChainSnapshot, LogSnapshot, MempoolSnapshot, MineResponse, SetParamsResponse, TxResponse,
};
use serde_json::json;

#[test]
fn chain_snapshot_decodes_node_blocks_and_reports_height() {
    let chain: ChainSnapshot = serde_json::from_value(json!([
        {"index": 0, "hash": "00aa", "prev_hash": "GENESIS", "timestamp": 1700000000.5, "nonce": 0, "txs": []},
        {"index": 1, "hash": "00bb", "prev_hash": "00aa", "timestamp": 1700000010.0, "nonce": 42, "txs": [
            {"sender": "COINBASE", "receiver": "miner", "amount": 50, "nonce": 0, "txid": "c0ffee"}
        ]}
    ]))
    .unwrap();

    assert_eq!(chain.height(), Some(1));
    assert_eq!(chain.tip().map(|b| b.hash.as_str()), Some("00bb"));
    assert_eq!(chain.blocks()[1].txs[0].amount.to_string(), "50");
    assert_eq!(ChainSnapshot::default().height(), None);
}

#[test]
fn mempool_and_logs_decode_from_bare_arrays() {
    let mempool: MempoolSnapshot = serde_json::from_value(json!([])).unwrap();
    assert!(mempool.is_empty());

    let logs: LogSnapshot = serde_json::from_value(json!(["[1] a", "[2] b"])).unwrap();
    assert_eq!(logs.lines(), ["[1] a".to_owned(), "[2] b".to_owned()]);
    assert!(serde_json::from_value::<LogSnapshot>(json!([1, 2])).is_err());
}

#[test]
fn tx_response_treats_missing_accepted_as_false() {
    let response: TxResponse = serde_json::from_value(json!({"txid": "abc"})).unwrap();
    assert!(!response.accepted);
    assert_eq!(response.mined_block, None);

    let response: TxResponse = serde_json::from_value(json!({
        "accepted": true,
        "attacked": false,
        "txid": "abcdef1234567890",
        "mined_block": {"index": 7, "hash": "000f", "prev_hash": "000e", "txs": [], "timestamp": 1.0}
    }))
    .unwrap();
    assert!(response.accepted);
    assert_eq!(response.mined_block.map(|b| b.index), Some(7));
}

#[test]
fn tx_response_accepts_null_mined_block() {
    let response: TxResponse =
        serde_json::from_value(json!({"accepted": false, "txid": "x", "mined_block": null}))
            .unwrap();
    assert_eq!(response.mined_block, None);
}

#[test]
fn mine_response_reads_block_index_only() {
    let response: MineResponse = serde_json::from_value(json!({
        "block": {"index": 3, "hash": "000a", "prev_hash": "0009", "txs": [], "timestamp": 2.0, "nonce": 9}
    }))
    .unwrap();
    assert_eq!(response.block.index, 3);
}

#[test]
fn set_params_status_maps_to_applied_flag() {
    let ok: SetParamsResponse =
        serde_json::from_value(json!({"status": "params_set", "params": {"a": 1}})).unwrap();
    assert!(ok.is_applied());
    let err: SetParamsResponse = serde_json::from_value(json!({"status": "error"})).unwrap();
    assert!(!err.is_applied());
}

#[test]
fn balance_path_appends_account() {
    assert_eq!(balance_path("alice"), "/api/balance/alice");
}
