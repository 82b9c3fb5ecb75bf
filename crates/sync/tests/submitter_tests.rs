mod support;

use chainwatch_node_client::error::FetchError;
use chainwatch_sync::submitter::{
    ATTACK_ARMED_NOTICE, ATTACK_FAILED_NOTICE, MINE_FAILED_NOTICE, TX_FAILED_NOTICE,
    TX_REJECTED_NOTICE,
};
use chainwatch_sync::{
    ActionSubmitter, AttackOutcome, MineOutcome, Pipeline, PipelineRunner, Refresher,
    SubmitOutcome, TxForm,
};
use chainwatch_views::{Page, PageSinks, containers};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use support::{RecordingNotifier, RecordingRefresh, ScriptedGateway, Shown, api, chain};

struct Harness {
    gateway: Arc<ScriptedGateway>,
    notifier: Arc<RecordingNotifier>,
    refresh: Arc<RecordingRefresh>,
    submitter: ActionSubmitter,
}

fn harness() -> Harness {
    let gateway = ScriptedGateway::new();
    let notifier = Arc::new(RecordingNotifier::default());
    let refresh = Arc::new(RecordingRefresh::default());
    let submitter = ActionSubmitter::new(
        api(&gateway),
        notifier.clone(),
        refresh.clone(),
        "miner".to_owned(),
        "dashboard".to_owned(),
        Duration::from_secs(4),
    );
    Harness {
        gateway,
        notifier,
        refresh,
        submitter,
    }
}

fn filled_form() -> TxForm {
    TxForm {
        sender: "alice".to_owned(),
        receiver: "bob".to_owned(),
        amount: "5".to_owned(),
        nonce: "1".to_owned(),
    }
}

#[tokio::test]
async fn accepted_transaction_notifies_clears_form_and_refreshes() {
    let h = harness();
    h.gateway.reply(
        "/api/tx",
        json!({"accepted": true, "txid": "abcdef1234567890", "mined_block": {"index": 7}}),
    );
    let mut form = filled_form();

    let outcome = h.submitter.submit_transaction(&mut form).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Accepted {
            txid: "abcdef1234567890".to_owned(),
            block_index: Some(7),
        }
    );

    let posts = h.gateway.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(
        posts[0].1,
        json!({"sender": "alice", "receiver": "bob", "amount": 5, "nonce": 1})
    );

    let shown = h.notifier.shown();
    assert_eq!(shown.len(), 1);
    let Shown::Transient(message, duration) = &shown[0] else {
        panic!("expected a transient notice, got {shown:?}");
    };
    assert!(message.contains("abcdef1234..."));
    assert!(message.contains("Block #7"));
    assert_eq!(*duration, Duration::from_secs(4));

    assert_eq!(form, TxForm::default());
    assert_eq!(
        h.refresh.requested(),
        vec![Pipeline::Dashboard, Pipeline::Mempool]
    );
}

#[tokio::test]
async fn accepted_without_mined_block_reports_not_available() {
    let h = harness();
    h.gateway.reply(
        "/api/tx",
        json!({"accepted": true, "txid": "0123456789abcdef", "mined_block": null}),
    );
    let mut form = filled_form();
    let outcome = h.submitter.submit_transaction(&mut form).await;
    assert!(matches!(outcome, SubmitOutcome::Accepted { block_index: None, .. }));
    assert!(matches!(
        &h.notifier.shown()[0],
        Shown::Transient(message, _) if message.contains("Block #N/A")
    ));
}

#[tokio::test]
async fn rejected_transaction_keeps_form_and_skips_refresh() {
    let h = harness();
    h.gateway.reply("/api/tx", json!({"accepted": false}));
    let mut form = filled_form();

    let outcome = h.submitter.submit_transaction(&mut form).await;
    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert_eq!(
        h.notifier.shown(),
        vec![Shown::Blocking(TX_REJECTED_NOTICE.to_owned())]
    );
    assert_eq!(form, filled_form());
    assert!(h.refresh.requested().is_empty());
}

#[tokio::test]
async fn unreachable_node_reports_failure_without_refresh() {
    let h = harness();
    h.gateway
        .fail("/api/tx", FetchError::network("connection refused"));
    let mut form = filled_form();

    let outcome = h.submitter.submit_transaction(&mut form).await;
    assert!(matches!(outcome, SubmitOutcome::Failed(FetchError::Network(_))));
    assert_eq!(
        h.notifier.shown(),
        vec![Shown::Blocking(TX_FAILED_NOTICE.to_owned())]
    );
    assert_eq!(form, filled_form());
    assert!(h.refresh.requested().is_empty());
}

#[tokio::test]
async fn blank_and_garbage_fields_are_coerced_before_posting() {
    let h = harness();
    h.gateway.reply("/api/tx", json!({"accepted": false}));
    let mut form = TxForm {
        sender: "alice".to_owned(),
        receiver: "bob".to_owned(),
        amount: "lots".to_owned(),
        nonce: String::new(),
    };
    h.submitter.submit_transaction(&mut form).await;
    assert_eq!(
        h.gateway.posts()[0].1,
        json!({"sender": "alice", "receiver": "bob", "amount": null, "nonce": 0})
    );
}

#[tokio::test]
async fn mine_success_shows_block_and_refreshes_dashboard() {
    let h = harness();
    h.gateway
        .reply("/api/mine", json!({"block": {"index": 12, "hash": "ab"}}));

    assert_eq!(h.submitter.mine().await, MineOutcome::Mined { index: 12 });
    assert_eq!(
        h.gateway.posts(),
        vec![("/api/mine".to_owned(), json!({"miner": "miner"}))]
    );
    assert_eq!(
        h.notifier.shown(),
        vec![Shown::Blocking("Mined Block #12".to_owned())]
    );
    assert_eq!(h.refresh.requested(), vec![Pipeline::Dashboard]);
}

#[tokio::test]
async fn mine_failure_is_reported() {
    let h = harness();
    h.gateway.fail("/api/mine", FetchError::network("timeout"));

    assert!(matches!(h.submitter.mine().await, MineOutcome::Failed(_)));
    assert_eq!(
        h.notifier.shown(),
        vec![Shown::Blocking(MINE_FAILED_NOTICE.to_owned())]
    );
    assert!(h.refresh.requested().is_empty());
}

#[tokio::test]
async fn attack_posts_requester_and_timestamp_without_refresh() {
    let h = harness();
    h.gateway.reply("/run_attack", json!({"status": "armed"}));
    let before = chrono::Utc::now().timestamp_millis();

    let outcome = h.submitter.trigger_attack().await;
    assert_eq!(outcome, AttackOutcome::Armed(json!({"status": "armed"})));

    let posts = h.gateway.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "/run_attack");
    assert_eq!(posts[0].1["requested_by"], "dashboard");
    let ts = posts[0].1["ts"].as_i64().unwrap();
    assert!(ts >= before);

    assert_eq!(
        h.notifier.shown(),
        vec![Shown::Blocking(ATTACK_ARMED_NOTICE.to_owned())]
    );
    assert!(h.refresh.requested().is_empty());
}

#[tokio::test]
async fn attack_failure_is_reported() {
    let h = harness();
    h.gateway
        .fail("/run_attack", FetchError::network("connection refused"));
    assert!(matches!(
        h.submitter.trigger_attack().await,
        AttackOutcome::Failed(_)
    ));
    assert_eq!(
        h.notifier.shown(),
        vec![Shown::Blocking(ATTACK_FAILED_NOTICE.to_owned())]
    );
}

#[tokio::test(start_paused = true)]
async fn concurrent_submissions_settle_independently() {
    let h = harness();
    h.gateway.enqueue(
        "/api/tx",
        Duration::from_millis(800),
        Ok(json!({"accepted": false})),
    );
    h.gateway.enqueue(
        "/api/tx",
        Duration::from_millis(100),
        Ok(json!({"accepted": true, "txid": "feedfacecafebeef"})),
    );

    let slow = h.submitter.clone();
    let fast = h.submitter.clone();
    let (first, second) = tokio::join!(
        async move { slow.submit_transaction(&mut filled_form()).await },
        async move { fast.submit_transaction(&mut filled_form()).await },
    );

    assert_eq!(first, SubmitOutcome::Rejected);
    assert!(matches!(second, SubmitOutcome::Accepted { .. }));
    assert_eq!(h.gateway.calls_to("/api/tx"), 2);

    // Notices appear in completion order.
    let shown = h.notifier.shown();
    assert!(matches!(&shown[0], Shown::Transient(..)));
    assert_eq!(shown[1], Shown::Blocking(TX_REJECTED_NOTICE.to_owned()));
}

#[tokio::test]
async fn acceptance_with_live_refresher_updates_dashboard_views() {
    let gateway = ScriptedGateway::new();
    gateway.reply("/api/chain", chain(4));
    gateway.reply("/api/balance/miner", json!({"balance": 200, "nonce": 0}));
    gateway.reply("/api/balance/alice", json!({"balance": 90, "nonce": 2}));
    gateway.reply("/api/mempool", json!([]));
    gateway.reply(
        "/api/tx",
        json!({"accepted": true, "txid": "abcdef1234567890", "mined_block": {"index": 4}}),
    );

    let sinks = PageSinks::for_page(Page::Dashboard);
    let runner = PipelineRunner::new(
        api(&gateway),
        Arc::new(sinks.clone()),
        "miner".to_owned(),
        vec!["alice".to_owned()],
    );
    let notifier = Arc::new(RecordingNotifier::default());
    let submitter = ActionSubmitter::new(
        api(&gateway),
        notifier,
        Arc::new(Refresher::new(runner)),
        "miner".to_owned(),
        "dashboard".to_owned(),
        Duration::from_secs(4),
    );

    submitter.submit_transaction(&mut filled_form()).await;
    for _ in 0..50 {
        if sinks.children(containers::CHAIN_SUMMARY).is_some_and(|c| !c.is_empty()) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(
        sinks.children(containers::CHAIN_SUMMARY).unwrap()[0].text(),
        "Chain Height: 3"
    );
    assert_eq!(
        sinks.children(containers::ACCOUNT_BALANCES).unwrap()[0].text(),
        "alice: 90 (nonce 2)"
    );
}
