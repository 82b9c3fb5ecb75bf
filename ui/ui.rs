use crate::config::ConsoleConfig;
use crate::node::NodeApi;
use crate::sync::{
    ActionSubmitter, AttackOutcome, MineOutcome, NoticeBoard, PipelineRunner, PollHandle, Poller,
    SubmitOutcome, TxForm,
};
use crate::ui_template::{ATTACK_CONTROLS_HTML, MINE_CONTROLS_HTML, PAGE_HTML, TX_FORM_HTML};
use crate::views::display::escape_html;
use crate::views::{Page, PageSinks, ViewNode, containers};
use anyhow::{Context, Result, anyhow};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Shared console state. Every page's containers live in one sink, so each
/// pipeline runs once no matter how many pages a browser has open.
#[derive(Clone)]
pub struct UiServerState {
    node_base: String,
    sinks: PageSinks,
    notices: NoticeBoard,
    submitter: ActionSubmitter,
    form: Arc<Mutex<TxForm>>,
    poll: Arc<PollHandle>,
}

impl UiServerState {
    /// Mounts all pages and starts polling. Must be called inside a tokio runtime.
    pub fn start(cfg: &ConsoleConfig, api: NodeApi) -> Self {
        let names: BTreeSet<&str> = Page::ALL
            .iter()
            .flat_map(|page| page.containers().iter().copied())
            .collect();
        let sinks = PageSinks::with_containers(names);
        let runner = PipelineRunner::new(
            api.clone(),
            Arc::new(sinks.clone()),
            cfg.miner.clone(),
            cfg.accounts.clone(),
        );
        let poll = Poller::new(runner, cfg.periods).start();
        let notices = NoticeBoard::new();
        let submitter = ActionSubmitter::new(
            api,
            Arc::new(notices.clone()),
            Arc::new(poll.refresher()),
            cfg.miner.clone(),
            cfg.attack_requester.clone(),
            cfg.transient_notice,
        );
        Self {
            node_base: cfg.node_base.clone(),
            sinks,
            notices,
            submitter,
            form: Arc::new(Mutex::new(TxForm::default())),
            poll: Arc::new(poll),
        }
    }

    pub fn sinks(&self) -> &PageSinks {
        &self.sinks
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    fn kept_form(&self) -> TxForm {
        self.form
            .lock()
            .map(|form| form.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug)]
struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "ok": false,
                "error": self.0.to_string()
            })),
        )
            .into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(value: E) -> Self {
        Self(value.into())
    }
}

pub fn run(cfg: ConsoleConfig, listen: String) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime for UI")?;

    runtime.block_on(async move {
        let state = UiServerState::start(&cfg, NodeApi::http(cfg.node_base.clone()));
        let app = build_app(state);
        let listener = tokio::net::TcpListener::bind(&listen)
            .await
            .with_context(|| format!("bind UI on {}", listen))?;
        info!(%listen, node = %cfg.node_base, "console started");
        println!("chainwatch-ui listening on http://{}", listen);
        axum::serve(listener, app).await.context("serve UI")
    })
}

pub fn build_app(state: UiServerState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/:page", get(page_html))
        .route("/api/views/:page", get(page_views))
        .route("/api/notices", get(notices_list))
        .route("/api/status", get(status))
        .route("/notices/dismiss", post(notices_dismiss))
        .route("/actions/tx", post(action_tx))
        .route("/actions/mine", post(action_mine))
        .route("/actions/attack", post(action_attack))
        .with_state(state)
}

fn parse_page(raw: &str) -> Result<Page> {
    Page::parse(raw).ok_or_else(|| anyhow!("unknown page: {raw}"))
}

fn page_title(page: Page) -> &'static str {
    match page {
        Page::Dashboard => "Dashboard",
        Page::Explorer => "Explorer",
        Page::Logs => "Logs",
        Page::Transaction => "Transaction",
    }
}

fn page_href(page: Page) -> String {
    match page {
        Page::Dashboard => "/".to_owned(),
        other => format!("/{}", other.as_str()),
    }
}

fn children_html(children: &[ViewNode]) -> String {
    children.iter().map(ViewNode::to_html).collect()
}

fn container_card(name: &str, children: &[ViewNode]) -> String {
    let title = escape_html(containers::title(name));
    let inner = children_html(children);
    let columns = containers::columns(name);
    if columns.is_empty() {
        let class = if name == containers::LOG_CONTAINER || name == containers::RECENT_ATTACKS {
            "box log"
        } else {
            "box"
        };
        return format!(
            r#"      <div class="card"><h2>{title}</h2><div id="{name}" class="{class}">{inner}</div></div>"#
        );
    }
    let head = columns
        .iter()
        .map(|c| format!("<th>{}</th>", escape_html(c)))
        .collect::<String>();
    format!(
        r#"      <div class="card wide"><h2>{title}</h2><table><thead><tr>{head}</tr></thead><tbody id="{name}">{inner}</tbody></table></div>"#
    )
}

fn tx_form_html(form: &TxForm) -> String {
    TX_FORM_HTML
        .replace("{{sender}}", &escape_html(&form.sender))
        .replace("{{receiver}}", &escape_html(&form.receiver))
        .replace("{{amount}}", &escape_html(&form.amount))
        .replace("{{nonce}}", &escape_html(&form.nonce))
}

fn render_page(state: &UiServerState, page: Page) -> String {
    let nav = Page::ALL
        .iter()
        .map(|p| {
            let class = if *p == page { r#" class="active""# } else { "" };
            format!(r#"<a href="{}"{class}>{}</a>"#, page_href(*p), page_title(*p))
        })
        .collect::<String>();

    let mut body = match page {
        Page::Dashboard => MINE_CONTROLS_HTML.to_owned(),
        Page::Logs => ATTACK_CONTROLS_HTML.to_owned(),
        Page::Transaction => tx_form_html(&state.kept_form()),
        Page::Explorer => String::new(),
    };
    for name in page.containers() {
        body.push('\n');
        body.push_str(&container_card(
            name,
            &state.sinks.children(name).unwrap_or_default(),
        ));
    }

    // Body last: view text must not be scanned for placeholders.
    PAGE_HTML
        .replace("{{title}}", page_title(page))
        .replace("{{page}}", page.as_str())
        .replace("{{nav}}", &nav)
        .replace("{{body}}", &body)
}

async fn index(State(state): State<UiServerState>) -> Html<String> {
    Html(render_page(&state, Page::Dashboard))
}

async fn page_html(
    State(state): State<UiServerState>,
    Path(page): Path<String>,
) -> Result<Html<String>, ApiError> {
    let page = parse_page(&page)?;
    Ok(Html(render_page(&state, page)))
}

async fn page_views(
    State(state): State<UiServerState>,
    Path(page): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let page = parse_page(&page)?;
    let mut views = Map::new();
    let mut html = Map::new();
    for name in page.containers() {
        let children = state.sinks.children(name).unwrap_or_default();
        html.insert((*name).to_owned(), Value::String(children_html(&children)));
        views.insert((*name).to_owned(), serde_json::to_value(&children)?);
    }
    Ok(Json(json!({
        "ok": true,
        "page": page.as_str(),
        "revision": state.sinks.revision(),
        "containers": views,
        "html": html
    })))
}

async fn notices_list(State(state): State<UiServerState>) -> Json<Value> {
    Json(json!({"ok": true, "notices": state.notices.active()}))
}

async fn notices_dismiss(State(state): State<UiServerState>) -> Json<Value> {
    let dismissed = state.notices.dismiss_blocking();
    Json(json!({"ok": true, "dismissed": dismissed}))
}

async fn status(State(state): State<UiServerState>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "node": state.node_base,
        "polling": state.poll.is_running(),
        "revision": state.sinks.revision()
    }))
}

async fn action_tx(
    State(state): State<UiServerState>,
    Json(mut form): Json<TxForm>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state.submitter.submit_transaction(&mut form).await;
    if let Ok(mut kept) = state.form.lock() {
        *kept = form;
    }
    match outcome {
        SubmitOutcome::Accepted { txid, block_index } => Ok(Json(json!({
            "ok": true,
            "outcome": "accepted",
            "txid": txid,
            "block": block_index
        }))),
        SubmitOutcome::Rejected => Ok(Json(json!({"ok": true, "outcome": "rejected"}))),
        SubmitOutcome::Failed(err) => Err(anyhow!("submit transaction: {err}").into()),
    }
}

async fn action_mine(State(state): State<UiServerState>) -> Result<Json<Value>, ApiError> {
    match state.submitter.mine().await {
        MineOutcome::Mined { index } => Ok(Json(json!({"ok": true, "block": index}))),
        MineOutcome::Failed(err) => Err(anyhow!("mine block: {err}").into()),
    }
}

async fn action_attack(State(state): State<UiServerState>) -> Result<Json<Value>, ApiError> {
    match state.submitter.trigger_attack().await {
        AttackOutcome::Armed(reply) => Ok(Json(json!({"ok": true, "reply": reply}))),
        AttackOutcome::Failed(err) => Err(anyhow!("trigger attack: {err}").into()),
    }
}
