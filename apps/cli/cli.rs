use crate::config::{ConsoleConfig, period_from_ms, split_csv};
use crate::node::NodeApi;
use crate::sync::{
    ActionSubmitter, AttackOutcome, MineOutcome, NoRefresh, Notifier, PipelineRunner, Poller,
    SubmitOutcome, TxForm,
};
use crate::types::AccountBalance;
use crate::views::render::{
    render_account_balances, render_chain_table, render_logs, render_mempool_table,
};
use crate::views::{Page, PageSinks, ViewNode, containers};
use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use std::fs;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const DEFAULT_UI_LISTEN: &str = "127.0.0.1:7788";
const WATCH_REDRAW_MS: u64 = 250;

#[derive(Parser, Debug)]
#[command(name = "chainwatch")]
#[command(about = "Monitoring and control console for a ledger node")]
pub struct Cli {
    #[command(subcommand)]
    command: RootCommand,

    /// Node API base URL. Overrides CHAINWATCH_NODE_BASE.
    #[arg(long, global = true)]
    node: Option<String>,

    /// Account credited by mining. Overrides CHAINWATCH_MINER.
    #[arg(long, global = true)]
    miner: Option<String>,

    /// Comma-separated accounts shown on the dashboard. Overrides CHAINWATCH_ACCOUNTS.
    #[arg(long, global = true)]
    accounts: Option<String>,
}

#[derive(Subcommand, Debug)]
enum RootCommand {
    Chain,
    Mempool,
    Balance(BalanceCommand),
    Logs(LogsCommand),
    Tx(TxCommand),
    Mine,
    Attack,
    Peers,
    Params(ParamsCommand),
    Watch(WatchCommand),
    Ui(UiCommand),
}

#[derive(Args, Debug)]
struct BalanceCommand {
    /// Single account; miner plus configured accounts when omitted.
    account: Option<String>,
}

#[derive(Args, Debug)]
struct LogsCommand {
    /// Only successful attack lines.
    #[arg(long)]
    attacks: bool,
}

#[derive(Args, Debug)]
struct TxCommand {
    #[arg(long)]
    sender: String,
    #[arg(long)]
    receiver: String,
    #[arg(long, default_value = "")]
    amount: String,
    #[arg(long, default_value = "")]
    nonce: String,
}

#[derive(Args, Debug)]
struct ParamsCommand {
    #[command(subcommand)]
    action: ParamsAction,
}

#[derive(Subcommand, Debug)]
enum ParamsAction {
    Get,
    Set {
        /// KEY=VALUE pairs; VALUE is read as JSON and falls back to a string.
        pairs: Vec<String>,
        /// JSON object file merged before the pairs.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct WatchCommand {
    #[arg(long, default_value = "dashboard")]
    page: String,
    /// Stop after this many milliseconds instead of running until killed.
    #[arg(long = "for-ms")]
    for_ms: Option<u64>,
    /// Override every pipeline period, in milliseconds.
    #[arg(long = "period-ms")]
    period_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct UiCommand {
    #[arg(long, default_value = DEFAULT_UI_LISTEN)]
    listen: String,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = resolve_config(&cli);
    let api = NodeApi::http(cfg.node_base.clone());

    match cli.command {
        RootCommand::Chain => block_on(handle_chain(api)),
        RootCommand::Mempool => block_on(handle_mempool(api)),
        RootCommand::Balance(cmd) => block_on(handle_balance(api, &cfg, cmd)),
        RootCommand::Logs(cmd) => block_on(handle_logs(api, cmd)),
        RootCommand::Tx(cmd) => block_on(handle_tx(api, &cfg, cmd)),
        RootCommand::Mine => block_on(handle_mine(api, &cfg)),
        RootCommand::Attack => block_on(handle_attack(api, &cfg)),
        RootCommand::Peers => block_on(handle_peers(api)),
        RootCommand::Params(cmd) => block_on(handle_params(api, cmd)),
        RootCommand::Watch(cmd) => block_on(handle_watch(api, cfg, cmd)),
        RootCommand::Ui(cmd) => crate::ui::run(cfg, cmd.listen),
    }
}

/// Flags win over `CHAINWATCH_*` variables, which win over defaults.
fn resolve_config(cli: &Cli) -> ConsoleConfig {
    let mut cfg = ConsoleConfig::from_env();
    if let Some(node) = &cli.node {
        cfg.node_base = node.clone();
    }
    if let Some(miner) = &cli.miner {
        cfg.miner = miner.clone();
    }
    if let Some(raw) = &cli.accounts {
        let accounts = split_csv(raw);
        if !accounts.is_empty() {
            cfg.accounts = accounts;
        }
    }
    cfg
}

fn block_on<F>(fut: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime for CLI")?;
    runtime.block_on(fut)
}

/// Prints each notice as soon as it is raised.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_transient(&self, message: &str, _duration: Duration) {
        println!("{message}");
    }

    fn show_blocking(&self, message: &str) {
        println!("{message}");
    }
}

fn submitter(api: NodeApi, cfg: &ConsoleConfig) -> ActionSubmitter {
    ActionSubmitter::new(
        api,
        Arc::new(ConsoleNotifier),
        Arc::new(NoRefresh),
        cfg.miner.clone(),
        cfg.attack_requester.clone(),
        cfg.transient_notice,
    )
}

fn print_container(sinks: &PageSinks, name: &str) {
    let columns = containers::columns(name);
    if !columns.is_empty() {
        println!("{}", columns.join(" | "));
    }
    for node in sinks.children(name).unwrap_or_default() {
        match &node {
            ViewNode::Line { category, text } => println!("{:<14} {text}", category.css_class()),
            other => println!("{}", other.text()),
        }
    }
}

fn print_page(page: Page, sinks: &PageSinks) {
    for name in page.containers() {
        println!("== {} ==", containers::title(name));
        print_container(sinks, name);
    }
    println!();
}

async fn handle_chain(api: NodeApi) -> Result<()> {
    let chain = api.chain().await.context("fetch chain")?;
    let sinks = PageSinks::with_containers([containers::BLOCK_TABLE]);
    render_chain_table(&sinks, &chain);
    print_container(&sinks, containers::BLOCK_TABLE);
    Ok(())
}

async fn handle_mempool(api: NodeApi) -> Result<()> {
    let mempool = api.mempool().await.context("fetch mempool")?;
    let sinks = PageSinks::with_containers([containers::MEMPOOL_TABLE]);
    render_mempool_table(&sinks, &mempool);
    print_container(&sinks, containers::MEMPOOL_TABLE);
    Ok(())
}

async fn handle_balance(api: NodeApi, cfg: &ConsoleConfig, cmd: BalanceCommand) -> Result<()> {
    let accounts = match cmd.account {
        Some(account) => vec![account],
        None => std::iter::once(cfg.miner.clone())
            .chain(cfg.accounts.iter().cloned())
            .collect(),
    };
    let mut balances = Vec::with_capacity(accounts.len());
    for account in accounts {
        let view = api
            .balance(&account)
            .await
            .with_context(|| format!("fetch balance of {account}"))?;
        balances.push(AccountBalance { account, view });
    }
    let sinks = PageSinks::with_containers([containers::ACCOUNT_BALANCES]);
    render_account_balances(&sinks, &balances);
    print_container(&sinks, containers::ACCOUNT_BALANCES);
    Ok(())
}

async fn handle_logs(api: NodeApi, cmd: LogsCommand) -> Result<()> {
    let logs = api.logs().await.context("fetch logs")?;
    let sinks = PageSinks::for_page(Page::Logs);
    render_logs(&sinks, &logs);
    let container = if cmd.attacks {
        containers::RECENT_ATTACKS
    } else {
        containers::LOG_CONTAINER
    };
    print_container(&sinks, container);
    Ok(())
}

async fn handle_tx(api: NodeApi, cfg: &ConsoleConfig, cmd: TxCommand) -> Result<()> {
    let mut form = TxForm {
        sender: cmd.sender,
        receiver: cmd.receiver,
        amount: cmd.amount,
        nonce: cmd.nonce,
    };
    match submitter(api, cfg).submit_transaction(&mut form).await {
        SubmitOutcome::Accepted { .. } => Ok(()),
        SubmitOutcome::Rejected => bail!("transaction rejected by node"),
        SubmitOutcome::Failed(err) => Err(anyhow!(err)).context("submit transaction"),
    }
}

async fn handle_mine(api: NodeApi, cfg: &ConsoleConfig) -> Result<()> {
    match submitter(api, cfg).mine().await {
        MineOutcome::Mined { .. } => Ok(()),
        MineOutcome::Failed(err) => Err(anyhow!(err)).context("mine block"),
    }
}

async fn handle_attack(api: NodeApi, cfg: &ConsoleConfig) -> Result<()> {
    match submitter(api, cfg).trigger_attack().await {
        AttackOutcome::Armed(reply) => {
            println!("{}", serde_json::to_string(&reply)?);
            Ok(())
        }
        AttackOutcome::Failed(err) => Err(anyhow!(err)).context("trigger attack"),
    }
}

async fn handle_peers(api: NodeApi) -> Result<()> {
    let peers = api.peers().await.context("fetch peers")?;
    for peer in peers.peers {
        println!("{peer}");
    }
    Ok(())
}

async fn handle_params(api: NodeApi, cmd: ParamsCommand) -> Result<()> {
    match cmd.action {
        ParamsAction::Get => {
            let params = api.params().await.context("fetch params")?;
            println!("{}", serde_json::to_string_pretty(&params.params)?);
        }
        ParamsAction::Set { pairs, file } => {
            let mut params = match file {
                Some(path) => read_params_file(&path)?,
                None => Map::new(),
            };
            for pair in &pairs {
                let (key, value) = parse_param(pair)?;
                params.insert(key, value);
            }
            if params.is_empty() {
                bail!("params set requires KEY=VALUE pairs or --file");
            }
            let reply = api.set_params(params).await.context("set params")?;
            if !reply.is_applied() {
                bail!("node did not apply params: status {:?}", reply.status);
            }
            println!("{}", serde_json::to_string_pretty(&reply.params)?);
        }
    }
    Ok(())
}

fn read_params_file(path: &std::path::Path) -> Result<Map<String, Value>> {
    let raw = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("parse params object from {}", path.display()))
}

fn parse_param(pair: &str) -> Result<(String, Value)> {
    let (key, raw) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got {pair:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("empty parameter name in {pair:?}");
    }
    let value =
        serde_json::from_str(raw.trim()).unwrap_or_else(|_| Value::String(raw.trim().to_owned()));
    Ok((key.to_owned(), value))
}

/// Mounts one page's pipelines and redraws whenever a view changes.
async fn handle_watch(api: NodeApi, mut cfg: ConsoleConfig, cmd: WatchCommand) -> Result<()> {
    let page = Page::parse(&cmd.page).ok_or_else(|| anyhow!("unknown page: {}", cmd.page))?;
    if let Some(ms) = cmd.period_ms {
        let period = period_from_ms(ms);
        cfg.periods.dashboard = period;
        cfg.periods.mempool = period;
        cfg.periods.explorer = period;
        cfg.periods.logs = period;
    }
    let sinks = PageSinks::for_page(page);
    let runner = PipelineRunner::new(api, Arc::new(sinks.clone()), cfg.miner, cfg.accounts);
    let mut handle = Poller::new(runner, cfg.periods).start();
    tracing::info!(page = page.as_str(), node = %cfg.node_base, "watching");

    let deadline = cmd
        .for_ms
        .map(|ms| Instant::now() + Duration::from_millis(ms));
    let mut drawn = 0;
    loop {
        let revision = sinks.revision();
        if revision != drawn {
            drawn = revision;
            print_page(page, &sinks);
        }
        if deadline.is_some_and(|at| Instant::now() >= at) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(WATCH_REDRAW_MS)).await;
    }
    handle.stop();
    Ok(())
}
