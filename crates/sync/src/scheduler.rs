//! Independent polling pipelines.
//!
//! Each pipeline owns a ticker that fires once immediately and then at a fixed
//! period. Every tick is spawned as its own task: a slow fetch never delays the
//! next tick, overlapping fetches of one pipeline run side by side, and renders
//! land in completion order. Nothing is cancelled except the tickers
//! themselves, when the [`PollHandle`] is stopped or dropped.

use crate::config::PollPeriods;
use chainwatch_node_client::NodeApi;
use chainwatch_protocol::error::FetchError;
use chainwatch_protocol::types::AccountBalance;
use chainwatch_views::render::{
    render_account_balances, render_chain_summary, render_chain_table, render_logs,
    render_mempool_table, render_miner_balance,
};
use chainwatch_views::{ViewSink, containers};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pipeline {
    Dashboard,
    Mempool,
    Explorer,
    Logs,
}

impl Pipeline {
    pub const ALL: [Pipeline; 4] = [
        Pipeline::Dashboard,
        Pipeline::Mempool,
        Pipeline::Explorer,
        Pipeline::Logs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Mempool => "mempool",
            Self::Explorer => "explorer",
            Self::Logs => "logs",
        }
    }

    pub fn containers(self) -> &'static [&'static str] {
        match self {
            Self::Dashboard => &[
                containers::CHAIN_SUMMARY,
                containers::MINER_BALANCE,
                containers::ACCOUNT_BALANCES,
            ],
            Self::Mempool => &[containers::MEMPOOL_TABLE],
            Self::Explorer => &[containers::BLOCK_TABLE, containers::MEMPOOL_TABLE],
            Self::Logs => &[containers::LOG_CONTAINER, containers::RECENT_ATTACKS],
        }
    }

    pub fn period(self, periods: &PollPeriods) -> Duration {
        match self {
            Self::Dashboard => periods.dashboard,
            Self::Mempool => periods.mempool,
            Self::Explorer => periods.explorer,
            Self::Logs => periods.logs,
        }
    }
}

/// Gateway call followed by render, for one sink.
#[derive(Clone)]
pub struct PipelineRunner {
    api: NodeApi,
    sink: Arc<dyn ViewSink>,
    miner: String,
    accounts: Arc<[String]>,
}

impl PipelineRunner {
    pub fn new(api: NodeApi, sink: Arc<dyn ViewSink>, miner: String, accounts: Vec<String>) -> Self {
        Self {
            api,
            sink,
            miner,
            accounts: accounts.into(),
        }
    }

    /// True when the page shows at least one of the pipeline's views.
    pub fn is_mounted(&self, pipeline: Pipeline) -> bool {
        pipeline
            .containers()
            .iter()
            .any(|name| self.sink.has_container(name))
    }

    /// One tick. Failures are logged and leave the views untouched.
    pub async fn tick(&self, pipeline: Pipeline) {
        if !self.is_mounted(pipeline) {
            return;
        }
        match self.refresh(pipeline).await {
            Ok(()) => debug!(pipeline = pipeline.as_str(), "views refreshed"),
            Err(err) => warn!(pipeline = pipeline.as_str(), %err, "poll failed; views unchanged"),
        }
    }

    pub async fn refresh(&self, pipeline: Pipeline) -> Result<(), FetchError> {
        match pipeline {
            Pipeline::Dashboard => self.refresh_dashboard().await,
            Pipeline::Mempool => {
                let mempool = self.api.mempool().await?;
                render_mempool_table(self.sink.as_ref(), &mempool);
                Ok(())
            }
            Pipeline::Explorer => {
                let (chain, mempool) = tokio::join!(self.api.chain(), self.api.mempool());
                let chain = chain.map(|c| render_chain_table(self.sink.as_ref(), &c));
                let mempool = mempool.map(|m| render_mempool_table(self.sink.as_ref(), &m));
                chain.and(mempool)
            }
            Pipeline::Logs => {
                let logs = self.api.logs().await?;
                render_logs(self.sink.as_ref(), &logs);
                Ok(())
            }
        }
    }

    // Each box renders only from its own complete set of fetches.
    async fn refresh_dashboard(&self) -> Result<(), FetchError> {
        let (chain, miner, accounts) = tokio::join!(
            self.api.chain(),
            self.api.balance(&self.miner),
            self.fetch_accounts()
        );
        let sink = self.sink.as_ref();
        let chain = chain.map(|c| render_chain_summary(sink, &c));
        let miner = miner.map(|view| {
            render_miner_balance(
                sink,
                &AccountBalance {
                    account: self.miner.clone(),
                    view,
                },
            )
        });
        let accounts = accounts.map(|balances| render_account_balances(sink, &balances));
        chain.and(miner).and(accounts)
    }

    /// One request per account, all in flight together; results keep the
    /// configured account order.
    async fn fetch_accounts(&self) -> Result<Vec<AccountBalance>, FetchError> {
        let mut set = JoinSet::new();
        for (idx, account) in self.accounts.iter().enumerate() {
            let api = self.api.clone();
            let account = account.clone();
            set.spawn(async move {
                let view = api.balance(&account).await;
                (idx, account, view)
            });
        }
        let mut slots: Vec<Option<AccountBalance>> = vec![None; self.accounts.len()];
        let mut first_err = None;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, account, Ok(view))) => slots[idx] = Some(AccountBalance { account, view }),
                Ok((_, _, Err(err))) => {
                    first_err.get_or_insert(err);
                }
                Err(err) => {
                    first_err.get_or_insert(FetchError::network(format!("balance task: {err}")));
                }
            }
        }
        if let Some(err) = first_err {
            return Err(err);
        }
        Ok(slots.into_iter().flatten().collect())
    }
}

/// Out-of-band refresh requests from user actions.
pub trait RefreshTrigger: Send + Sync {
    fn refresh_now(&self, pipeline: Pipeline);
}

/// Refresh trigger for contexts with no views to update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRefresh;

impl RefreshTrigger for NoRefresh {
    fn refresh_now(&self, _pipeline: Pipeline) {}
}

/// Spawns a one-off tick outside the schedule. Never waits for or cancels
/// ticks already in flight.
#[derive(Clone)]
pub struct Refresher {
    runner: PipelineRunner,
}

impl Refresher {
    pub fn new(runner: PipelineRunner) -> Self {
        Self { runner }
    }
}

impl RefreshTrigger for Refresher {
    fn refresh_now(&self, pipeline: Pipeline) {
        let runner = self.runner.clone();
        tokio::spawn(async move { runner.tick(pipeline).await });
    }
}

pub struct Poller {
    runner: PipelineRunner,
    periods: PollPeriods,
}

impl Poller {
    pub fn new(runner: PipelineRunner, periods: PollPeriods) -> Self {
        Self { runner, periods }
    }

    /// Starts every pipeline. Must be called inside a tokio runtime.
    pub fn start(self) -> PollHandle {
        let tickers = Pipeline::ALL
            .iter()
            .map(|pipeline| {
                spawn_ticker(
                    self.runner.clone(),
                    *pipeline,
                    pipeline.period(&self.periods),
                )
            })
            .collect();
        PollHandle {
            refresher: Refresher::new(self.runner),
            tickers,
        }
    }
}

fn spawn_ticker(runner: PipelineRunner, pipeline: Pipeline, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let runner = runner.clone();
            tokio::spawn(async move { runner.tick(pipeline).await });
        }
    })
}

/// Stop handle for a running poller. Dropping it stops the tickers.
pub struct PollHandle {
    refresher: Refresher,
    tickers: Vec<JoinHandle<()>>,
}

impl PollHandle {
    pub fn refresher(&self) -> Refresher {
        self.refresher.clone()
    }

    pub fn refresh_now(&self, pipeline: Pipeline) {
        self.refresher.refresh_now(pipeline);
    }

    pub fn is_running(&self) -> bool {
        self.tickers.iter().any(|t| !t.is_finished())
    }

    /// Stops future ticks. Fetches already in flight still complete and render.
    pub fn stop(&mut self) {
        for ticker in self.tickers.drain(..) {
            ticker.abort();
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
