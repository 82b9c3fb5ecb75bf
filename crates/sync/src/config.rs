use chainwatch_protocol::constants::{
    DASHBOARD_PERIOD_MS, DEFAULT_ACCOUNTS, DEFAULT_ATTACK_REQUESTER, DEFAULT_MINER,
    DEFAULT_NODE_BASE, EXPLORER_PERIOD_MS, LOGS_PERIOD_MS, MEMPOOL_PERIOD_MS, TRANSIENT_NOTICE_MS,
};
use std::env;
use std::time::Duration;

const ENV_NODE_BASE: &str = "CHAINWATCH_NODE_BASE";
const ENV_ACCOUNTS: &str = "CHAINWATCH_ACCOUNTS";
const ENV_MINER: &str = "CHAINWATCH_MINER";
const ENV_DASHBOARD_MS: &str = "CHAINWATCH_DASHBOARD_MS";
const ENV_MEMPOOL_MS: &str = "CHAINWATCH_MEMPOOL_MS";
const ENV_EXPLORER_MS: &str = "CHAINWATCH_EXPLORER_MS";
const ENV_LOGS_MS: &str = "CHAINWATCH_LOGS_MS";

// Guards against a zero period spinning the ticker.
const MIN_PERIOD_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPeriods {
    pub dashboard: Duration,
    pub mempool: Duration,
    pub explorer: Duration,
    pub logs: Duration,
}

impl Default for PollPeriods {
    fn default() -> Self {
        Self {
            dashboard: Duration::from_millis(DASHBOARD_PERIOD_MS),
            mempool: Duration::from_millis(MEMPOOL_PERIOD_MS),
            explorer: Duration::from_millis(EXPLORER_PERIOD_MS),
            logs: Duration::from_millis(LOGS_PERIOD_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub node_base: String,
    pub miner: String,
    pub accounts: Vec<String>,
    pub attack_requester: String,
    pub periods: PollPeriods,
    pub transient_notice: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            node_base: DEFAULT_NODE_BASE.to_owned(),
            miner: DEFAULT_MINER.to_owned(),
            accounts: DEFAULT_ACCOUNTS.iter().map(|a| (*a).to_owned()).collect(),
            attack_requester: DEFAULT_ATTACK_REQUESTER.to_owned(),
            periods: PollPeriods::default(),
            transient_notice: Duration::from_millis(TRANSIENT_NOTICE_MS),
        }
    }
}

impl ConsoleConfig {
    /// Defaults overlaid with `CHAINWATCH_*` environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(base) = env_string(ENV_NODE_BASE) {
            cfg.node_base = base;
        }
        if let Some(miner) = env_string(ENV_MINER) {
            cfg.miner = miner;
        }
        if let Some(raw) = env_string(ENV_ACCOUNTS) {
            let accounts = split_csv(&raw);
            if !accounts.is_empty() {
                cfg.accounts = accounts;
            }
        }
        let periods = &mut cfg.periods;
        override_period(&mut periods.dashboard, ENV_DASHBOARD_MS);
        override_period(&mut periods.mempool, ENV_MEMPOOL_MS);
        override_period(&mut periods.explorer, ENV_EXPLORER_MS);
        override_period(&mut periods.logs, ENV_LOGS_MS);
        cfg
    }
}

pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

pub fn period_from_ms(ms: u64) -> Duration {
    Duration::from_millis(ms.max(MIN_PERIOD_MS))
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn override_period(slot: &mut Duration, key: &str) {
    if let Some(ms) = env_string(key).and_then(|v| v.parse::<u64>().ok()) {
        *slot = period_from_ms(ms);
    }
}
