pub const DEFAULT_NODE_BASE: &str = "http://127.0.0.1:5001";

pub const DASHBOARD_PERIOD_MS: u64 = 3_000;
pub const MEMPOOL_PERIOD_MS: u64 = 3_000;
pub const EXPLORER_PERIOD_MS: u64 = 5_000;
pub const LOGS_PERIOD_MS: u64 = 5_000;

pub const TRANSIENT_NOTICE_MS: u64 = 4_000;

pub const BLOCK_HASH_DISPLAY_LEN: usize = 15;
pub const TXID_DISPLAY_LEN: usize = 10;
pub const SUMMARY_HASH_DISPLAY_LEN: usize = 10;
pub const ELLIPSIS: &str = "...";

pub const MARKER_ATTACK: &str = "[ATTACK]";
pub const MARKER_ATTACK_ARMED: &str = "[ATTACK-ARMED]";
pub const MARKER_REJECTED: &str = "rejected";

pub const DEFAULT_MINER: &str = "miner";
pub const DEFAULT_ACCOUNTS: &[&str] = &["alice", "bob"];
pub const DEFAULT_ATTACK_REQUESTER: &str = "dashboard";

pub const PATH_LOGS: &str = "/logs";
pub const PATH_CHAIN: &str = "/api/chain";
pub const PATH_MEMPOOL: &str = "/api/mempool";
pub const PATH_BALANCE_PREFIX: &str = "/api/balance/";
pub const PATH_MINE: &str = "/api/mine";
pub const PATH_TX: &str = "/api/tx";
pub const PATH_RUN_ATTACK: &str = "/run_attack";
pub const PATH_PEERS: &str = "/peers";
pub const PATH_GET_PARAMS: &str = "/get_params";
pub const PATH_SET_PARAMS: &str = "/set_params";

pub fn balance_path(account: &str) -> String {
    format!("{PATH_BALANCE_PREFIX}{account}")
}
