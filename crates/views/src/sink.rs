use crate::classifier::Category;
use crate::display::escape_html;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

pub mod containers {
    pub const CHAIN_SUMMARY: &str = "chainSummary";
    pub const MINER_BALANCE: &str = "minerBalance";
    pub const ACCOUNT_BALANCES: &str = "accountBalances";
    pub const MEMPOOL_TABLE: &str = "mempoolTable";
    pub const BLOCK_TABLE: &str = "blockTable";
    pub const LOG_CONTAINER: &str = "logContainer";
    pub const RECENT_ATTACKS: &str = "recentAttacks";

    pub fn title(name: &str) -> &'static str {
        match name {
            CHAIN_SUMMARY => "Chain",
            MINER_BALANCE => "Miner",
            ACCOUNT_BALANCES => "Accounts",
            MEMPOOL_TABLE => "Mempool",
            BLOCK_TABLE => "Blocks",
            LOG_CONTAINER => "Node Log",
            RECENT_ATTACKS => "Recent Attacks",
            _ => "",
        }
    }

    /// Header cells for tabular containers; empty for the rest.
    pub fn columns(name: &str) -> &'static [&'static str] {
        match name {
            BLOCK_TABLE => &["Index", "Hash", "Prev Hash", "Txs", "Time (UTC)"],
            MEMPOOL_TABLE => &["TXID", "From", "To", "Amount"],
            _ => &[],
        }
    }
}

/// One display element inside a named container.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewNode {
    Row { cells: Vec<String> },
    Placeholder { text: String, colspan: usize },
    Line { category: Category, text: String },
    Field { label: String, value: String },
}

impl ViewNode {
    pub fn text(&self) -> String {
        match self {
            Self::Row { cells } => cells.join(" | "),
            Self::Placeholder { text, .. } | Self::Line { text, .. } => text.clone(),
            Self::Field { label, value } => format!("{label}: {value}"),
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Self::Row { cells } => {
                let cells = cells
                    .iter()
                    .map(|c| format!("<td>{}</td>", escape_html(c)))
                    .collect::<String>();
                format!("<tr>{cells}</tr>")
            }
            Self::Placeholder { text, colspan } => format!(
                r#"<tr><td colspan="{colspan}" class="placeholder">{}</td></tr>"#,
                escape_html(text)
            ),
            Self::Line { category, text } => format!(
                r#"<div class="{}">{}</div>"#,
                category.css_class(),
                escape_html(text)
            ),
            Self::Field { label, value } => format!(
                "<div><b>{}:</b> {}</div>",
                escape_html(label),
                escape_html(value)
            ),
        }
    }
}

/// Display surface the renderers write into. Containers are owned by the page;
/// the console only fills the ones that exist.
pub trait ViewSink: Send + Sync {
    fn has_container(&self, name: &str) -> bool;

    /// Replaces every child of `name`. Absent containers are ignored.
    fn replace_children(&self, name: &str, children: Vec<ViewNode>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Dashboard,
    Explorer,
    Logs,
    Transaction,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::Dashboard,
        Page::Explorer,
        Page::Logs,
        Page::Transaction,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dashboard" => Some(Self::Dashboard),
            "explorer" => Some(Self::Explorer),
            "logs" | "log" => Some(Self::Logs),
            "transaction" | "tx" => Some(Self::Transaction),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Explorer => "explorer",
            Self::Logs => "logs",
            Self::Transaction => "transaction",
        }
    }

    pub fn containers(self) -> &'static [&'static str] {
        use containers::*;
        match self {
            Self::Dashboard => &[CHAIN_SUMMARY, MINER_BALANCE, ACCOUNT_BALANCES, MEMPOOL_TABLE],
            Self::Explorer => &[BLOCK_TABLE, MEMPOOL_TABLE],
            Self::Logs => &[LOG_CONTAINER, RECENT_ATTACKS],
            Self::Transaction => &[MEMPOOL_TABLE],
        }
    }
}

/// In-memory page: a fixed set of named containers and their current children.
#[derive(Debug, Clone, Default)]
pub struct PageSinks {
    containers: Arc<RwLock<BTreeMap<String, Vec<ViewNode>>>>,
    revision: Arc<AtomicU64>,
}

impl PageSinks {
    pub fn with_containers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let containers = names
            .into_iter()
            .map(|name| (name.into(), Vec::new()))
            .collect::<BTreeMap<_, _>>();
        Self {
            containers: Arc::new(RwLock::new(containers)),
            revision: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn for_page(page: Page) -> Self {
        Self::with_containers(page.containers().iter().copied())
    }

    pub fn children(&self, name: &str) -> Option<Vec<ViewNode>> {
        self.containers
            .read()
            .ok()
            .and_then(|map| map.get(name).cloned())
    }

    pub fn snapshot(&self) -> BTreeMap<String, Vec<ViewNode>> {
        self.containers
            .read()
            .map(|map| map.clone())
            .unwrap_or_default()
    }

    /// Bumped on every applied replacement.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }
}

impl ViewSink for PageSinks {
    fn has_container(&self, name: &str) -> bool {
        self.containers
            .read()
            .map(|map| map.contains_key(name))
            .unwrap_or(false)
    }

    fn replace_children(&self, name: &str, children: Vec<ViewNode>) {
        let Ok(mut map) = self.containers.write() else {
            return;
        };
        if let Some(slot) = map.get_mut(name) {
            *slot = children;
            self.revision.fetch_add(1, Ordering::AcqRel);
        }
    }
}
