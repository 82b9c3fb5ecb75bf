pub mod config {
    pub use chainwatch_sync::config::*;
}

pub mod constants {
    pub use chainwatch_protocol::constants::*;
}

pub mod error {
    pub use chainwatch_protocol::error::*;
}

pub mod types {
    pub use chainwatch_protocol::types::*;
}

pub mod node {
    pub use chainwatch_node_client::*;
}

pub mod views {
    pub use chainwatch_views::*;
}

pub mod sync {
    pub use chainwatch_sync::*;
}

#[path = "../../../ui/ui.rs"]
pub mod ui;

#[path = "../../../ui/ui_template.rs"]
pub mod ui_template;

#[path = "../../cli/cli.rs"]
pub mod cli;

/// Log to stderr so command output on stdout stays machine-readable.
/// Filtered by `RUST_LOG`, `info` when unset.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
