pub mod config;
pub mod notifier;
pub mod scheduler;
pub mod submitter;

pub use config::{ConsoleConfig, PollPeriods};
pub use notifier::{Notice, NoticeBoard, NoticeKind, Notifier};
pub use scheduler::{NoRefresh, Pipeline, PipelineRunner, PollHandle, Poller, RefreshTrigger, Refresher};
pub use submitter::{
    ActionSubmitter, AttackOutcome, MineOutcome, SubmitOutcome, SubmitState, TxForm,
};
