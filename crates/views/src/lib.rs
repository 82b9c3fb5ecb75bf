pub mod classifier;
pub mod display;
pub mod render;
pub mod sink;

pub use classifier::{Category, classify};
pub use sink::{Page, PageSinks, ViewNode, ViewSink, containers};
