pub mod chunker;
pub mod container;
pub mod pipeline;
pub mod scanner;

pub use pipeline::{Config, Outcome, PipelineError, SkipReason};
pub use scanner::{scan_tree, Mode, ScanReport};
