//! Analysis composition and execution.

mod runner;

pub use runner::{example_config, Analysis, AnalysisConfig, AnalysisOutput, ReportKind};
