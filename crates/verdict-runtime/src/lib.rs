//! # verdict-runtime
//!
//! Harness runtime for the verdict benchmark: the generation client,
//! prompt construction, the sequential run loop and result reporting.
//!
//! The runtime never judges anything itself; all pass/fail decisions
//! live in `verdict-core`. Its one blocking operation is the generation
//! call to the local inference endpoint; that call carries a timeout and
//! encodes every failure into the returned text, so no task can take the
//! run down.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use verdict_runtime::{Harness, OllamaClient, GenerateOptions, Reporter};
//!
//! let client = Arc::new(OllamaClient::new());
//! let harness = Harness::new(client, GenerateOptions::default(), run_id);
//! let mut reporter = Reporter::new("results", run_id, true)?;
//! harness.run(&tasks, &models, &mut reporter).await?;
//! let paths = reporter.finish()?;
//! ```

pub mod harness;
pub mod prompts;
pub mod providers;
pub mod report;

// Re-export main types at crate root
pub use harness::{Harness, TaskOutcome, Transcript, TurnRecord};
pub use providers::{GenerateOptions, Generation, OllamaClient, TextGenerator, ERROR_MARKER};
pub use report::{ReportError, Reporter, RunPaths, RunRecord};
