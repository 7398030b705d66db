//! # verdict-core
//!
//! Deterministic validators for LLM benchmark outputs.
//!
//! This crate judges text generated for declarative benchmark tasks,
//! answering one question per (task, model) pair: did the output satisfy
//! the task's constraints?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same output always produces the same verdict
//! 2. **No LLM calls, no network**: All validation is rule-based
//! 3. **Never fatal**: Malformed output, broken schemas and protocol
//!    violations all degrade to `Verdict { passed: false, reason }`
//!
//! ## Example
//!
//! ```rust,ignore
//! use verdict_core::{load_pack, validate_json_output, GuessSession};
//!
//! let tasks = load_pack("packs/core")?;
//! let verdict = validate_json_output(output_text, schema);
//! if !verdict.passed {
//!     println!("FAIL: {}", verdict.reason);
//! }
//! ```

pub mod normalize;
pub mod task;
pub mod types;
pub mod validators;

// Re-export main types at crate root
pub use task::{load_pack, Task, TaskError, TaskInputs, TaskKind};
pub use types::Verdict;
pub use validators::{
    extract_svg, insert_metadata_comment, validate_grounded, validate_json_output,
    validate_svg_art, GuessSession, SvgMetadata, UNCERTAINTY_PHRASES,
};
