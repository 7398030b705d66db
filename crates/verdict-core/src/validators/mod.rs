//! The four task-type validators.
//!
//! Each validator is independent and side-effect free apart from the
//! hangman session state, which is owned by the caller. All of them
//! return a [`Verdict`](crate::types::Verdict); none of them can fail
//! the run.

pub mod grounded;
pub mod hangman;
pub mod schema;
pub mod svg;

pub use grounded::{validate_grounded, UNCERTAINTY_PHRASES};
pub use hangman::GuessSession;
pub use schema::validate_json_output;
pub use svg::{extract_svg, insert_metadata_comment, validate_svg_art, SvgMetadata};
