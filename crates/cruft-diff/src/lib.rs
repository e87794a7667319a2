//! Tree comparison and patch application for cruft
//!
//! [`tree`] decides which paths of a directory take part in a comparison.
//! [`patch`] computes label-normalized diffs between two directories and
//! applies them to a live project, preferring a three-way merge and falling
//! back to reject files. Both wrap the `git` executable for the actual text
//! work.

pub mod display;
pub mod error;
pub mod patch;
pub mod tree;

pub use display::colorize;
pub use error::{Error, Result};
pub use patch::{ApplyOutcome, ApplyStrategy, DiffLabels, apply_diff, compute_diff};
pub use tree::{Classification, Classifier, classify, copy_projection};
