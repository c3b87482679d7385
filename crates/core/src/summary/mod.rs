//! Monthly commission summaries.
//!
//! Active reports dated inside a calendar month are grouped per
//! (employee, commission project) and their values summed exactly.

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::{SummaryEngine, summarize};
pub use error::SummaryError;
pub use types::*;
