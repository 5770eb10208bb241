//! CodeTutor Practice
//!
//! Read-only access to the practice problem set: problem summaries, detailed
//! problem statements, and per-language test scaffolds.
//!
//! Fixtures are loaded once from an explicitly configured directory:
//! - `problems_brief.json`: ordered array of problem summaries
//! - `problems_detailed.json`: object of problem details keyed by id
//! - `problems_gold_code.json`: object keyed by id, then by language

pub mod error;
pub mod models;
pub mod repository;

pub use error::{PracticeError, Result};
pub use models::{ProblemDetail, ProblemSummary};
pub use repository::{JsonFixtureRepository, ProblemRepository};
