//! Database module: row models and SQL repositories.
//!
//! - `model`: summary rows and query filters returned/accepted by repositories.
//! - `repo`: SQL-only functions over the `questions` and `choices` tables.
//!
//! External modules import from `polls::db`; the repository API is re-exported.

pub mod model;
pub mod repo;

pub use repo::*;

pub use model::{QuestionFilter, QuestionSummary};
