//! Row and filter types used by repositories.
//!
//! Keep these structs focused on the data returned by queries. Eligibility
//! rules live in `crate::visibility`.

use crate::model::Question;
use chrono::{DateTime, Utc};

/// A question together with the number of choices it owns.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct QuestionSummary {
    #[sqlx(flatten)]
    pub question: Question,
    pub choice_count: i64,
}

/// Explicit filter parameters for `question_summaries`. Every `None`/`false`
/// field leaves that dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub id: Option<i64>,
    pub published_at_or_before: Option<DateTime<Utc>>,
    pub require_choices: bool,
    pub limit: Option<i64>,
}
