//! Which questions visitors may see.
//!
//! A question is eligible when it is published (`pub_date <= now`, inclusive)
//! and owns at least one choice. The repository narrows candidates in SQL with
//! the same predicates; the functions here are the authoritative check and
//! also work over any in-memory collection of summaries.

use crate::db::{self, Pool, QuestionFilter, QuestionSummary};
use crate::error::{PollError, PollResult};
use crate::model::Question;
use chrono::{DateTime, Utc};
use tracing::instrument;

/// Default number of questions on the index page.
pub const INDEX_LIMIT: usize = 5;

pub fn is_eligible(summary: &QuestionSummary, now: DateTime<Utc>) -> bool {
    summary.question.is_published(now) && summary.choice_count > 0
}

/// Repository filter selecting eligible candidates.
pub fn eligible_filter(now: DateTime<Utc>) -> QuestionFilter {
    QuestionFilter {
        published_at_or_before: Some(now),
        require_choices: true,
        ..Default::default()
    }
}

/// Eligible questions, newest first, at most `limit` of them.
pub fn latest(
    candidates: impl IntoIterator<Item = QuestionSummary>,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<QuestionSummary> {
    let mut eligible: Vec<QuestionSummary> = candidates
        .into_iter()
        .filter(|s| is_eligible(s, now))
        .collect();
    eligible.sort_by(|a, b| {
        b.question
            .pub_date
            .cmp(&a.question.pub_date)
            .then(b.question.id.cmp(&a.question.id))
    });
    eligible.truncate(limit);
    eligible
}

/// The eligible question with `id`. Missing and ineligible both yield `NotFound`.
pub fn find(
    candidates: impl IntoIterator<Item = QuestionSummary>,
    id: i64,
    now: DateTime<Utc>,
) -> PollResult<QuestionSummary> {
    candidates
        .into_iter()
        .find(|s| s.question.id == id && is_eligible(s, now))
        .ok_or(PollError::NotFound)
}

#[instrument(skip(pool))]
pub async fn latest_questions(
    pool: &Pool,
    now: DateTime<Utc>,
    limit: usize,
) -> PollResult<Vec<QuestionSummary>> {
    let filter = QuestionFilter {
        limit: Some(limit as i64),
        ..eligible_filter(now)
    };
    let candidates = db::question_summaries(pool, &filter).await?;
    Ok(latest(candidates, now, limit))
}

#[instrument(skip(pool))]
pub async fn eligible_question(pool: &Pool, id: i64, now: DateTime<Utc>) -> PollResult<Question> {
    let filter = QuestionFilter {
        id: Some(id),
        ..eligible_filter(now)
    };
    let candidates = db::question_summaries(pool, &filter).await?;
    find(candidates, id, now).map(|s| s.question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn summary(id: i64, pub_date: DateTime<Utc>, choice_count: i64) -> QuestionSummary {
        QuestionSummary {
            question: Question {
                id,
                question_text: format!("q{id}"),
                pub_date,
            },
            choice_count,
        }
    }

    fn ids(list: &[QuestionSummary]) -> Vec<i64> {
        list.iter().map(|s| s.question.id).collect()
    }

    #[test]
    fn excludes_future_and_choiceless() {
        let now = Utc::now();
        let candidates = vec![
            summary(1, now - Duration::days(30), 3),
            summary(2, now - Duration::days(30), 0),
            summary(3, now + Duration::days(30), 3),
            summary(4, now + Duration::days(30), 0),
        ];
        assert_eq!(ids(&latest(candidates, now, INDEX_LIMIT)), vec![1]);
    }

    #[test]
    fn includes_question_published_exactly_now() {
        let now = Utc::now();
        let candidates = vec![summary(1, now, 1)];
        assert_eq!(ids(&latest(candidates.clone(), now, INDEX_LIMIT)), vec![1]);
        assert!(find(candidates, 1, now).is_ok());
    }

    #[test]
    fn newest_first_and_truncated() {
        let now = Utc::now();
        let candidates: Vec<_> = (1..=8)
            .map(|i| summary(i, now - Duration::days(10 - i), 2))
            .collect();
        assert_eq!(ids(&latest(candidates, now, INDEX_LIMIT)), vec![8, 7, 6, 5, 4]);
    }

    #[test]
    fn same_pub_date_orders_by_id() {
        let now = Utc::now();
        let at = now - Duration::hours(1);
        let candidates = vec![summary(1, at, 1), summary(2, at, 1)];
        assert_eq!(ids(&latest(candidates, now, INDEX_LIMIT)), vec![2, 1]);
    }

    #[test]
    fn find_hides_ineligible_and_missing_alike() {
        let now = Utc::now();
        let candidates = vec![
            summary(1, now + Duration::days(30), 3),
            summary(2, now - Duration::days(30), 0),
        ];
        assert!(matches!(find(candidates.clone(), 1, now), Err(PollError::NotFound)));
        assert!(matches!(find(candidates.clone(), 2, now), Err(PollError::NotFound)));
        assert!(matches!(find(candidates, 99, now), Err(PollError::NotFound)));
    }
}
