use crate::db::{self, Pool};
use crate::error::{PollError, PollResult, NO_CHOICE_SELECTED};
use crate::model::{parse_id, Question};
use tracing::{info, instrument, warn};

/// Record one vote for `choice` on `question_id`, both as submitted.
///
/// The question must exist (`NotFound` otherwise). The choice must be present
/// and belong to that question (`Validation` otherwise). The count is bumped
/// by a single relative `UPDATE`, so concurrent votes never overwrite each other.
#[instrument(skip(pool))]
pub async fn record_vote(
    pool: &Pool,
    question_id: &str,
    choice: Option<&str>,
) -> PollResult<Question> {
    let question_id = parse_id(question_id).ok_or(PollError::NotFound)?;
    let question = db::get_question(pool, question_id)
        .await?
        .ok_or(PollError::NotFound)?;

    let Some(choice_id) = choice.and_then(parse_id) else {
        warn!(question_id, ?choice, "vote without a usable choice");
        return Err(invalid_choice(pool, question).await);
    };

    if !db::increment_choice_votes(pool, question.id, choice_id).await? {
        warn!(question_id, choice_id, "choice does not belong to question");
        return Err(invalid_choice(pool, question).await);
    }

    info!(question_id, choice_id, "vote recorded");
    Ok(question)
}

async fn invalid_choice(pool: &Pool, question: Question) -> PollError {
    match db::choices_for_question(pool, question.id).await {
        Ok(choices) => PollError::Validation {
            question,
            choices,
            message: NO_CHOICE_SELECTED,
        },
        Err(err) => PollError::Database(err),
    }
}
