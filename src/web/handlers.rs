use super::{render, AppState};
use crate::db;
use crate::error::{PollError, PollResult};
use crate::model;
use crate::visibility;
use crate::vote;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Utc;
use tracing::{instrument, warn};

pub async fn root() -> Redirect {
    Redirect::permanent("/polls/")
}

#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>) -> PollResult<Html<String>> {
    let now = Utc::now();
    let questions = visibility::latest_questions(&state.pool, now, state.index_limit).await?;
    Ok(Html(render::index(&questions, now)))
}

#[instrument(skip_all)]
pub async fn detail(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> PollResult<Html<String>> {
    let id = parse_id(&question_id)?;
    let question = visibility::eligible_question(&state.pool, id, Utc::now()).await?;
    let choices = db::choices_for_question(&state.pool, question.id).await?;
    Ok(Html(render::detail(&question, &choices, None)))
}

/// Any existing question, eligible or not.
#[instrument(skip_all)]
pub async fn results(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> PollResult<Html<String>> {
    let id = parse_id(&question_id)?;
    let question = db::get_question(&state.pool, id)
        .await?
        .ok_or(PollError::NotFound)?;
    let choices = db::choices_for_question(&state.pool, question.id).await?;
    Ok(Html(render::results(&question, &choices)))
}

/// Form fields are read as raw pairs so a repeated `choice` keeps the last
/// value, and an unreadable body counts as no choice at all.
#[instrument(skip_all)]
pub async fn vote(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> PollResult<Response> {
    let fields = match form {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            warn!(%rejection, "unreadable vote form");
            Vec::new()
        }
    };
    let choice = fields
        .iter()
        .rev()
        .find(|(name, _)| name == "choice")
        .map(|(_, value)| value.as_str());

    let question = vote::record_vote(&state.pool, &question_id, choice).await?;
    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, render::results_path(question.id))],
    )
        .into_response())
}

fn parse_id(raw: &str) -> PollResult<i64> {
    model::parse_id(raw).ok_or(PollError::NotFound)
}
