use super::model::{QuestionFilter, QuestionSummary};
use crate::model::{Choice, Question};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;
use tracing::instrument;

pub type Pool = SqlitePool;

pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<Pool> {
    let normalized = prepare_sqlite_url(database_url);
    let mut options = SqliteConnectOptions::from_str(&normalized)
        .with_context(|| format!("invalid database url: {normalized}"))?
        .create_if_missing(true)
        .foreign_keys(true);
    if !normalized.starts_with("sqlite::memory") {
        // Enable WAL and stricter durability.
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full);
    }
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// If using a file-backed SQLite URL, expand a leading `~/` and ensure the parent
/// directory exists. Leaves in-memory URLs untouched. Returns possibly-updated URL.
fn prepare_sqlite_url(url: &str) -> String {
    if !url.starts_with("sqlite:") || url.starts_with("sqlite::memory") {
        return url.to_string();
    }

    let rest = &url["sqlite:".len()..];
    let path_with_query = rest.strip_prefix("//").unwrap_or(rest);

    let (path_part, query_part) = match path_with_query.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_with_query, None),
    };

    if path_part.is_empty() {
        return url.to_string();
    }

    let expanded_path = match (path_part.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), rest),
        _ => path_part.to_string(),
    };

    if let Some(parent) = std::path::Path::new(&expanded_path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    let mut rebuilt = String::from("sqlite://");
    rebuilt.push_str(&expanded_path);
    if let Some(q) = query_part {
        rebuilt.push('?');
        rebuilt.push_str(q);
    }
    rebuilt
}

pub async fn run_migrations(pool: &Pool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[instrument(skip_all)]
pub async fn insert_question(
    pool: &Pool,
    question_text: &str,
    pub_date: DateTime<Utc>,
) -> sqlx::Result<i64> {
    sqlx::query_scalar("INSERT INTO questions (question_text, pub_date) VALUES (?, ?) RETURNING id")
        .bind(question_text)
        .bind(pub_date)
        .fetch_one(pool)
        .await
}

#[instrument(skip_all)]
pub async fn insert_choice(pool: &Pool, question_id: i64, choice_text: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        "INSERT INTO choices (question_id, choice_text, votes) VALUES (?, ?, 0) RETURNING id",
    )
    .bind(question_id)
    .bind(choice_text)
    .fetch_one(pool)
    .await
}

/// Create a question and its choices in one transaction.
#[instrument(skip_all)]
pub async fn insert_question_with_choices(
    pool: &Pool,
    question_text: &str,
    pub_date: DateTime<Utc>,
    choices: &[String],
) -> sqlx::Result<i64> {
    let mut tx = pool.begin().await?;
    let question_id: i64 = sqlx::query_scalar(
        "INSERT INTO questions (question_text, pub_date) VALUES (?, ?) RETURNING id",
    )
    .bind(question_text)
    .bind(pub_date)
    .fetch_one(&mut *tx)
    .await?;
    for choice_text in choices {
        sqlx::query("INSERT INTO choices (question_id, choice_text, votes) VALUES (?, ?, 0)")
            .bind(question_id)
            .bind(choice_text)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(question_id)
}

#[instrument(skip_all)]
pub async fn get_question(pool: &Pool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>("SELECT id, question_text, pub_date FROM questions WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[instrument(skip_all)]
pub async fn choices_for_question(pool: &Pool, question_id: i64) -> sqlx::Result<Vec<Choice>> {
    sqlx::query_as::<_, Choice>(
        "SELECT id, question_id, choice_text, votes FROM choices WHERE question_id = ? ORDER BY id",
    )
    .bind(question_id)
    .fetch_all(pool)
    .await
}

/// Questions with their choice counts, narrowed by `filter` and ordered newest first.
/// Ties on `pub_date` fall back to the higher id.
#[instrument(skip_all, fields(filter = ?filter))]
pub async fn question_summaries(
    pool: &Pool,
    filter: &QuestionFilter,
) -> sqlx::Result<Vec<QuestionSummary>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT q.id, q.question_text, q.pub_date, COUNT(c.id) AS choice_count \
         FROM questions q LEFT JOIN choices c ON c.question_id = q.id WHERE 1 = 1",
    );
    if let Some(id) = filter.id {
        qb.push(" AND q.id = ").push_bind(id);
    }
    if let Some(cutoff) = filter.published_at_or_before {
        qb.push(" AND q.pub_date <= ").push_bind(cutoff);
    }
    qb.push(" GROUP BY q.id, q.question_text, q.pub_date");
    if filter.require_choices {
        qb.push(" HAVING COUNT(c.id) > 0");
    }
    qb.push(" ORDER BY q.pub_date DESC, q.id DESC");
    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }
    qb.build_query_as::<QuestionSummary>().fetch_all(pool).await
}

/// Every question, newest first, regardless of eligibility.
#[instrument(skip_all)]
pub async fn all_questions(pool: &Pool) -> sqlx::Result<Vec<QuestionSummary>> {
    question_summaries(pool, &QuestionFilter::default()).await
}

/// Add one vote to `choice_id`, relative to the stored count, only if the choice
/// belongs to `question_id`. Returns false when no such pairing exists.
#[instrument(skip_all)]
pub async fn increment_choice_votes(
    pool: &Pool,
    question_id: i64,
    choice_id: i64,
) -> sqlx::Result<bool> {
    let res = sqlx::query("UPDATE choices SET votes = votes + 1 WHERE id = ? AND question_id = ?")
        .bind(choice_id)
        .bind(question_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() == 1)
}

/// Remove a question; its choices go with it via the foreign key cascade.
#[instrument(skip_all)]
pub async fn delete_question(pool: &Pool, id: i64) -> sqlx::Result<bool> {
    let res = sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}
