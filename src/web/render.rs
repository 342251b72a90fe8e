//! Server-rendered HTML pages.

use crate::db::QuestionSummary;
use crate::model::{Choice, Question};
use chrono::{DateTime, Utc};

pub fn detail_path(question_id: i64) -> String {
    format!("/polls/{question_id}/")
}

pub fn results_path(question_id: i64) -> String {
    format!("/polls/{question_id}/results/")
}

pub fn vote_path(question_id: i64) -> String {
    format!("/polls/{question_id}/vote")
}

pub fn index(questions: &[QuestionSummary], now: DateTime<Utc>) -> String {
    if questions.is_empty() {
        return page("Polls", "<p>No polls are available.</p>");
    }
    let mut body = String::from("<ul>\n");
    for s in questions {
        let q = &s.question;
        body.push_str(&format!(
            "  <li><a href=\"{}\">{}</a>",
            html_attr(&detail_path(q.id)),
            html_escape(&q.question_text)
        ));
        if q.was_published_recently(now) {
            body.push_str(" <span class=\"new\">new</span>");
        }
        body.push_str("</li>\n");
    }
    body.push_str("</ul>");
    page("Polls", &body)
}

pub fn detail(question: &Question, choices: &[Choice], error_message: Option<&str>) -> String {
    let mut body = format!(
        "<form name=\"choiceForm\" action=\"{}\" method=\"post\">\n<fieldset>\n  <legend><h1>{}</h1></legend>\n",
        html_attr(&vote_path(question.id)),
        html_escape(&question.question_text)
    );
    if let Some(msg) = error_message {
        body.push_str(&format!("  <p><strong>{}</strong></p>\n", html_escape(msg)));
    }
    for (n, choice) in choices.iter().enumerate() {
        let input_id = format!("choice{}", n + 1);
        body.push_str(&format!(
            "  <input type=\"radio\" name=\"choice\" id=\"{input_id}\" value=\"{}\">\n  <label for=\"{input_id}\">{}</label><br>\n",
            choice.id,
            html_escape(&choice.choice_text)
        ));
    }
    body.push_str("</fieldset>\n<input type=\"submit\" value=\"Vote\">\n</form>");
    page(&question.question_text, &body)
}

pub fn results(question: &Question, choices: &[Choice]) -> String {
    let mut body = format!("<h1>{}</h1>\n<ul>\n", html_escape(&question.question_text));
    for choice in choices {
        body.push_str(&format!(
            "  <li>{} -- {} {}</li>\n",
            html_escape(&choice.choice_text),
            choice.votes,
            if choice.votes == 1 { "vote" } else { "votes" }
        ));
    }
    body.push_str(&format!(
        "</ul>\n<a href=\"{}\">Vote again?</a>",
        html_attr(&detail_path(question.id))
    ));
    page(&question.question_text, &body)
}

pub fn not_found() -> String {
    page("Not Found", "<h1>Not Found</h1>\n<p>The requested poll was not found.</p>")
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>{}</title>
  </head>
  <body>
    {}
  </body>
</html>"#,
        html_escape(title),
        body
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn html_attr(s: &str) -> String {
    html_escape(s).replace('"', "&quot;")
}
