//! Guarded form endpoints.

use std::collections::HashMap;

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use tollgate_common::{ValidationError, VerificationResult};

use crate::state::AppState;

#[derive(Serialize)]
pub struct RejectionResponse {
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
pub struct AcceptedResponse {
    accepted: bool,
    #[serde(flatten)]
    verdict: VerificationResult,
    /// Challenge time as a unix timestamp, when the service reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    challenge_unix: Option<i64>,
}

/// Render a page carrying the challenge scripts and the hidden input
pub async fn show_form(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let render = || -> Result<(String, String), tollgate_common::ConfigError> {
        Ok((state.renderer.init(None)?, state.renderer.ready(None, None, None)?))
    };

    let (init, ready) = render().map_err(|e| {
        tracing::error!(error = %e, "Failed to render reCaptcha markup");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Html(format!(
        r#"<!doctype html>
<html>
<head>
{init}
</head>
<body>
<form method="post" action="/submit">
    {input}
    <button type="submit">Send</button>
</form>
{ready}
</body>
</html>
"#,
        init = init,
        input = state.field.widget().render(),
        ready = ready,
    )))
}

/// Validate a submitted form
///
/// Returns:
/// - 200: token accepted, body carries the verdict
/// - 422: score too low, or token invalid/expired
/// - 500/502/503: misconfiguration or verification service trouble
pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    match state.field.clean(&form).await {
        Ok(verdict) => {
            let challenge_unix = verdict.challenge_time().map(|t| t.timestamp());
            Json(AcceptedResponse {
                accepted: true,
                verdict,
                challenge_unix,
            })
            .into_response()
        }
        Err(err) => rejection(err),
    }
}

fn rejection(err: ValidationError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    tracing::debug!(code = err.code(), status = status.as_u16(), "Form submission rejected");

    (
        status,
        Json(RejectionResponse {
            code: err.code(),
            message: err.to_string(),
        }),
    )
        .into_response()
}
