//! HTTP route handlers for Tollgate.

use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::state::AppState;

mod form;
mod health;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        // Health & Status
        .route("/health", get(health::health_check))

        // Guarded form
        .route("/form", get(form::show_form))
        .route("/submit", post(form::submit_form))

        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))

        // Add shared state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, RecaptchaSettings};
    use crate::verifier::tests::{spawn_server, spawn_siteverify};
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use tollgate_common::constants::SITEVERIFY_PATH;
    use tower::ServiceExt;

    fn app(recaptcha: RecaptchaSettings) -> Router {
        let config = AppConfig {
            recaptcha,
            ..Default::default()
        };
        create_router(AppState::new(config).unwrap())
    }

    fn submit(body: &'static str) -> Request<Body> {
        Request::post("/submit")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(RecaptchaSettings {
            disabled: true,
            ..Default::default()
        })
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_disabled_submit_accepted() {
        let response = app(RecaptchaSettings {
            disabled: true,
            score_threshold: Some(0.5),
            ..Default::default()
        })
        .oneshot(submit("name=alice"))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["accepted"], true);
        assert_eq!(body["score"], 0.6);
        assert_eq!(body["hostname"], "localhost");
        assert_eq!(body["challenge_unix"], 1611518442);
    }

    #[tokio::test]
    async fn test_low_score_rejected() {
        let host = spawn_siteverify(r#"{"success": true, "score": 0.5}"#).await;
        let response = app(RecaptchaSettings {
            private_key: Some("secret".to_string()),
            score_threshold: Some(0.7),
            verify_host: host,
            ..Default::default()
        })
        .oneshot(submit("g-recaptcha-response=tok"))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["code"], "score");
        assert_eq!(body["message"], "reCaptcha score is too low. score: 0.5");
    }

    #[tokio::test]
    async fn test_invalid_secret_is_server_error() {
        let host =
            spawn_siteverify(r#"{"success": false, "error-codes": ["missing-input-secret"]}"#).await;
        let response = app(RecaptchaSettings {
            private_key: Some("secret".to_string()),
            verify_host: host,
            ..Default::default()
        })
        .oneshot(submit("g-recaptcha-response=tok"))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["code"], "invalid_secret");
    }

    #[tokio::test]
    async fn test_form_page_renders_markup() {
        let response = app(RecaptchaSettings {
            disabled: true,
            public_key: Some("site-key".to_string()),
            ..Default::default()
        })
        .oneshot(Request::get("/form").body(Body::empty()).unwrap())
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/recaptcha/api.js?render=site-key"));
        assert!(html.contains("grecaptcha.ready"));
        assert!(html.contains(r#"name="g-recaptcha-response""#));
    }

    #[tokio::test]
    async fn test_form_page_without_public_key_fails() {
        let response = app(RecaptchaSettings {
            disabled: true,
            ..Default::default()
        })
        .oneshot(Request::get("/form").body(Body::empty()).unwrap())
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_slow_verification_times_out_request() {
        let siteverify = Router::new().route(
            SITEVERIFY_PATH,
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                r#"{"success": true, "score": 0.9}"#
            }),
        );
        let host = spawn_server(siteverify).await;

        let config = AppConfig {
            request_timeout_secs: 1,
            recaptcha: RecaptchaSettings {
                private_key: Some("secret".to_string()),
                verify_host: host,
                ..Default::default()
            },
            ..Default::default()
        };
        let response = create_router(AppState::new(config).unwrap())
            .oneshot(submit("g-recaptcha-response=tok"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
