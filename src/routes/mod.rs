//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket event channel at `/ws`
/// - popup and quiz events under `/api/v1/...`
/// - static front end from `static_dir` with index fallback
/// - CORS (allow any origin/method/headers) so an extension page can call in
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>, static_dir: &str) -> Router {
    let static_service = ServeDir::new(static_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(format!("{}/index.html", static_dir.trim_end_matches('/'))));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/popup/analyze", post(http::http_post_analyze))
        .route("/api/v1/popup/open_site", post(http::http_post_open_site))
        .route("/api/v1/quiz/submit", post(http::http_post_quiz_submit))
        .route("/api/v1/quiz/generate", get(http::http_get_generated_quiz))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::CompanionConfig;

    fn router_for(base_url: &str) -> Router {
        let mut cfg = CompanionConfig::default();
        cfg.service.base_url = base_url.into();
        let state = AppState::from_config(cfg).expect("state");
        build_router(Arc::new(state), "./static")
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.expect("response");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = router_for("http://127.0.0.1:5000");
        let (status, body) = call(app, Request::get("/api/v1/health").body(Body::empty()).expect("request")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));
    }

    #[tokio::test]
    async fn analyze_forwards_trimmed_text_and_renders_verdict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .and(body_json(json!({"text": "water is wet"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"label": "REAL", "confidence": 0.8732, "explanation": "looks factual"}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let app = router_for(&server.uri());
        let (status, body) = call(app, post_json("/api/v1/popup/analyze", json!({"text": "  water is wet  "}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["kind"], "verdict");
        assert_eq!(body["result"]["label"], "REAL");
        assert_eq!(body["result"]["confidence"], "87.32%");
        assert_eq!(body["result"]["explanation"], "looks factual");
        assert_eq!(body["shown"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["shown"][0]["html"], "⏳ Analyzing...");
    }

    #[tokio::test]
    async fn blank_analyze_prompts_without_calling_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let app = router_for(&server.uri());
        let (status, body) = call(app, post_json("/api/v1/popup/analyze", json!({"text": "   "}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["kind"], "prompt");
        assert_eq!(body["result"]["html"], "⚠️ Please enter some text.");
    }

    #[tokio::test]
    async fn server_reported_error_is_surfaced_even_on_400() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "model unavailable"})))
            .mount(&server)
            .await;

        let app = router_for(&server.uri());
        let (_, body) = call(app, post_json("/api/v1/popup/analyze", json!({"text": "x"}))).await;
        assert_eq!(body["result"]["kind"], "error");
        assert_eq!(body["result"]["html"], "❌ Error: model unavailable");
    }

    #[tokio::test]
    async fn unreachable_service_yields_connectivity_message() {
        let app = router_for("http://127.0.0.1:1");
        let (status, body) = call(app, post_json("/api/v1/popup/analyze", json!({"text": "x"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["kind"], "unreachable");
    }

    #[tokio::test]
    async fn open_site_returns_service_root() {
        let app = router_for("http://127.0.0.1:5000/analyze");
        let req = Request::post("/api/v1/popup/open_site").body(Body::empty()).expect("request");
        let (_, body) = call(app, req).await;
        assert_eq!(body, json!({"url": "http://127.0.0.1:5000"}));
    }

    #[tokio::test]
    async fn quiz_submit_grades_and_redirects() {
        let app = router_for("http://127.0.0.1:5000");
        let forms = json!({"forms": [{"quiz": true, "questions": [
            {"id": "q1", "answer": "A", "choices": [{"value": "A", "checked": true}, {"value": "B"}]},
            {"id": "q2", "answer": "B", "choices": [{"value": "A"}, {"value": "B"}, {"value": "X"}]},
            {"id": "q3", "answer": "C", "choices": [{"value": "C", "checked": true}]}
        ]}]});
        let (status, body) = call(app, post_json("/api/v1/quiz/submit", forms)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active"], true);
        assert_eq!(body["default_prevented"], true);
        assert_eq!(body["score"], 20);
        let colors: Vec<_> = body["forms"][0]["questions"]
            .as_array()
            .expect("questions")
            .iter()
            .map(|q| q["background"].clone())
            .collect();
        assert_eq!(colors, vec![json!("#d4edda"), json!("#f8d7da"), json!("#d4edda")]);
        assert_eq!(
            body["effects"],
            json!([
                {"type": "alert", "message": "You scored 20 points!"},
                {"type": "navigate", "path": "/dashboard"}
            ])
        );
    }

    #[tokio::test]
    async fn quiz_submit_takes_the_page_forms_list() {
        let app = router_for("http://127.0.0.1:5000");
        let res = app
            .clone()
            .oneshot(post_json("/api/v1/quiz/submit", json!({"form": {"quiz": true, "questions": []}})))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = call(app, post_json("/api/v1/quiz/submit", json!({"forms": [{"quiz": true, "questions": []}]}))).await;
        assert_eq!(status, StatusCode::OK);
        let mut keys: Vec<_> = body.as_object().expect("object").keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["active", "default_prevented", "effects", "forms", "score"]);
        assert_eq!(body["score"], 0);
    }

    #[tokio::test]
    async fn quiz_submit_on_page_without_quiz_is_inactive() {
        let app = router_for("http://127.0.0.1:5000");
        let (_, body) = call(app, post_json("/api/v1/quiz/submit", json!({"forms": []}))).await;
        assert_eq!(body["active"], false);
        assert_eq!(body["default_prevented"], false);
        assert_eq!(body["score"], Value::Null);
        assert_eq!(body["effects"], json!([]));
    }

    #[tokio::test]
    async fn generated_quiz_is_a_quiz_form() {
        let app = router_for("http://127.0.0.1:5000");
        let req = Request::get("/api/v1/quiz/generate?text=true%20story").body(Body::empty()).expect("request");
        let (_, body) = call(app, req).await;
        assert_eq!(body["form"]["quiz"], true);
        assert_eq!(body["form"]["questions"].as_array().map(Vec::len), Some(3));
    }
}
