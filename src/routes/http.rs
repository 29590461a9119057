//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs input sizes and basic result info.

use std::sync::Arc;
use axum::{extract::{State, Query}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len()))]
pub async fn http_post_analyze(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnalyzeIn>,
) -> impl IntoResponse {
  let out = do_analyze(&state, &body.text).await;
  info!(target: "popup", kind = out.result.message.kind(), "HTTP analyze served");
  Json(out)
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_open_site(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let url = do_open_site(&state);
  info!(target: "popup", %url, "HTTP open_site served");
  Json(OpenSiteOut { url })
}

#[instrument(level = "info", skip(state, body), fields(forms = body.forms.len()))]
pub async fn http_post_quiz_submit(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizSubmitIn>,
) -> impl IntoResponse {
  let out = do_submit_quiz(&state, body.forms);
  info!(target: "quiz", active = out.active, score = ?out.score, "HTTP quiz submit graded");
  Json(out)
}

#[instrument(level = "info", skip(q), fields(text_len = q.text.as_ref().map(|t| t.len()).unwrap_or(0)))]
pub async fn http_get_generated_quiz(Query(q): Query<GenerateQuery>) -> impl IntoResponse {
  let form = do_generate_quiz(q.text.as_deref().unwrap_or_default());
  Json(QuizOut { form })
}
