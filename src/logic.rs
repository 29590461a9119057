//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Each function is one user event: it builds a fresh recorder as the host for
//! the component, lets the component run, and returns what the recorder saw.

use tracing::{info, instrument};

use crate::domain::QuizForm;
use crate::popup::PopupRecorder;
use crate::protocol::{AnalyzeOut, PopupView, QuizSubmitOut};
use crate::quiz::{QuizRecorder, QuizScorer, SubmitEvent};
use crate::quizgen::generate_quiz;
use crate::state::AppState;

/// "Analyze" click.
#[instrument(level = "info", skip(state, text), fields(text_len = text.len()))]
pub async fn do_analyze(state: &AppState, text: &str) -> AnalyzeOut {
  let mut surface = PopupRecorder::default();
  let result = state.popup.analyze(text, &mut surface).await;

  let messages = state.popup.messages();
  let shown = surface.shown.into_iter().map(|m| PopupView::new(m, messages)).collect();
  AnalyzeOut { shown, result: PopupView::new(result, messages) }
}

/// "Open Site" click. Returns the URL of the tab that was opened.
#[instrument(level = "info", skip(state))]
pub fn do_open_site(state: &AppState) -> String {
  let mut tabs = PopupRecorder::default();
  state.popup.open_site(&mut tabs);
  tabs.tabs.pop().unwrap_or_default()
}

/// Quiz form submission on a page holding `forms`.
#[instrument(level = "info", skip_all, fields(forms = forms.len()))]
pub fn do_submit_quiz(state: &AppState, mut forms: Vec<QuizForm>) -> QuizSubmitOut {
  let mut event = SubmitEvent::default();
  let mut host = QuizRecorder::default();

  let score = QuizScorer::attach(&mut forms, &state.quiz).map(|mut scorer| scorer.submit(&mut event, &mut host));
  if score.is_none() {
    info!(target: "quiz", "No quiz form on page; submission left alone");
  }

  QuizSubmitOut {
    active: score.is_some(),
    default_prevented: event.default_prevented(),
    score,
    forms,
    effects: host.effects,
  }
}

#[instrument(level = "info", skip(text), fields(text_len = text.len()))]
pub fn do_generate_quiz(text: &str) -> QuizForm {
  generate_quiz(text)
}
