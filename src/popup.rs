//! Analyzer Popup: submit text to the analysis service and show one result.
//!
//! The popup is host-agnostic. It reaches the outside world through three seams:
//! `AnalysisTransport` (fetch), `ResultSurface` (the result container) and
//! `TabOpener` (opening a browser tab). Each `analyze` call is one click: at most
//! one request, no retry, no de-duplication. Two overlapping calls against the same
//! surface each write their own final message; whichever resolves last is what stays
//! on screen.

use serde::Serialize;
use tracing::{error, instrument, warn};

use crate::analysis::AnalysisTransport;
use crate::config::Messages;
use crate::domain::{AnalysisOutcome, AnalysisRequest};
use crate::util::{escape_html, trunc_for_log};

/// Everything the result container can show.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PopupMessage {
  Prompt,
  Analyzing,
  Verdict { label: String, confidence: String, explanation: String },
  Error { message: String },
  Unexpected,
  Unreachable,
}

impl PopupMessage {
  pub fn kind(&self) -> &'static str {
    match self {
      PopupMessage::Prompt => "prompt",
      PopupMessage::Analyzing => "analyzing",
      PopupMessage::Verdict { .. } => "verdict",
      PopupMessage::Error { .. } => "error",
      PopupMessage::Unexpected => "unexpected",
      PopupMessage::Unreachable => "unreachable",
    }
  }

  /// Map an outcome to the message shown for it, logging diagnostics the user never sees.
  pub fn from_outcome(outcome: AnalysisOutcome, messages: &Messages) -> Self {
    match outcome {
      AnalysisOutcome::Success { label, confidence, explanation } => PopupMessage::Verdict {
        label,
        confidence: format!("{:.2}%", confidence * 100.0),
        explanation: explanation.unwrap_or_else(|| messages.no_explanation.clone()),
      },
      AnalysisOutcome::ServerError(message) => PopupMessage::Error { message },
      AnalysisOutcome::Malformed(payload) => {
        warn!(target: "popup", payload = %trunc_for_log(&payload.to_string(), 512), "Unexpected API response");
        PopupMessage::Unexpected
      }
      AnalysisOutcome::TransportFailure(e) => {
        error!(target: "popup", error = %e, "Analysis request failed");
        PopupMessage::Unreachable
      }
    }
  }

  /// HTML fragment for the result container. Label, explanation and server
  /// errors are escaped.
  pub fn render(&self, messages: &Messages) -> String {
    match self {
      PopupMessage::Prompt => messages.prompt.clone(),
      PopupMessage::Analyzing => messages.analyzing.clone(),
      PopupMessage::Verdict { label, confidence, explanation } => format!(
        "✅ <strong>Verdict:</strong> {} <br>\n📊 <strong>Confidence:</strong> {} <br>\n💡 <strong>Explanation:</strong> {}",
        escape_html(label),
        confidence,
        escape_html(explanation),
      ),
      PopupMessage::Error { message } => format!("{}{}", messages.error_prefix, escape_html(message)),
      PopupMessage::Unexpected => messages.unexpected.clone(),
      PopupMessage::Unreachable => messages.unreachable.clone(),
    }
  }
}

/// The result container. `show` replaces whatever was displayed before.
pub trait ResultSurface {
  fn show(&mut self, message: &PopupMessage);
}

/// The tab-opening capability. Fire-and-forget.
pub trait TabOpener {
  fn open_tab(&mut self, url: &str);
}

/// Collects what the popup did during one event so a host can replay it to a client.
#[derive(Debug, Default)]
pub struct PopupRecorder {
  pub shown: Vec<PopupMessage>,
  pub tabs: Vec<String>,
}

impl ResultSurface for PopupRecorder {
  fn show(&mut self, message: &PopupMessage) {
    self.shown.push(message.clone());
  }
}

impl TabOpener for PopupRecorder {
  fn open_tab(&mut self, url: &str) {
    self.tabs.push(url.to_string());
  }
}

pub struct AnalyzerPopup<T> {
  transport: T,
  messages: Messages,
}

impl<T: AnalysisTransport> AnalyzerPopup<T> {
  pub fn new(transport: T, messages: Messages) -> Self {
    Self { transport, messages }
  }

  pub fn messages(&self) -> &Messages {
    &self.messages
  }

  /// "Analyze" click. Returns the final message, which is also the last thing shown.
  #[instrument(level = "info", skip(self, input, surface), fields(input_len = input.len()))]
  pub async fn analyze<S: ResultSurface + Send>(&self, input: &str, surface: &mut S) -> PopupMessage {
    let Some(req) = AnalysisRequest::from_input(input) else {
      surface.show(&PopupMessage::Prompt);
      return PopupMessage::Prompt;
    };

    surface.show(&PopupMessage::Analyzing);

    let outcome = match self.transport.post_analyze(&req).await {
      Ok(payload) => AnalysisOutcome::from_payload(payload),
      Err(e) => AnalysisOutcome::TransportFailure(e),
    };
    tracing::info!(target: "popup", outcome = outcome.kind(), "Analysis finished");

    let message = PopupMessage::from_outcome(outcome, &self.messages);
    surface.show(&message);
    message
  }

  /// "Open Site" click: a new tab at the service root.
  pub fn open_site<O: TabOpener>(&self, tabs: &mut O) {
    tabs.open_tab(&self.transport.site_url());
  }
}
