//! Domain models: analysis request/response/outcome and the quiz form the scorer grades.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::analysis::TransportError;

/// Body of `POST /analyze`. Only ever built from trimmed, non-empty input.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRequest {
  pub text: String,
}

impl AnalysisRequest {
  /// Trim the raw input; `None` when nothing is left.
  pub fn from_input(raw: &str) -> Option<Self> {
    let text = raw.trim();
    if text.is_empty() { None } else { Some(Self { text: text.to_string() }) }
  }
}

/// What the analysis service sent back. Every field is optional and loosely typed;
/// `AnalysisOutcome::from_payload` decides what the combination means.
#[derive(Clone, Debug, Deserialize)]
pub struct AnalysisResponse {
  #[serde(default)] pub label: Option<Value>,
  /// `Some(Value::Null)` when the key is present with a null value.
  #[serde(default, deserialize_with = "present")] pub confidence: Option<Value>,
  #[serde(default)] pub explanation: Option<Value>,
  #[serde(default)] pub error: Option<Value>,
}

/// Result of one analyze request. Rendering matches on this exhaustively.
#[derive(Debug)]
pub enum AnalysisOutcome {
  Success { label: String, confidence: f64, explanation: Option<String> },
  ServerError(String),
  Malformed(Value),
  TransportFailure(TransportError),
}

impl AnalysisOutcome {
  /// Classify a parsed JSON body. `error` wins over everything else; `confidence`
  /// only has to be present, so `0` and `null` both count.
  pub fn from_payload(payload: Value) -> Self {
    let resp = match &payload {
      Value::Object(_) => match serde_json::from_value::<AnalysisResponse>(payload.clone()) {
        Ok(r) => r,
        Err(_) => return AnalysisOutcome::Malformed(payload),
      },
      _ => return AnalysisOutcome::Malformed(payload),
    };

    if let Some(err) = resp.error.as_ref().filter(|v| is_truthy(v)) {
      return AnalysisOutcome::ServerError(display_value(err));
    }

    let label = resp.label.as_ref().filter(|v| is_truthy(v)).map(display_value);
    let confidence = resp.confidence.as_ref().map(to_number);
    match (label, confidence) {
      (Some(label), Some(confidence)) => {
        let explanation = resp.explanation.as_ref().filter(|v| is_truthy(v)).map(display_value);
        AnalysisOutcome::Success { label, confidence, explanation }
      }
      _ => AnalysisOutcome::Malformed(payload),
    }
  }

  /// Stable short name used in logs and API responses.
  pub fn kind(&self) -> &'static str {
    match self {
      AnalysisOutcome::Success { .. } => "success",
      AnalysisOutcome::ServerError(_) => "server_error",
      AnalysisOutcome::Malformed(_) => "malformed",
      AnalysisOutcome::TransportFailure(_) => "transport_failure",
    }
  }
}

/// Loose truthiness of a JSON value: null, false, 0, NaN and "" are falsy.
fn is_truthy(v: &Value) -> bool {
  match v {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

/// Keeps an explicit `null` distinguishable from an absent key.
fn present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
  Value::deserialize(d).map(Some)
}

/// Numeric value of a JSON value under JavaScript's `Number()` coercion.
fn to_number(v: &Value) -> f64 {
  match v {
    Value::Null => 0.0,
    Value::Bool(b) => if *b { 1.0 } else { 0.0 },
    Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
    Value::String(s) => {
      let s = s.trim();
      if s.is_empty() {
        0.0
      } else if s.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')) {
        s.parse().unwrap_or(f64::NAN)
      } else {
        f64::NAN
      }
    }
    Value::Array(_) | Value::Object(_) => f64::NAN,
  }
}

/// Strings are shown verbatim; anything else as its JSON text.
fn display_value(v: &Value) -> String {
  match v {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

//
// Quiz page model
//

/// A form on the quiz page. Only forms with `quiz` set are picked up by the scorer.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct QuizForm {
  #[serde(default)]
  pub quiz: bool,
  #[serde(default)]
  pub questions: Vec<QuestionBlock>,
}

/// One question block: the expected answer it carries, its radio choices,
/// and the background the scorer paints after a submission.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct QuestionBlock {
  #[serde(default)]
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prompt: Option<String>,
  #[serde(default)]
  pub answer: Option<String>,
  #[serde(default)]
  pub choices: Vec<Choice>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub background: Option<String>,
}

impl QuestionBlock {
  /// The first checked choice, if any.
  pub fn selected(&self) -> Option<&Choice> {
    self.choices.iter().find(|c| c.checked)
  }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Choice {
  pub value: String,
  #[serde(default)]
  pub checked: bool,
}

/// Quiz total for one submission.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Score(pub u32);

impl std::fmt::Display for Score {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}
