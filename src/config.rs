//! Loading companion configuration (service address, popup strings, quiz styling) from TOML.
//!
//! Every table and key is optional; missing values fall back to the built-in defaults,
//! which are the fixed values the popup and quiz page have always used.

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CompanionConfig {
  #[serde(default)]
  pub service: ServiceCfg,
  #[serde(default)]
  pub quiz: QuizCfg,
  #[serde(default)]
  pub messages: Messages,
}

/// Where the remote analysis service lives. `/analyze` is appended for analysis requests,
/// and the bare root is what "Open Site" navigates to.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServiceCfg {
  pub base_url: String,
}

impl Default for ServiceCfg {
  fn default() -> Self {
    Self { base_url: DEFAULT_BASE_URL.into() }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct QuizCfg {
  pub points_per_correct: u32,
  pub correct_background: String,
  pub incorrect_background: String,
  pub dashboard_path: String,
  /// `{score}` is replaced with the total.
  pub alert_template: String,
}

impl Default for QuizCfg {
  fn default() -> Self {
    Self {
      points_per_correct: 10,
      correct_background: "#d4edda".into(),
      incorrect_background: "#f8d7da".into(),
      dashboard_path: "/dashboard".into(),
      alert_template: "You scored {score} points!".into(),
    }
  }
}

/// Texts shown in the popup's result container.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Messages {
  pub prompt: String,
  pub analyzing: String,
  pub error_prefix: String,
  pub unexpected: String,
  pub unreachable: String,
  pub no_explanation: String,
}

impl Default for Messages {
  fn default() -> Self {
    Self {
      prompt: "⚠️ Please enter some text.".into(),
      analyzing: "⏳ Analyzing...".into(),
      error_prefix: "❌ Error: ".into(),
      unexpected: "⚠️ Unexpected response from server.".into(),
      unreachable: "❌ Error: Unable to connect to API. Make sure the analysis server is running.".into(),
      no_explanation: "No explanation available.".into(),
    }
  }
}

/// Attempt to load `CompanionConfig` from COMPANION_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<CompanionConfig> {
  let path = std::env::var("COMPANION_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<CompanionConfig>(&s) {
      Ok(cfg) => {
        info!(target: "newslens", %path, "Loaded companion config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "newslens", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "newslens", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
