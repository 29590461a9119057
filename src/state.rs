//! Application state: configuration plus the popup bound to the analysis client.
//!
//! Everything in here is read-only after startup. No request leaves anything
//! behind for the next one.

use tracing::{error, info, instrument};

use crate::analysis::{AnalysisClient, TransportError};
use crate::config::{load_config_from_env, CompanionConfig, QuizCfg, DEFAULT_BASE_URL};
use crate::popup::AnalyzerPopup;

pub struct AppState {
    pub popup: AnalyzerPopup<AnalysisClient>,
    pub quiz: QuizCfg,
}

impl AppState {
    /// Build state from env: TOML config first, then `ANALYZER_BASE_URL` on top.
    /// An unusable base URL is logged and replaced by the default.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, TransportError> {
        let mut cfg = load_config_from_env().unwrap_or_default();
        if let Ok(url) = std::env::var("ANALYZER_BASE_URL") {
            cfg.service.base_url = url;
        }

        match Self::from_config(cfg.clone()) {
            Err(TransportError::InvalidUrl { url, reason }) => {
                error!(target: "newslens", base_url = %url, %reason, "Falling back to default analysis service URL");
                cfg.service.base_url = DEFAULT_BASE_URL.into();
                Self::from_config(cfg)
            }
            other => other,
        }
    }

    pub fn from_config(cfg: CompanionConfig) -> Result<Self, TransportError> {
        let client = AnalysisClient::new(&cfg.service.base_url)?;
        info!(target: "newslens", analyze_url = %client.analyze_url(), "Analysis service configured");
        Ok(Self {
            popup: AnalyzerPopup::new(client, cfg.messages),
            quiz: cfg.quiz,
        })
    }
}
