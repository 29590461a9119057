//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Each client message / HTTP request is one user event on the popup or quiz page.

use serde::{Deserialize, Serialize};

use crate::config::Messages;
use crate::domain::{QuizForm, Score};
use crate::popup::PopupMessage;
use crate::quiz::QuizEffect;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Analyze {
        text: String,
    },
    OpenSite,
    SubmitQuiz {
        forms: Vec<QuizForm>,
    },
    GenerateQuiz {
        #[serde(default)]
        text: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    /// One per message the popup's result container shows.
    Popup {
        #[serde(flatten)]
        view: PopupView,
    },
    OpenTab {
        url: String,
    },
    QuestionStyle {
        id: String,
        background: String,
    },
    Alert {
        message: String,
    },
    Navigate {
        path: String,
    },
    Quiz {
        form: QuizForm,
    },
    Error {
        message: String,
    },
}

/// A popup message with its rendered HTML.
#[derive(Clone, Debug, Serialize)]
pub struct PopupView {
    #[serde(flatten)]
    pub message: PopupMessage,
    pub html: String,
}

impl PopupView {
    pub fn new(message: PopupMessage, messages: &Messages) -> Self {
        let html = message.render(messages);
        Self { message, html }
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct AnalyzeIn {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeOut {
    /// Everything the result container showed, in order; the last entry is `result`.
    pub shown: Vec<PopupView>,
    pub result: PopupView,
}

#[derive(Debug, Serialize)]
pub struct OpenSiteOut {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct QuizSubmitIn {
    pub forms: Vec<QuizForm>,
}

#[derive(Debug, Serialize)]
pub struct QuizSubmitOut {
    /// False when the page had no quiz-flagged form; nothing else happened then.
    pub active: bool,
    pub default_prevented: bool,
    pub score: Option<Score>,
    pub forms: Vec<QuizForm>,
    pub effects: Vec<QuizEffect>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuizOut {
    pub form: QuizForm,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
