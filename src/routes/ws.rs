//! WebSocket upgrade + event loop. Each client message is one popup or quiz-page
//! event; the reply is the sequence of UI effects that event produced, one JSON
//! message per effect. Events on a socket are handled in arrival order.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};
use uuid::Uuid;

use crate::protocol::{ClientWsMessage, PopupView, ServerWsMessage};
use crate::logic::*;
use crate::quiz::QuizEffect;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "newslens", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state), fields(session = %Uuid::new_v4()))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "newslens", "WebSocket connected");
  'events: while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let replies = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "newslens", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => vec![ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }],
        };

        for reply in replies {
          let out = serde_json::to_string(&reply).unwrap_or_else(|e| {
            serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
          });
          if let Err(e) = socket.send(Message::Text(out)).await {
            error!(target: "newslens", error = %e, "WS send error");
            break 'events;
          }
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "newslens", "WebSocket disconnected");
}

#[instrument(level = "info", skip_all)]
pub(crate) async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> Vec<ServerWsMessage> {
  match msg {
    ClientWsMessage::Ping => vec![ServerWsMessage::Pong],

    ClientWsMessage::Analyze { text } => {
      let out = do_analyze(state, &text).await;
      info!(target: "popup", kind = out.result.message.kind(), "WS analyze served");
      out.shown.into_iter().map(popup_update).collect()
    }

    ClientWsMessage::OpenSite => vec![ServerWsMessage::OpenTab { url: do_open_site(state) }],

    ClientWsMessage::SubmitQuiz { forms } => {
      let out = do_submit_quiz(state, forms);
      let mut replies: Vec<ServerWsMessage> = out
        .forms
        .into_iter()
        .filter(|f| f.quiz)
        .take(1)
        .flat_map(|f| f.questions)
        .filter_map(|q| q.background.map(|background| ServerWsMessage::QuestionStyle { id: q.id, background }))
        .collect();
      replies.extend(out.effects.into_iter().map(|effect| match effect {
        QuizEffect::Alert { message } => ServerWsMessage::Alert { message },
        QuizEffect::Navigate { path } => ServerWsMessage::Navigate { path },
      }));
      replies
    }

    ClientWsMessage::GenerateQuiz { text } => vec![ServerWsMessage::Quiz { form: do_generate_quiz(&text) }],
  }
}

fn popup_update(view: PopupView) -> ServerWsMessage {
  ServerWsMessage::Popup { view }
}
