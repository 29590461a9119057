//! Quiz Scorer: grade a quiz form client-side, paint each question block, report, redirect.
//!
//! A submission is one atomic grade-then-navigate action: block backgrounds are
//! written in document order, then the host gets exactly one alert followed by
//! exactly one navigation.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::QuizCfg;
use crate::domain::{QuestionBlock, QuizForm, Score};
use crate::util::fill_template;

/// Page-level capabilities the scorer needs from its host.
pub trait QuizHost {
  /// Blocking notification shown to the user.
  fn alert(&mut self, message: &str);
  /// Client-side redirect.
  fn navigate(&mut self, path: &str);
}

/// The form's submit event. The scorer always cancels the default action.
#[derive(Debug, Default)]
pub struct SubmitEvent {
  default_prevented: bool,
}

impl SubmitEvent {
  pub fn prevent_default(&mut self) {
    self.default_prevented = true;
  }

  pub fn default_prevented(&self) -> bool {
    self.default_prevented
  }
}

/// Side effects a submission produced, in the order they happened.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizEffect {
  Alert { message: String },
  Navigate { path: String },
}

#[derive(Debug, Default)]
pub struct QuizRecorder {
  pub effects: Vec<QuizEffect>,
}

impl QuizHost for QuizRecorder {
  fn alert(&mut self, message: &str) {
    self.effects.push(QuizEffect::Alert { message: message.to_string() });
  }

  fn navigate(&mut self, path: &str) {
    self.effects.push(QuizEffect::Navigate { path: path.to_string() });
  }
}

/// A scorer bound to the page's quiz form.
pub struct QuizScorer<'a> {
  form: &'a mut QuizForm,
  settings: &'a QuizCfg,
}

impl<'a> QuizScorer<'a> {
  /// Bind to the first form flagged as a quiz. `None` means the page has no quiz
  /// and the scorer stays inactive.
  pub fn attach(forms: &'a mut [QuizForm], settings: &'a QuizCfg) -> Option<Self> {
    let form = forms.iter_mut().find(|f| f.quiz)?;
    Some(Self { form, settings })
  }

  /// Handle the form's submit event.
  #[instrument(level = "info", skip_all, fields(questions = self.form.questions.len()))]
  pub fn submit<H: QuizHost>(&mut self, event: &mut SubmitEvent, host: &mut H) -> Score {
    event.prevent_default();

    let score = grade(self.form, self.settings);

    let message = fill_template(&self.settings.alert_template, &[("score", &score.to_string())]);
    host.alert(&message);
    host.navigate(&self.settings.dashboard_path);
    score
  }
}

/// Grade every block in order, painting its background. Unanswered blocks and
/// blocks without an expected answer count as incorrect.
pub fn grade(form: &mut QuizForm, settings: &QuizCfg) -> Score {
  let mut score = 0u32;
  let mut correct = 0usize;
  for block in form.questions.iter_mut() {
    if is_correct(block) {
      score = score.saturating_add(settings.points_per_correct);
      correct += 1;
      block.background = Some(settings.correct_background.clone());
    } else {
      block.background = Some(settings.incorrect_background.clone());
    }
    debug!(target: "quiz", id = %block.id, background = ?block.background, "Question painted");
  }
  info!(target: "quiz", score, correct, total = form.questions.len(), "Quiz graded");
  Score(score)
}

fn is_correct(block: &QuestionBlock) -> bool {
  match (block.selected(), block.answer.as_deref()) {
    (Some(choice), Some(expected)) => choice.value == expected,
    _ => false,
  }
}
