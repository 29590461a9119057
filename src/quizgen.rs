//! Built-in quiz bank: a short multiple-choice quiz about an analyzed text.
//!
//! The bank is fixed; only the first question's answer depends on the text.
//! Question order is shuffled on every call.

use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::domain::{Choice, QuestionBlock, QuizForm};

#[derive(Clone, Debug, PartialEq)]
pub struct QuizItem {
  pub question: String,
  pub options: Vec<String>,
  pub answer: String,
}

fn item(question: &str, options: &[&str], answer: &str) -> QuizItem {
  QuizItem {
    question: question.into(),
    options: options.iter().map(|o| o.to_string()).collect(),
    answer: answer.into(),
  }
}

/// The three bank questions for `text`, unshuffled.
pub fn quiz_items(text: &str) -> Vec<QuizItem> {
  let news_type = if text.to_lowercase().contains("true") { "True" } else { "Fake" };
  vec![
    item("What type of news is this?", &["Fake", "True", "Unknown"], news_type),
    item("Is AI used in this news?", &["Yes", "No", "Maybe"], "Yes"),
    item("Should you trust the source?", &["Yes", "No", "Depends"], "Depends"),
  ]
}

impl From<QuizItem> for QuestionBlock {
  fn from(it: QuizItem) -> Self {
    QuestionBlock {
      id: format!("q-{}", Uuid::new_v4()),
      prompt: Some(it.question),
      answer: Some(it.answer),
      choices: it.options.into_iter().map(|value| Choice { value, checked: false }).collect(),
      background: None,
    }
  }
}

/// A quiz-flagged form with the bank questions in random order, nothing selected.
pub fn generate_quiz(text: &str) -> QuizForm {
  let mut items = quiz_items(text);
  items.shuffle(&mut rand::thread_rng());
  QuizForm {
    quiz: true,
    questions: items.into_iter().map(QuestionBlock::from).collect(),
  }
}
