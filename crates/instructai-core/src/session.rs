//! Session state shared by the quiz and coding flows.
//!
//! A [`Session`] owns the generated questions and the learner's progress
//! through them. [`FlowState`] is the wizard state the owning controller is
//! in:
//!
//! - `Idle` -> `Generating` -> `Ready` (or back on failure)
//! - `Ready` -> `Evaluating` -> `Evaluated` (or `Ready` on failure)
//! - `Evaluated` -> `Ready` on advance, or `Complete` once the last question
//!   has been evaluated
//! - `Evaluated` and `Complete` -> `Evaluating` on resubmission

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a flow controller is in the assessment wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    /// Nothing generated yet.
    #[default]
    Idle,
    /// Waiting for the service to generate questions.
    Generating,
    /// A question is shown and awaits an answer.
    Ready,
    /// Waiting for the service to grade an answer.
    Evaluating,
    /// The current answer has been graded.
    Evaluated,
    /// The last question has been graded.
    Complete,
}

impl FlowState {
    /// Returns `true` while a service call is outstanding.
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Generating | Self::Evaluating)
    }

    /// Returns `true` once the last question has been graded.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowState::Idle => "idle",
            FlowState::Generating => "generating",
            FlowState::Ready => "ready",
            FlowState::Evaluating => "evaluating",
            FlowState::Evaluated => "evaluated",
            FlowState::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Generated questions plus the learner's position in them.
///
/// Invariant: `current_index < questions.len()`, and `questions` is never
/// empty or reordered.
#[derive(Debug, Clone, PartialEq)]
pub struct Session<Q, E> {
    questions: Vec<Q>,
    current_index: usize,
    current_answer: String,
    last_evaluation: Option<E>,
}

impl<Q, E> Session<Q, E> {
    /// Start a session at the first question. Returns `None` for an empty
    /// question set.
    pub fn new(questions: Vec<Q>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            questions,
            current_index: 0,
            current_answer: String::new(),
            last_evaluation: None,
        })
    }

    pub fn questions(&self) -> &[Q] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Q {
        &self.questions[self.current_index]
    }

    pub fn current_answer(&self) -> &str {
        &self.current_answer
    }

    pub fn last_evaluation(&self) -> Option<&E> {
        self.last_evaluation.as_ref()
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    pub(crate) fn set_answer(&mut self, answer: String) {
        self.current_answer = answer;
    }

    pub(crate) fn set_evaluation(&mut self, evaluation: E) {
        self.last_evaluation = Some(evaluation);
    }

    pub(crate) fn clear_evaluation(&mut self) {
        self.last_evaluation = None;
    }

    /// Move to the next question, resetting the answer and evaluation.
    /// Returns `false` (and changes nothing) at the last question.
    pub(crate) fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current_index += 1;
        self.current_answer.clear();
        self.last_evaluation = None;
        true
    }
}
