//! Quiz flow controller.
//!
//! Drives one learner through configure -> generate -> answer -> submit ->
//! review -> advance, delegating generation and grading to an
//! [`AssessmentService`]. The controller is the only owner of its
//! [`QuizSession`]; the `&mut self` receivers keep a controller from running
//! two operations at once.

use std::sync::Arc;

use crate::error::{FlowError, ServiceError, ValidationError};
use crate::model::{AssessmentConfig, Evaluation, Question};
use crate::session::{FlowState, Session};
use crate::traits::{AssessmentService, EvaluateAnswerRequest, GenerateQuestionsRequest};
use crate::transcript::{AssessmentKind, Transcript};

pub type QuizSession = Session<Question, Evaluation>;

/// State machine for a multiple-choice or subjective quiz.
pub struct AssessmentFlow {
    service: Arc<dyn AssessmentService>,
    state: FlowState,
    pending: Option<AssessmentConfig>,
    config: Option<AssessmentConfig>,
    session: Option<QuizSession>,
    transcript: Option<Transcript>,
}

impl AssessmentFlow {
    pub fn new(service: Arc<dyn AssessmentService>) -> Self {
        Self {
            service,
            state: FlowState::Idle,
            pending: None,
            config: None,
            session: None,
            transcript: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    /// Configuration the current session was generated from.
    pub fn config(&self) -> Option<&AssessmentConfig> {
        self.config.as_ref()
    }

    /// Configuration stored by the last `configure` or `generate`.
    pub fn pending_config(&self) -> Option<&AssessmentConfig> {
        self.pending.as_ref()
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.as_ref()
    }

    /// Store the configuration to generate from. No service call is made.
    pub fn configure(&mut self, config: AssessmentConfig) {
        self.pending = Some(config);
    }

    /// Generate a fresh question set from the pending configuration.
    pub async fn generate_pending(&mut self) -> Result<(), FlowError> {
        let config = self.pending.clone().ok_or(FlowError::InvalidTransition {
            state: self.state,
            action: "generate before configuring",
        })?;
        self.generate(config).await
    }

    /// Ask the service for a new question set.
    ///
    /// On success the previous session is replaced by one positioned at the
    /// first question. On failure the previous session and state are kept.
    pub async fn generate(&mut self, config: AssessmentConfig) -> Result<(), FlowError> {
        if self.state.is_busy() {
            return Err(FlowError::Busy(self.state));
        }

        let prior = self.state;
        self.pending = Some(config.clone());
        self.transition(FlowState::Generating);

        let request = GenerateQuestionsRequest::from(&config);
        let result = self.service.generate_questions(&request).await;

        let questions = match result {
            Ok(questions) => questions,
            Err(e) => {
                tracing::warn!(service = self.service.name(), "question generation failed: {e:#}");
                self.transition(prior);
                return Err(FlowError::Service(e));
            }
        };

        let count = questions.len();
        let Some(session) = Session::new(questions) else {
            tracing::warn!(service = self.service.name(), "service returned no questions");
            self.transition(prior);
            return Err(FlowError::Service(
                ServiceError::InvalidResponse("no questions generated".into()).into(),
            ));
        };

        tracing::info!(
            topic = %config.topic,
            question_type = %config.question_type,
            count,
            "generated question set"
        );
        self.transcript = Some(Transcript::new(
            AssessmentKind::Quiz {
                config: config.clone(),
            },
            count,
        ));
        self.config = Some(config);
        self.session = Some(session);
        self.transition(FlowState::Ready);
        Ok(())
    }

    /// Submit an answer to the current question for grading.
    ///
    /// Blank answers are rejected without contacting the service. A graded
    /// answer can be resubmitted, including on the last question once the
    /// flow is `Complete`. A failed call leaves the question unevaluated and
    /// the flow `Ready`.
    pub async fn submit_answer(&mut self, answer: &str) -> Result<Evaluation, FlowError> {
        if self.state.is_busy() {
            return Err(FlowError::Busy(self.state));
        }
        let session = self.session.as_mut().ok_or(FlowError::NoSession)?;
        if !matches!(
            self.state,
            FlowState::Ready | FlowState::Evaluated | FlowState::Complete
        ) {
            return Err(FlowError::InvalidTransition {
                state: self.state,
                action: "submit an answer",
            });
        }
        if answer.trim().is_empty() {
            return Err(ValidationError::EmptyAnswer.into());
        }

        session.set_answer(answer.to_string());
        session.clear_evaluation();
        let index = session.current_index();
        let request = EvaluateAnswerRequest::new(session.current_question(), answer);
        self.transition(FlowState::Evaluating);

        let result = self.service.evaluate_answer(&request).await;
        let session = self.session.as_mut().ok_or(FlowError::NoSession)?;

        match result {
            Ok(evaluation) => {
                session.set_evaluation(evaluation.clone());
                let next = if session.is_last() {
                    FlowState::Complete
                } else {
                    FlowState::Evaluated
                };
                if let Some(transcript) = self.transcript.as_mut() {
                    transcript.record_quiz(index, &request.question, answer, &evaluation);
                }
                tracing::debug!(index, grade = %evaluation.grade, "answer evaluated");
                self.transition(next);
                Ok(evaluation)
            }
            Err(e) => {
                tracing::warn!(service = self.service.name(), index, "answer evaluation failed: {e:#}");
                self.transition(FlowState::Ready);
                Err(FlowError::Service(e))
            }
        }
    }

    /// Move to the next question once the current one has been graded.
    pub fn advance(&mut self) -> Result<(), FlowError> {
        if self.state.is_busy() {
            return Err(FlowError::Busy(self.state));
        }
        let session = self.session.as_mut().ok_or(FlowError::NoSession)?;
        if session.is_last() {
            return Err(FlowError::AtLastQuestion);
        }
        if self.state != FlowState::Evaluated {
            return Err(FlowError::InvalidTransition {
                state: self.state,
                action: "advance",
            });
        }
        session.advance();
        self.transition(FlowState::Ready);
        Ok(())
    }

    fn transition(&mut self, next: FlowState) {
        tracing::debug!(from = %self.state, to = %next, "quiz flow transition");
        self.state = next;
    }
}
