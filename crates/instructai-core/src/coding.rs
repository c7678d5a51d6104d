//! Coding exercise flow controller.

use std::sync::Arc;

use crate::error::{FlowError, ServiceError, ValidationError};
use crate::model::{CodingConfig, CodingEvaluation, CodingQuestion};
use crate::session::{FlowState, Session};
use crate::traits::{AssessmentService, EvaluateCodingAnswerRequest, GenerateCodingQuestionsRequest};
use crate::transcript::{AssessmentKind, Transcript};

pub type CodingSession = Session<CodingQuestion, CodingEvaluation>;

/// Same wizard as [`AssessmentFlow`](crate::flow::AssessmentFlow), but the
/// answer is source code and the grade is a structured test report.
pub struct CodingFlow {
    service: Arc<dyn AssessmentService>,
    state: FlowState,
    pending: Option<CodingConfig>,
    config: Option<CodingConfig>,
    session: Option<CodingSession>,
    transcript: Option<Transcript>,
}

impl CodingFlow {
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

    pub fn session(&self) -> Option<&CodingSession> {
        self.session.as_ref()
    }

    pub fn config(&self) -> Option<&CodingConfig> {
        self.config.as_ref()
    }

    pub fn pending_config(&self) -> Option<&CodingConfig> {
        self.pending.as_ref()
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.as_ref()
    }

    pub fn configure(&mut self, config: CodingConfig) {
        self.pending = Some(config);
    }

    pub async fn generate_pending(&mut self) -> Result<(), FlowError> {
        let config = self.pending.clone().ok_or(FlowError::InvalidTransition {
            state: self.state,
            action: "generate before configuring",
        })?;
        self.generate(config).await
    }

    pub async fn generate(&mut self, config: CodingConfig) -> Result<(), FlowError> {
        if self.state.is_busy() {
            return Err(FlowError::Busy(self.state));
        }

        let prior = self.state;
        self.pending = Some(config.clone());
        self.transition(FlowState::Generating);

        let request = GenerateCodingQuestionsRequest::from(&config);
        let questions = match self.service.generate_coding_questions(&request).await {
            Ok(questions) => questions,
            Err(e) => {
                tracing::warn!(
                    service = self.service.name(),
                    language = config.language.id(),
                    "coding question generation failed: {e:#}"
                );
                self.transition(prior);
                return Err(FlowError::Service(e));
            }
        };

        let count = questions.len();
        let Some(session) = Session::new(questions) else {
            self.transition(prior);
            return Err(FlowError::Service(
                ServiceError::InvalidResponse("no coding questions generated".into()).into(),
            ));
        };

        tracing::info!(
            language = config.language.id(),
            difficulty = %config.difficulty,
            count,
            "generated coding questions"
        );
        self.transcript = Some(Transcript::new(
            AssessmentKind::Coding {
                config: config.clone(),
            },
            count,
        ));
        self.config = Some(config);
        self.session = Some(session);
        self.transition(FlowState::Ready);
        Ok(())
    }

    /// Submit source code for the current question. Graded code can be
    /// resubmitted, on the last question too.
    pub async fn submit_code(&mut self, code: &str) -> Result<CodingEvaluation, FlowError> {
        if self.state.is_busy() {
            return Err(FlowError::Busy(self.state));
        }
        let session = self.session.as_mut().ok_or(FlowError::NoSession)?;
        let language = self
            .config
            .as_ref()
            .map(|c| c.language)
            .ok_or(FlowError::NoSession)?;
        if !matches!(
            self.state,
            FlowState::Ready | FlowState::Evaluated | FlowState::Complete
        ) {
            return Err(FlowError::InvalidTransition {
                state: self.state,
                action: "submit code",
            });
        }
        if code.trim().is_empty() {
            return Err(ValidationError::EmptyAnswer.into());
        }

        session.set_answer(code.to_string());
        session.clear_evaluation();
        let index = session.current_index();
        let request = EvaluateCodingAnswerRequest {
            question: session.current_question().clone(),
            user_code: code.to_string(),
            programming_language: language,
        };
        self.transition(FlowState::Evaluating);

        let result = self.service.evaluate_coding_answer(&request).await;
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
                    transcript.record_coding(index, &request.question.title, code, &evaluation);
                }
                tracing::debug!(
                    index,
                    passed = evaluation.passed,
                    score = evaluation.score,
                    "code evaluated"
                );
                self.transition(next);
                Ok(evaluation)
            }
            Err(e) => {
                tracing::warn!(service = self.service.name(), index, "code evaluation failed: {e:#}");
                self.transition(FlowState::Ready);
                Err(FlowError::Service(e))
            }
        }
    }

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
        tracing::debug!(from = %self.state, to = %next, "coding flow transition");
        self.state = next;
    }
}
