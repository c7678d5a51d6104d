//! The service boundary.
//!
//! Question generation and grading happen in a remote service. The flow
//! controllers only ever see it through [`AssessmentService`], which is
//! implemented by the HTTP client and the offline mock in
//! `instructai-client`.

use async_trait::async_trait;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::model::{
    AssessmentConfig, CodingConfig, CodingEvaluation, CodingQuestion, Difficulty, Evaluation,
    ProgrammingLanguage, Question, QuestionType,
};

/// A backend that generates questions and grades answers.
///
/// Errors are `anyhow::Error`s; implementations should produce
/// [`ServiceError`](crate::error::ServiceError)s so callers can downcast.
#[async_trait]
pub trait AssessmentService: Send + Sync {
    /// Human-readable backend name (e.g. "http", "mock").
    fn name(&self) -> &str;

    /// `POST /generate_questions`
    async fn generate_questions(
        &self,
        request: &GenerateQuestionsRequest,
    ) -> anyhow::Result<Vec<Question>>;

    /// `POST /evaluate_answer`
    async fn evaluate_answer(&self, request: &EvaluateAnswerRequest) -> anyhow::Result<Evaluation>;

    /// `POST /generate_coding_questions`
    async fn generate_coding_questions(
        &self,
        request: &GenerateCodingQuestionsRequest,
    ) -> anyhow::Result<Vec<CodingQuestion>>;

    /// `POST /evaluate_coding_answer`
    async fn evaluate_coding_answer(
        &self,
        request: &EvaluateCodingAnswerRequest,
    ) -> anyhow::Result<CodingEvaluation>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub topic: String,
    pub question_type: QuestionType,
    pub num_questions: u8,
}

impl From<&AssessmentConfig> for GenerateQuestionsRequest {
    fn from(config: &AssessmentConfig) -> Self {
        Self {
            topic: config.topic.clone(),
            question_type: config.question_type,
            num_questions: config.question_count.get(),
        }
    }
}

/// Body of `POST /evaluate_answer`.
///
/// The reference answer goes out under both `model_answer` and
/// `correct_answer`; graders read one or the other.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EvaluateAnswerRequest {
    /// The question prompt.
    pub question: String,
    pub user_answer: String,
    /// Reference answer the grader compares against.
    pub model_answer: String,
}

impl Serialize for EvaluateAnswerRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut body = serializer.serialize_struct("EvaluateAnswerRequest", 4)?;
        body.serialize_field("question", &self.question)?;
        body.serialize_field("user_answer", &self.user_answer)?;
        body.serialize_field("model_answer", &self.model_answer)?;
        body.serialize_field("correct_answer", &self.model_answer)?;
        body.end()
    }
}

impl EvaluateAnswerRequest {
    pub fn new(question: &Question, user_answer: &str) -> Self {
        Self {
            question: question.prompt.clone(),
            user_answer: user_answer.to_string(),
            model_answer: question.reference_answer.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateCodingQuestionsRequest {
    pub programming_language: ProgrammingLanguage,
    pub difficulty: Difficulty,
    pub topic: String,
    pub num_questions: u8,
}

impl From<&CodingConfig> for GenerateCodingQuestionsRequest {
    fn from(config: &CodingConfig) -> Self {
        Self {
            programming_language: config.language,
            difficulty: config.difficulty,
            topic: config.topic.clone(),
            num_questions: config.question_count.get(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateCodingAnswerRequest {
    /// The full question, test cases included.
    pub question: CodingQuestion,
    pub user_code: String,
    pub programming_language: ProgrammingLanguage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionCount;

    #[test]
    fn generate_request_wire_form() {
        let config = AssessmentConfig {
            subject: "python".into(),
            topic: "loops".into(),
            question_type: QuestionType::Subjective,
            question_count: QuestionCount::new(3).unwrap(),
        };
        let value = serde_json::to_value(GenerateQuestionsRequest::from(&config)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "topic": "loops",
                "question_type": "Subjective",
                "num_questions": 3
            })
        );
    }

    #[test]
    fn evaluate_request_carries_reference_answer() {
        let q = Question::multiple_choice(
            "What is the capital of France?",
            vec!["London".into(), "Paris".into()],
            "Paris",
        );
        let value = serde_json::to_value(EvaluateAnswerRequest::new(&q, "Paris")).unwrap();
        assert_eq!(value["question"], "What is the capital of France?");
        assert_eq!(value["user_answer"], "Paris");
        assert_eq!(value["model_answer"], "Paris");
        assert_eq!(value["correct_answer"], "Paris");
    }

    #[test]
    fn evaluate_request_reads_back_without_duplicate() {
        let request = EvaluateAnswerRequest {
            question: "What is 2 + 2?".into(),
            user_answer: "4".into(),
            model_answer: "4".into(),
        };
        let json = serde_json::to_string(&request).unwrap();
        let parsed: EvaluateAnswerRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn coding_request_uses_language_id() {
        let config = CodingConfig {
            language: ProgrammingLanguage::CSharp,
            difficulty: Difficulty::Hard,
            topic: "graphs".into(),
            question_count: QuestionCount::new(2).unwrap(),
        };
        let value = serde_json::to_value(GenerateCodingQuestionsRequest::from(&config)).unwrap();
        assert_eq!(value["programming_language"], "csharp");
        assert_eq!(value["difficulty"], "hard");
        assert_eq!(value["num_questions"], 2);
    }
}
