//! Offline service for demos and tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::Serialize;

use instructai_core::error::ServiceError;
use instructai_core::model::{
    CodingEvaluation, CodingQuestion, DifficultyInfo, Evaluation, Question, QuestionType,
    TestCase, TestOutcome,
};
use instructai_core::traits::{
    AssessmentService, EvaluateAnswerRequest, EvaluateCodingAnswerRequest,
    GenerateCodingQuestionsRequest, GenerateQuestionsRequest,
};

/// A canned stand-in for the generation/grading service.
///
/// Serves a fixed question bank, grades an answer "A" when it matches the
/// reference answer (ignoring case and surrounding whitespace) and "F"
/// otherwise, and echoes expected values back as passing test results for
/// code.
pub struct MockService {
    /// Number of calls made.
    call_count: AtomicU32,
    /// Endpoint and JSON body of the last call.
    last_request: Mutex<Option<(String, serde_json::Value)>>,
    /// When set, every call fails with a 503.
    failing: AtomicBool,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
            failing: AtomicBool::new(false),
        }
    }

    /// A mock whose every call fails.
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.failing.store(true, Ordering::Relaxed);
        mock
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Endpoint name and body of the last request made to this service.
    pub fn last_request(&self) -> Option<(String, serde_json::Value)> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record<T: Serialize>(&self, endpoint: &str, request: &T) -> Result<(), ServiceError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_value(request).unwrap_or(serde_json::Value::Null);
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some((endpoint.to_string(), body));

        if self.failing.load(Ordering::Relaxed) {
            return Err(ServiceError::Api {
                status: 503,
                message: "mock service unavailable".into(),
            });
        }
        Ok(())
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

fn mcq_bank() -> Vec<Question> {
    let mcq = |prompt: &str, options: &[&str], answer: &str| {
        Question::multiple_choice(
            prompt,
            options.iter().map(|o| o.to_string()).collect(),
            answer,
        )
    };
    vec![
        mcq(
            "What is the capital of France?",
            &["London", "Berlin", "Paris", "Madrid"],
            "Paris",
        ),
        mcq("What is 2 + 2?", &["3", "4", "5", "6"], "4"),
        mcq(
            "Which data structure serves items first-in, first-out?",
            &["Stack", "Queue", "Heap", "Tree"],
            "Queue",
        ),
        mcq(
            "What does HTTP status 404 mean?",
            &["OK", "Moved", "Not Found", "Server Error"],
            "Not Found",
        ),
        mcq(
            "Which SQL clause filters rows?",
            &["ORDER BY", "WHERE", "GROUP BY", "LIMIT"],
            "WHERE",
        ),
    ]
}

fn subjective_bank(topic: &str) -> Vec<Question> {
    let topic = if topic.trim().is_empty() {
        "this topic"
    } else {
        topic.trim()
    };
    vec![
        Question::subjective(
            format!("Explain the core idea behind {topic}."),
            format!("A concise explanation of {topic} and when it applies."),
        ),
        Question::subjective(
            format!("Give a small example that uses {topic}."),
            format!("A short, correct example using {topic}."),
        ),
        Question::subjective(
            format!("What is a common mistake when working with {topic}?"),
            format!("A typical pitfall with {topic} and how to avoid it."),
        ),
        Question::subjective(
            format!("Compare {topic} with an alternative approach."),
            format!("The trade-offs between {topic} and a comparable technique."),
        ),
        Question::subjective(
            format!("Describe a real-world problem where {topic} helps."),
            format!("A concrete scenario that {topic} solves well, with the reason."),
        ),
    ]
}

fn sum_pair_question(request: &GenerateCodingQuestionsRequest, n: usize) -> CodingQuestion {
    let topic = if request.topic.trim().is_empty() {
        "arrays".to_string()
    } else {
        request.topic.trim().to_string()
    };
    CodingQuestion {
        title: format!("Practice {n}: Find Target Sum Pair ({topic})"),
        difficulty: DifficultyInfo {
            level: request.difficulty.to_string(),
            explanation: Some("Basic array traversal".into()),
        },
        description: "Return the indices of the two numbers that add up to target.".into(),
        function_signature: format!(
            "find_pair(nums, target) in {}",
            request.programming_language.display_name()
        ),
        test_cases: vec![
            TestCase {
                input: serde_json::Map::from_iter([
                    ("nums".to_string(), serde_json::json!([1, 2, 3, 4, 5])),
                    ("target".to_string(), serde_json::json!(9)),
                ]),
                expected: serde_json::json!([3, 4]),
            },
            TestCase {
                input: serde_json::Map::from_iter([
                    ("nums".to_string(), serde_json::json!([2, 7])),
                    ("target".to_string(), serde_json::json!(9)),
                ]),
                expected: serde_json::json!([0, 1]),
            },
        ],
        solution: "Check every pair with two nested loops.".into(),
        time_complexity: "O(n^2)".into(),
        space_complexity: "O(1)".into(),
        hints: Some(vec!["Consider using nested loops".into()]),
        learning_points: vec!["Array traversal".into(), "Brute force approach".into()],
    }
}

#[async_trait]
impl AssessmentService for MockService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_questions(
        &self,
        request: &GenerateQuestionsRequest,
    ) -> anyhow::Result<Vec<Question>> {
        self.record("generate_questions", request)?;
        let bank = match request.question_type {
            QuestionType::Mcq => mcq_bank(),
            QuestionType::Subjective => subjective_bank(&request.topic),
        };
        Ok(bank
            .into_iter()
            .take(usize::from(request.num_questions))
            .collect())
    }

    async fn evaluate_answer(&self, request: &EvaluateAnswerRequest) -> anyhow::Result<Evaluation> {
        self.record("evaluate_answer", request)?;
        let correct = request
            .user_answer
            .trim()
            .eq_ignore_ascii_case(request.model_answer.trim());
        Ok(if correct {
            Evaluation {
                grade: "A".into(),
                feedback: "Correct".into(),
            }
        } else {
            Evaluation {
                grade: "F".into(),
                feedback: format!("Incorrect. Expected: {}", request.model_answer),
            }
        })
    }

    async fn generate_coding_questions(
        &self,
        request: &GenerateCodingQuestionsRequest,
    ) -> anyhow::Result<Vec<CodingQuestion>> {
        self.record("generate_coding_questions", request)?;
        Ok((1..=usize::from(request.num_questions))
            .map(|n| sum_pair_question(request, n))
            .collect())
    }

    async fn evaluate_coding_answer(
        &self,
        request: &EvaluateCodingAnswerRequest,
    ) -> anyhow::Result<CodingEvaluation> {
        self.record("evaluate_coding_answer", request)?;
        let test_results: Vec<TestOutcome> = request
            .question
            .test_cases
            .iter()
            .map(|tc| TestOutcome {
                passed: true,
                input: serde_json::Value::Object(tc.input.clone()),
                expected: tc.expected.clone(),
                actual: tc.expected.clone(),
                error: None,
            })
            .collect();
        Ok(CodingEvaluation {
            passed: true,
            test_results,
            feedback: "Mock evaluation: all test cases accepted.".into(),
            score: 100.0,
            difficulty_appropriate: true,
            time_complexity_analysis: Some(request.question.time_complexity.clone()),
            space_complexity_analysis: Some(request.question.space_complexity.clone()),
            code_quality_feedback: None,
            improvement_suggestions: None,
        })
    }
}
