//! Scripted service used by the flow controller tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::model::{
    CodingEvaluation, CodingQuestion, DifficultyInfo, Evaluation, Question, TestCase,
};
use crate::traits::{
    AssessmentService, EvaluateAnswerRequest, EvaluateCodingAnswerRequest,
    GenerateCodingQuestionsRequest, GenerateQuestionsRequest,
};

pub(crate) struct ScriptedService {
    pub questions: Mutex<Vec<Question>>,
    pub evaluation: Evaluation,
    pub coding_questions: Mutex<Vec<CodingQuestion>>,
    pub coding_evaluation: CodingEvaluation,
    /// Every call fails with a 500.
    pub fail: AtomicBool,
    /// Every call waits forever.
    pub hang: AtomicBool,
    pub calls: AtomicU32,
    pub last_evaluate: Mutex<Option<EvaluateAnswerRequest>>,
    pub last_coding_evaluate: Mutex<Option<EvaluateCodingAnswerRequest>>,
}

impl ScriptedService {
    pub fn new(questions: Vec<Question>, evaluation: Evaluation) -> Self {
        Self {
            questions: Mutex::new(questions),
            evaluation,
            coding_questions: Mutex::new(vec![
                coding_question("Two Sum"),
                coding_question("Reverse"),
            ]),
            coding_evaluation: CodingEvaluation {
                passed: true,
                test_results: vec![],
                feedback: "Looks good".into(),
                score: 90.0,
                difficulty_appropriate: true,
                time_complexity_analysis: None,
                space_complexity_analysis: None,
                code_quality_feedback: None,
                improvement_suggestions: None,
            },
            fail: AtomicBool::new(false),
            hang: AtomicBool::new(false),
            calls: AtomicU32::new(0),
            last_evaluate: Mutex::new(None),
            last_coding_evaluate: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    async fn enter(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Api {
                status: 500,
                message: "scripted failure".into(),
            }
            .into());
        }
        Ok(())
    }
}

pub(crate) fn coding_question(title: &str) -> CodingQuestion {
    CodingQuestion {
        title: title.into(),
        difficulty: DifficultyInfo {
            level: "easy".into(),
            explanation: None,
        },
        description: format!("{title} description"),
        function_signature: "def solve(nums):".into(),
        test_cases: vec![TestCase {
            input: serde_json::Map::from_iter([("nums".to_string(), serde_json::json!([1, 2]))]),
            expected: serde_json::json!(3),
        }],
        solution: "return sum(nums)".into(),
        time_complexity: "O(n)".into(),
        space_complexity: "O(1)".into(),
        hints: None,
        learning_points: vec![],
    }
}

pub(crate) fn capital_and_sum() -> Vec<Question> {
    vec![
        Question::multiple_choice(
            "What is the capital of France?",
            vec![
                "London".into(),
                "Berlin".into(),
                "Paris".into(),
                "Madrid".into(),
            ],
            "Paris",
        ),
        Question::multiple_choice(
            "What is 2 + 2?",
            vec!["3".into(), "4".into(), "5".into(), "6".into()],
            "4",
        ),
    ]
}

#[async_trait]
impl AssessmentService for ScriptedService {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate_questions(
        &self,
        _request: &GenerateQuestionsRequest,
    ) -> anyhow::Result<Vec<Question>> {
        self.enter().await?;
        Ok(self.questions.lock().unwrap().clone())
    }

    async fn evaluate_answer(&self, request: &EvaluateAnswerRequest) -> anyhow::Result<Evaluation> {
        self.enter().await?;
        *self.last_evaluate.lock().unwrap() = Some(request.clone());
        Ok(self.evaluation.clone())
    }

    async fn generate_coding_questions(
        &self,
        _request: &GenerateCodingQuestionsRequest,
    ) -> anyhow::Result<Vec<CodingQuestion>> {
        self.enter().await?;
        Ok(self.coding_questions.lock().unwrap().clone())
    }

    async fn evaluate_coding_answer(
        &self,
        request: &EvaluateCodingAnswerRequest,
    ) -> anyhow::Result<CodingEvaluation> {
        self.enter().await?;
        *self.last_coding_evaluate.lock().unwrap() = Some(request.clone());
        Ok(self.coding_evaluation.clone())
    }
}
