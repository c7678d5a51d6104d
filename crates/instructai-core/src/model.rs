//! Core data model types for instructai.
//!
//! Quiz questions, coding exercises, their configurations, and the
//! evaluations the grading service returns for them. The serde forms of
//! these types are the JSON wire format of the service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Question count
// ---------------------------------------------------------------------------

/// Number of questions to request, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct QuestionCount(u8);

impl QuestionCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validate a raw count.
    pub fn new(count: i64) -> Result<Self, ValidationError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&count) {
            Ok(Self(count as u8))
        } else {
            Err(ValidationError::QuestionCount {
                got: count,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// Clamp a raw count into range, the way a bounded numeric input does.
    pub fn clamped(count: i64) -> Self {
        Self(count.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for QuestionCount {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<i64> for QuestionCount {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QuestionCount> for u8 {
    fn from(count: QuestionCount) -> Self {
        count.0
    }
}

impl fmt::Display for QuestionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Quiz questions
// ---------------------------------------------------------------------------

/// Kind of quiz question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    #[default]
    #[serde(rename = "MCQ", alias = "mcq")]
    Mcq,
    #[serde(rename = "Subjective", alias = "subjective")]
    Subjective,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Mcq => write!(f, "MCQ"),
            QuestionType::Subjective => write!(f, "Subjective"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mcq" | "multiple-choice" => Ok(QuestionType::Mcq),
            "subjective" => Ok(QuestionType::Subjective),
            _ => Err(ValidationError::UnknownQuestionType(s.to_string())),
        }
    }
}

/// User choices for a quiz. Fixed once a generation request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Subject area (e.g. "python", "web dev", "databases").
    pub subject: String,
    /// Topic within the subject.
    pub topic: String,
    pub question_type: QuestionType,
    pub question_count: QuestionCount,
}

/// How a question is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerFormat {
    /// Pick one of an ordered set of candidate answers.
    MultipleChoice { options: Vec<String> },
    /// Free text, graded against the reference answer.
    FreeText,
}

/// A generated quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionWire", into = "QuestionWire")]
pub struct Question {
    pub prompt: String,
    pub format: AnswerFormat,
    pub reference_answer: String,
}

impl Question {
    pub fn multiple_choice(
        prompt: impl Into<String>,
        options: Vec<String>,
        reference_answer: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            format: AnswerFormat::MultipleChoice { options },
            reference_answer: reference_answer.into(),
        }
    }

    pub fn subjective(prompt: impl Into<String>, reference_answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            format: AnswerFormat::FreeText,
            reference_answer: reference_answer.into(),
        }
    }

    pub fn kind(&self) -> QuestionType {
        match self.format {
            AnswerFormat::MultipleChoice { .. } => QuestionType::Mcq,
            AnswerFormat::FreeText => QuestionType::Subjective,
        }
    }

    /// Candidate answers; `None` for subjective questions.
    pub fn options(&self) -> Option<&[String]> {
        match &self.format {
            AnswerFormat::MultipleChoice { options } => Some(options),
            AnswerFormat::FreeText => None,
        }
    }

    /// Map raw user input onto an answer.
    ///
    /// For multiple choice, accepts the option text (case-insensitive) or,
    /// when no option reads that way, a 1-based option number, and returns
    /// the option text. Free-text input is returned unchanged.
    pub fn resolve_choice(&self, input: &str) -> Result<String, ValidationError> {
        let Some(options) = self.options() else {
            return Ok(input.to_string());
        };

        let trimmed = input.trim();
        if let Some(option) = options
            .iter()
            .find(|o| o.trim().eq_ignore_ascii_case(trimmed))
        {
            return Ok(option.clone());
        }

        trimmed
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| options.get(i))
            .cloned()
            .ok_or_else(|| ValidationError::UnknownOption {
                input: trimmed.to_string(),
                count: options.len(),
            })
    }
}

/// Wire form of a question: `{type?, question, options?, model_answer}`.
///
/// `correct_answer` is accepted as a synonym of `model_answer`, and a
/// missing `type` is inferred from the presence of options.
#[derive(Serialize, Deserialize)]
struct QuestionWire {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<QuestionType>,
    question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(alias = "correct_answer")]
    model_answer: String,
}

impl TryFrom<QuestionWire> for Question {
    type Error = String;

    fn try_from(wire: QuestionWire) -> Result<Self, Self::Error> {
        let options = wire.options.filter(|o| !o.is_empty());
        let kind = wire.kind.unwrap_or(if options.is_some() {
            QuestionType::Mcq
        } else {
            QuestionType::Subjective
        });

        let format = match (kind, options) {
            (QuestionType::Mcq, Some(options)) => AnswerFormat::MultipleChoice { options },
            (QuestionType::Mcq, None) => {
                return Err(format!("MCQ question has no options: {}", wire.question))
            }
            (QuestionType::Subjective, None) => AnswerFormat::FreeText,
            (QuestionType::Subjective, Some(_)) => {
                return Err(format!(
                    "subjective question must not carry options: {}",
                    wire.question
                ))
            }
        };

        Ok(Question {
            prompt: wire.question,
            format,
            reference_answer: wire.model_answer,
        })
    }
}

impl From<Question> for QuestionWire {
    fn from(q: Question) -> Self {
        let kind = q.kind();
        let options = match q.format {
            AnswerFormat::MultipleChoice { options } => Some(options),
            AnswerFormat::FreeText => None,
        };
        QuestionWire {
            kind: Some(kind),
            question: q.prompt,
            options,
            model_answer: q.reference_answer,
        }
    }
}

/// Graded result of a submitted quiz answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub grade: String,
    pub feedback: String,
}

// ---------------------------------------------------------------------------
// Coding exercises
// ---------------------------------------------------------------------------

/// Languages the coding service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgrammingLanguage {
    Python,
    JavaScript,
    Java,
    #[serde(alias = "c++")]
    Cpp,
    C,
    #[serde(alias = "c#")]
    CSharp,
}

impl ProgrammingLanguage {
    /// Identifier sent over the wire.
    pub fn id(self) -> &'static str {
        match self {
            ProgrammingLanguage::Python => "python",
            ProgrammingLanguage::JavaScript => "javascript",
            ProgrammingLanguage::Java => "java",
            ProgrammingLanguage::Cpp => "cpp",
            ProgrammingLanguage::C => "c",
            ProgrammingLanguage::CSharp => "csharp",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ProgrammingLanguage::Python => "Python",
            ProgrammingLanguage::JavaScript => "JavaScript",
            ProgrammingLanguage::Java => "Java",
            ProgrammingLanguage::Cpp => "C++",
            ProgrammingLanguage::C => "C",
            ProgrammingLanguage::CSharp => "C#",
        }
    }
}

impl fmt::Display for ProgrammingLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProgrammingLanguage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "python" => Ok(ProgrammingLanguage::Python),
            "javascript" => Ok(ProgrammingLanguage::JavaScript),
            "java" => Ok(ProgrammingLanguage::Java),
            "cpp" | "c++" => Ok(ProgrammingLanguage::Cpp),
            "c" => Ok(ProgrammingLanguage::C),
            "csharp" | "c#" => Ok(ProgrammingLanguage::CSharp),
            _ => Err(ValidationError::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Difficulty of a coding exercise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ValidationError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// User choices for a coding session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingConfig {
    pub language: ProgrammingLanguage,
    pub difficulty: Difficulty,
    /// Optional focus topic; empty means "any".
    #[serde(default)]
    pub topic: String,
    pub question_count: QuestionCount,
}

/// Difficulty as reported on a generated question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DifficultyWire")]
pub struct DifficultyInfo {
    pub level: String,
    pub explanation: Option<String>,
}

impl DifficultyInfo {
    /// The level as a known difficulty, if it is one.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.level.parse().ok()
    }
}

/// The service sometimes reports difficulty as a bare string.
#[derive(Deserialize)]
#[serde(untagged)]
enum DifficultyWire {
    Level(String),
    Detailed {
        level: String,
        #[serde(default)]
        explanation: Option<String>,
    },
}

impl From<DifficultyWire> for DifficultyInfo {
    fn from(wire: DifficultyWire) -> Self {
        match wire {
            DifficultyWire::Level(level) => DifficultyInfo {
                level,
                explanation: None,
            },
            DifficultyWire::Detailed { level, explanation } => {
                DifficultyInfo { level, explanation }
            }
        }
    }
}

/// One example input/output pair of a coding question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Named function arguments.
    pub input: serde_json::Map<String, serde_json::Value>,
    pub expected: serde_json::Value,
}

/// A generated coding exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodingQuestion {
    pub title: String,
    pub difficulty: DifficultyInfo,
    pub description: String,
    pub function_signature: String,
    pub test_cases: Vec<TestCase>,
    pub solution: String,
    pub time_complexity: String,
    pub space_complexity: String,
    #[serde(default)]
    pub hints: Option<Vec<String>>,
    #[serde(default)]
    pub learning_points: Vec<String>,
}

/// Result of one test case against submitted code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub input: serde_json::Value,
    #[serde(default)]
    pub expected: serde_json::Value,
    #[serde(default)]
    pub actual: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Graded result of submitted code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodingEvaluation {
    pub passed: bool,
    pub test_results: Vec<TestOutcome>,
    pub feedback: String,
    pub score: f64,
    pub difficulty_appropriate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_complexity_analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_complexity_analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_quality_feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvement_suggestions: Option<Vec<String>>,
}

impl CodingEvaluation {
    /// Number of passing test cases.
    pub fn tests_passed(&self) -> usize {
        self.test_results.iter().filter(|t| t.passed).count()
    }
}
