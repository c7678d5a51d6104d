pub mod coding;
pub mod init;
pub mod questions;
pub mod quiz;

use anyhow::Result;

use instructai_client::InstructConfig;
use instructai_core::model::{AssessmentConfig, QuestionCount, QuestionType};

/// Clamp a requested question count into range, telling the user if it moved.
fn question_count(requested: i64) -> QuestionCount {
    let count = QuestionCount::clamped(requested);
    if i64::from(count.get()) != requested {
        eprintln!(
            "Question count must be between {} and {}; using {count}.",
            QuestionCount::MIN,
            QuestionCount::MAX
        );
    }
    count
}

/// Build a quiz configuration from command-line flags, falling back to the
/// configured defaults.
fn assessment_config(
    settings: &InstructConfig,
    subject: Option<String>,
    topic: String,
    question_type: Option<String>,
    count: i64,
) -> Result<AssessmentConfig> {
    let question_type = match question_type {
        Some(raw) => raw.parse::<QuestionType>()?,
        None => settings.default_question_type,
    };
    Ok(AssessmentConfig {
        subject: subject.unwrap_or_else(|| settings.default_subject.clone()),
        topic,
        question_type,
        question_count: question_count(count),
    })
}
