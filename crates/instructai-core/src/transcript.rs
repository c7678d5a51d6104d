//! Run transcripts with JSON persistence.
//!
//! A transcript records every successful evaluation made against one
//! generated question set, in the order they happened. Resubmissions add new
//! entries; nothing is ever removed.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AssessmentConfig, CodingConfig, CodingEvaluation, Evaluation};

/// Record of one generated question set and the answers graded against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Unique transcript identifier.
    pub id: Uuid,
    /// When the question set was generated.
    pub created_at: DateTime<Utc>,
    /// What was generated.
    pub assessment: AssessmentKind,
    /// Number of questions in the set.
    pub question_count: usize,
    /// Graded answers, oldest first.
    pub entries: Vec<TranscriptEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssessmentKind {
    Quiz { config: AssessmentConfig },
    Coding { config: CodingConfig },
}

/// One graded answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// 0-based question position.
    pub index: usize,
    pub prompt: String,
    pub answer: String,
    /// Letter grade for quizzes, "passed"/"failed" for code.
    pub grade: String,
    pub feedback: String,
    /// Numeric score, coding only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub evaluated_at: DateTime<Utc>,
}

impl Transcript {
    pub fn new(assessment: AssessmentKind, question_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            assessment,
            question_count,
            entries: Vec::new(),
        }
    }

    pub(crate) fn record_quiz(
        &mut self,
        index: usize,
        prompt: &str,
        answer: &str,
        evaluation: &Evaluation,
    ) {
        self.entries.push(TranscriptEntry {
            index,
            prompt: prompt.to_string(),
            answer: answer.to_string(),
            grade: evaluation.grade.clone(),
            feedback: evaluation.feedback.clone(),
            score: None,
            evaluated_at: Utc::now(),
        });
    }

    pub(crate) fn record_coding(
        &mut self,
        index: usize,
        title: &str,
        code: &str,
        evaluation: &CodingEvaluation,
    ) {
        let grade = if evaluation.passed { "passed" } else { "failed" };
        self.entries.push(TranscriptEntry {
            index,
            prompt: title.to_string(),
            answer: code.to_string(),
            grade: grade.to_string(),
            feedback: evaluation.feedback.clone(),
            score: Some(evaluation.score),
            evaluated_at: Utc::now(),
        });
    }

    /// The most recent entry for each question that has one, by position.
    pub fn latest_per_question(&self) -> Vec<&TranscriptEntry> {
        let mut latest: Vec<Option<&TranscriptEntry>> = vec![None; self.question_count];
        for entry in &self.entries {
            if let Some(slot) = latest.get_mut(entry.index) {
                *slot = Some(entry);
            }
        }
        latest.into_iter().flatten().collect()
    }

    /// Save the transcript as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("failed to serialize transcript")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write transcript to {}", path.display()))?;
        Ok(())
    }

    /// Load a transcript from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read transcript from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse transcript JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionCount, QuestionType};

    fn quiz_transcript() -> Transcript {
        Transcript::new(
            AssessmentKind::Quiz {
                config: AssessmentConfig {
                    subject: "python".into(),
                    topic: "loops".into(),
                    question_type: QuestionType::Mcq,
                    question_count: QuestionCount::new(2).unwrap(),
                },
            },
            2,
        )
    }

    fn eval(grade: &str) -> Evaluation {
        Evaluation {
            grade: grade.into(),
            feedback: "fb".into(),
        }
    }

    #[test]
    fn latest_entry_wins_per_question() {
        let mut t = quiz_transcript();
        t.record_quiz(0, "q1", "wrong", &eval("F"));
        t.record_quiz(0, "q1", "right", &eval("A"));
        t.record_quiz(1, "q2", "ok", &eval("B"));

        let latest = t.latest_per_question();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].grade, "A");
        assert_eq!(latest[1].grade, "B");
        assert_eq!(t.entries.len(), 3);
    }

    #[test]
    fn save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("transcript.json");

        let mut t = quiz_transcript();
        t.record_quiz(0, "What is 2 + 2?", "4", &eval("A"));
        t.save_json(&path).unwrap();

        let loaded = Transcript::load_json(&path).unwrap();
        assert_eq!(loaded.id, t.id);
        assert_eq!(loaded.entries.len(), 1);
        assert!(matches!(loaded.assessment, AssessmentKind::Quiz { .. }));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["assessment"]["kind"], "quiz");
        assert_eq!(raw["assessment"]["config"]["question_type"], "MCQ");
    }

    #[test]
    fn load_missing_file_fails() {
        let err = Transcript::load_json(Path::new("/nonexistent/transcript.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read transcript"));
    }
}
