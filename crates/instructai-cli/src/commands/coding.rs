//! The `instructai coding` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use instructai_client::{create_service, load_config_from};
use instructai_core::model::{
    CodingConfig, CodingEvaluation, CodingQuestion, Difficulty, ProgrammingLanguage,
};
use instructai_core::{CodingFlow, FlowState};

use crate::prompt::Prompter;
use crate::ServiceArgs;

const END_OF_CODE: &str = ":end";

pub async fn execute(
    language: Option<String>,
    difficulty: Option<String>,
    topic: String,
    count: i64,
    output: Option<PathBuf>,
    service: ServiceArgs,
) -> Result<()> {
    let settings = load_config_from(service.config.as_deref())?;
    let language = match language {
        Some(raw) => raw.parse::<ProgrammingLanguage>()?,
        None => settings.default_language,
    };
    let difficulty = match difficulty {
        Some(raw) => raw.parse::<Difficulty>()?,
        None => settings.default_difficulty,
    };
    let config = CodingConfig {
        language,
        difficulty,
        topic,
        question_count: super::question_count(count),
    };

    let mut flow = CodingFlow::new(create_service(&settings, service.mock)?);
    println!(
        "Generating {} {difficulty} {language} exercise(s)...",
        config.question_count
    );
    flow.configure(config);
    flow.generate_pending()
        .await
        .context("could not generate coding questions")?;

    run(&mut flow, &mut Prompter::stdin()).await?;

    let Some(transcript) = flow.transcript() else {
        return Ok(());
    };
    let latest = transcript.latest_per_question();
    let passed = latest.iter().filter(|e| e.grade == "passed").count();
    println!(
        "\nSolved {passed} of {} exercise(s) ({} submitted)",
        transcript.question_count,
        latest.len()
    );
    if let Some(path) = output {
        transcript.save_json(&path)?;
        tracing::debug!(
            id = %transcript.id,
            entries = transcript.entries.len(),
            "saved transcript"
        );
        println!("Transcript written to {}", path.display());
    }
    Ok(())
}

async fn run<R>(flow: &mut CodingFlow, prompter: &mut Prompter<R>) -> Result<()>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut shown = None;
    loop {
        let Some(session) = flow.session() else {
            return Ok(());
        };
        let index = session.current_index();
        if shown != Some(index) {
            print_exercise(session.current_question(), index, session.len());
            shown = Some(index);
        }

        let prompt = match flow.state() {
            FlowState::Evaluated => "Submit again, or press Enter for the next exercise > ",
            FlowState::Complete => "Submit again, or press Enter to finish > ",
            _ => "Code (finish with :end, or :file <path>, :hint, :quit) > ",
        };
        let Some(line) = prompter.ask(prompt).await? else {
            println!();
            return Ok(());
        };

        let code = match line.trim() {
            ":quit" | ":q" => return Ok(()),
            "" | ":next" if flow.state().is_terminal() => return Ok(()),
            ":next" => {
                if let Err(e) = flow.advance() {
                    println!("{e}");
                }
                continue;
            }
            "" if flow.state() == FlowState::Evaluated => {
                if let Err(e) = flow.advance() {
                    println!("{e}");
                }
                continue;
            }
            "" => continue,
            ":hint" => {
                print_hints(session.current_question());
                continue;
            }
            trimmed if trimmed.starts_with(":file ") => {
                let path = Path::new(trimmed.trim_start_matches(":file ").trim());
                match std::fs::read_to_string(path) {
                    Ok(code) => code,
                    Err(e) => {
                        println!("Could not read {}: {e}", path.display());
                        continue;
                    }
                }
            }
            END_OF_CODE => String::new(),
            _ => {
                let Some(rest) = prompter.read_block(END_OF_CODE).await? else {
                    println!("\nInput ended before {END_OF_CODE}; submission discarded.");
                    return Ok(());
                };
                if rest.is_empty() {
                    line
                } else {
                    format!("{line}\n{rest}")
                }
            }
        };

        println!("Evaluating...");
        match flow.submit_code(&code).await {
            Ok(evaluation) => {
                print_evaluation(&evaluation);
                if flow.state().is_terminal() {
                    println!("\nAll exercises submitted.");
                }
            }
            Err(e) if e.is_validation() => println!("{e}"),
            Err(e) => println!("Evaluation failed: {e}. You can submit again."),
        }
    }
}

fn print_exercise(question: &CodingQuestion, index: usize, total: usize) {
    println!("\nExercise {} of {total}: {}", index + 1, question.title);
    match &question.difficulty.explanation {
        Some(explanation) => println!("Difficulty: {} ({explanation})", question.difficulty.level),
        None => println!("Difficulty: {}", question.difficulty.level),
    }
    println!("\n{}\n", question.description);
    println!("Signature: {}", question.function_signature);
    for (i, case) in question.test_cases.iter().enumerate() {
        println!(
            "  Example {}: {} -> {}",
            i + 1,
            serde_json::Value::Object(case.input.clone()),
            case.expected
        );
    }
}

fn print_hints(question: &CodingQuestion) {
    match question.hints.as_deref() {
        Some(hints) if !hints.is_empty() => {
            for hint in hints {
                println!("  Hint: {hint}");
            }
        }
        _ => println!("No hints for this exercise."),
    }
}

fn print_evaluation(evaluation: &CodingEvaluation) {
    println!(
        "Passed: {}  Score: {:.0}  Tests: {}/{}",
        if evaluation.passed { "yes" } else { "no" },
        evaluation.score,
        evaluation.tests_passed(),
        evaluation.test_results.len()
    );

    if !evaluation.test_results.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["#", "Result", "Input", "Expected", "Actual"]);
        for (i, outcome) in evaluation.test_results.iter().enumerate() {
            let actual = match &outcome.error {
                Some(error) => format!("error: {error}"),
                None => outcome.actual.to_string(),
            };
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(if outcome.passed { "PASS" } else { "FAIL" }),
                Cell::new(&outcome.input),
                Cell::new(&outcome.expected),
                Cell::new(actual),
            ]);
        }
        println!("{table}");
    }

    println!("Feedback: {}", evaluation.feedback);
    if let Some(analysis) = &evaluation.time_complexity_analysis {
        println!("Time complexity: {analysis}");
    }
    if let Some(analysis) = &evaluation.space_complexity_analysis {
        println!("Space complexity: {analysis}");
    }
    if let Some(quality) = &evaluation.code_quality_feedback {
        println!("Code quality: {quality}");
    }
    for suggestion in evaluation.improvement_suggestions.iter().flatten() {
        println!("  - {suggestion}");
    }
}
