//! The `instructai quiz` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use instructai_client::{create_service, load_config_from};
use instructai_core::model::{Evaluation, Question};
use instructai_core::transcript::Transcript;
use instructai_core::{AssessmentFlow, FlowState};

use crate::prompt::Prompter;
use crate::ServiceArgs;

pub async fn execute(
    subject: Option<String>,
    topic: String,
    question_type: Option<String>,
    count: i64,
    output: Option<PathBuf>,
    service: ServiceArgs,
) -> Result<()> {
    let settings = load_config_from(service.config.as_deref())?;
    let config = super::assessment_config(&settings, subject, topic, question_type, count)?;

    let mut flow = AssessmentFlow::new(create_service(&settings, service.mock)?);
    println!(
        "Generating {} {} question(s) on {}: {}...",
        config.question_count, config.question_type, config.subject, config.topic
    );
    flow.configure(config);
    flow.generate_pending()
        .await
        .context("could not generate questions")?;

    run(&mut flow, &mut Prompter::stdin()).await?;

    let Some(transcript) = flow.transcript() else {
        return Ok(());
    };
    print_summary(transcript);
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

/// Drive the flow from learner input until the learner finishes after the
/// last grade, quits, or input ends.
async fn run<R>(flow: &mut AssessmentFlow, prompter: &mut Prompter<R>) -> Result<()>
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
            print_question(session.current_question(), index, session.len());
            shown = Some(index);
        }

        let prompt = match flow.state() {
            FlowState::Evaluated => "Answer again, or press Enter for the next question > ",
            FlowState::Complete => "Answer again, or press Enter to finish > ",
            _ => "Your answer (:quit to stop) > ",
        };
        let Some(line) = prompter.ask(prompt).await? else {
            println!();
            return Ok(());
        };
        let input = line.trim();

        match input {
            ":quit" | ":q" => return Ok(()),
            "" | ":next" if flow.state().is_terminal() => return Ok(()),
            ":next" => {
                if let Err(e) = flow.advance() {
                    println!("{e}");
                }
            }
            "" if flow.state() == FlowState::Evaluated => {
                if let Err(e) = flow.advance() {
                    println!("{e}");
                }
            }
            _ => {
                // Blank input goes straight to the flow, which rejects it.
                let answer = if input.is_empty() {
                    String::new()
                } else {
                    match session.current_question().resolve_choice(input) {
                        Ok(answer) => answer,
                        Err(e) => {
                            println!("{e}");
                            continue;
                        }
                    }
                };
                match flow.submit_answer(&answer).await {
                    Ok(evaluation) => {
                        print_evaluation(&evaluation);
                        if flow.state().is_terminal() {
                            println!("\nAll questions answered.");
                        }
                    }
                    Err(e) if e.is_validation() => println!("{e}"),
                    Err(e) => println!("Evaluation failed: {e}. You can submit again."),
                }
            }
        }
    }
}

fn print_question(question: &Question, index: usize, total: usize) {
    println!("\nQuestion {} of {total}", index + 1);
    println!("{}", question.prompt);
    if let Some(options) = question.options() {
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }
    }
}

fn print_evaluation(evaluation: &Evaluation) {
    println!("Grade: {}", evaluation.grade);
    println!("Feedback: {}", evaluation.feedback);
}

fn print_summary(transcript: &Transcript) {
    let entries = transcript.latest_per_question();
    if entries.is_empty() {
        println!("No answers were graded.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Answer", "Grade", "Feedback"]);
    for entry in &entries {
        table.add_row(vec![
            Cell::new(entry.index + 1),
            Cell::new(&entry.prompt),
            Cell::new(&entry.answer),
            Cell::new(&entry.grade),
            Cell::new(&entry.feedback),
        ]);
    }

    println!("\nAnswered {} of {}", entries.len(), transcript.question_count);
    println!("{table}");
}
