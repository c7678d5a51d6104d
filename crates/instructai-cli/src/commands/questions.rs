//! The `instructai questions` command.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use serde::Serialize;

use instructai_client::{create_service, load_config_from};
use instructai_core::model::{AssessmentConfig, Question};
use instructai_core::AssessmentFlow;

use crate::ServiceArgs;

/// JSON output: the configuration used and the questions generated for it.
#[derive(Serialize)]
struct QuestionSet<'a> {
    config: &'a AssessmentConfig,
    questions: &'a [Question],
}

pub async fn execute(
    subject: Option<String>,
    topic: String,
    question_type: Option<String>,
    count: i64,
    json: bool,
    service: ServiceArgs,
) -> Result<()> {
    let settings = load_config_from(service.config.as_deref())?;
    let config = super::assessment_config(&settings, subject, topic, question_type, count)?;

    let mut flow = AssessmentFlow::new(create_service(&settings, service.mock)?);
    flow.generate(config)
        .await
        .context("could not generate questions")?;

    let (Some(config), Some(session)) = (flow.config(), flow.session()) else {
        anyhow::bail!("no questions were generated");
    };

    if json {
        let set = QuestionSet {
            config,
            questions: session.questions(),
        };
        println!("{}", serde_json::to_string_pretty(&set)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Options", "Reference answer"]);
    for (i, question) in session.questions().iter().enumerate() {
        let options = question
            .options()
            .map(|options| options.join(" | "))
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&question.prompt),
            Cell::new(options),
            Cell::new(&question.reference_answer),
        ]);
    }
    println!(
        "{} {} question(s) on {}: {}",
        session.len(),
        config.question_type,
        config.subject,
        config.topic
    );
    println!("{table}");
    Ok(())
}
