//! The `instructai init` command.

use anyhow::Result;

use instructai_client::config::CONFIG_FILE_NAME;

pub fn execute() -> Result<()> {
    if std::path::Path::new(CONFIG_FILE_NAME).exists() {
        println!("{CONFIG_FILE_NAME} already exists, skipping.");
    } else {
        std::fs::write(CONFIG_FILE_NAME, SAMPLE_CONFIG)?;
        println!("Created {CONFIG_FILE_NAME}");
    }

    println!("\nNext steps:");
    println!("  1. Point base_url at your generation service");
    println!("  2. Run: instructai quiz --topic loops --count 3");
    println!("  3. Or try it offline: instructai quiz --topic loops --mock");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# instructai configuration

# Generation/grading service. INSTRUCTAI_BASE_URL overrides this.
base_url = "http://localhost:8000"

# Per-request timeout in seconds. Omit to wait indefinitely.
# timeout_secs = 60

default_subject = "python"
default_question_type = "MCQ"
default_language = "python"
default_difficulty = "easy"
"#;
