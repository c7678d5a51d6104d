//! instructai CLI — quizzes and coding exercises from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;
mod prompt;

#[derive(Parser)]
#[command(
    name = "instructai",
    version,
    about = "AI-generated quizzes and coding exercises"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that talks to the service.
#[derive(Args, Clone)]
pub struct ServiceArgs {
    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Use the offline mock service instead of HTTP
    #[arg(long)]
    pub mock: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an interactive quiz
    Quiz {
        /// Subject area (defaults to the configured subject)
        #[arg(long)]
        subject: Option<String>,

        /// Topic the questions should cover
        #[arg(long)]
        topic: String,

        /// Question type: mcq or subjective
        #[arg(long)]
        question_type: Option<String>,

        /// Number of questions (clamped to 1..=5)
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        count: i64,

        /// Write the run transcript as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Solve interactive coding exercises
    Coding {
        /// Programming language (python, javascript, java, c++, c, c#)
        #[arg(long)]
        language: Option<String>,

        /// Difficulty: easy, medium or hard
        #[arg(long)]
        difficulty: Option<String>,

        /// Optional topic to focus on
        #[arg(long, default_value = "")]
        topic: String,

        /// Number of exercises (clamped to 1..=5)
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        count: i64,

        /// Write the run transcript as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Generate a question set and print it without starting a quiz
    Questions {
        /// Subject area (defaults to the configured subject)
        #[arg(long)]
        subject: Option<String>,

        /// Topic the questions should cover
        #[arg(long)]
        topic: String,

        /// Question type: mcq or subjective
        #[arg(long)]
        question_type: Option<String>,

        /// Number of questions (clamped to 1..=5)
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        count: i64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Create a starter instructai.toml
    Init,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("instructai=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Quiz {
            subject,
            topic,
            question_type,
            count,
            output,
            service,
        } => {
            commands::quiz::execute(subject, topic, question_type, count, output, service).await
        }
        Commands::Coding {
            language,
            difficulty,
            topic,
            count,
            output,
            service,
        } => {
            commands::coding::execute(language, difficulty, topic, count, output, service).await
        }
        Commands::Questions {
            subject,
            topic,
            question_type,
            count,
            json,
            service,
        } => commands::questions::execute(subject, topic, question_type, count, json, service).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
