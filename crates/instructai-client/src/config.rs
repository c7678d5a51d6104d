//! Client configuration and service factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use instructai_core::model::{Difficulty, ProgrammingLanguage, QuestionType};
use instructai_core::traits::AssessmentService;

use crate::http::{HttpService, DEFAULT_BASE_URL};
use crate::mock::MockService;

/// Name of the per-project config file.
pub const CONFIG_FILE_NAME: &str = "instructai.toml";

/// Top-level instructai configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructConfig {
    /// Base URL of the generation/grading service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Subject used when `quiz` is run without `--subject`.
    #[serde(default = "default_subject")]
    pub default_subject: String,
    #[serde(default)]
    pub default_question_type: QuestionType,
    #[serde(default = "default_language")]
    pub default_language: ProgrammingLanguage,
    #[serde(default)]
    pub default_difficulty: Difficulty,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_subject() -> String {
    "python".to_string()
}
fn default_language() -> ProgrammingLanguage {
    ProgrammingLanguage::Python
}

impl Default for InstructConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            default_subject: default_subject(),
            default_question_type: QuestionType::default(),
            default_language: default_language(),
            default_difficulty: Difficulty::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `instructai.toml` in the current directory
/// 2. `~/.config/instructai/config.toml`
///
/// `INSTRUCTAI_BASE_URL` overrides the configured base URL.
pub fn load_config_from(path: Option<&Path>) -> Result<InstructConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<InstructConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => InstructConfig::default(),
    };

    if let Ok(url) = std::env::var("INSTRUCTAI_BASE_URL") {
        if !url.trim().is_empty() {
            config.base_url = url;
        }
    }
    config.base_url = resolve_env_vars(&config.base_url);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("instructai"))
}

/// Create the service the flows talk to: the offline mock, or the HTTP
/// client pointed at `config.base_url`.
pub fn create_service(config: &InstructConfig, mock: bool) -> Result<Arc<dyn AssessmentService>> {
    if mock {
        tracing::info!("using offline mock service");
        return Ok(Arc::new(MockService::new()));
    }
    let service = HttpService::new(Some(config.base_url.clone()), config.timeout_secs)?;
    tracing::info!(base_url = service.base_url(), "using HTTP service");
    Ok(Arc::new(service))
}
