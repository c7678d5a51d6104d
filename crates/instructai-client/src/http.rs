//! HTTP/JSON client for the generation/grading service.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use instructai_core::error::ServiceError;
use instructai_core::model::{CodingEvaluation, CodingQuestion, Evaluation, Question};
use instructai_core::traits::{
    AssessmentService, EvaluateAnswerRequest, EvaluateCodingAnswerRequest,
    GenerateCodingQuestionsRequest, GenerateQuestionsRequest,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Talks to the service over plain JSON POSTs. No auth, no retries.
pub struct HttpService {
    base_url: String,
    timeout_secs: Option<u64>,
    client: reqwest::Client,
}

impl HttpService {
    /// Build a client. Without a timeout, a slow call waits indefinitely.
    pub fn new(base_url: Option<String>, timeout_secs: Option<u64>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("failed to build HTTP client")?;

        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{endpoint}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status,
                message: error_detail(&body),
            });
        }

        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&text)
            .map_err(|e| ServiceError::InvalidResponse(format!("{endpoint}: {e}")))
    }

    fn transport_error(&self, e: reqwest::Error) -> ServiceError {
        match self.timeout_secs {
            Some(secs) if e.is_timeout() => ServiceError::Timeout(secs),
            _ => ServiceError::Network(e.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct QuestionsEnvelope<T> {
    questions: Vec<T>,
}

/// Pull the `detail` out of a `{"detail": "..."}` error body, falling back to
/// the raw body.
fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct Detail {
        detail: String,
    }

    match serde_json::from_str::<Detail>(body) {
        Ok(d) => d.detail,
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl AssessmentService for HttpService {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, request), fields(topic = %request.topic, count = request.num_questions))]
    async fn generate_questions(
        &self,
        request: &GenerateQuestionsRequest,
    ) -> anyhow::Result<Vec<Question>> {
        let envelope: QuestionsEnvelope<Question> =
            self.post("generate_questions", request).await?;
        Ok(envelope.questions)
    }

    #[instrument(skip(self, request))]
    async fn evaluate_answer(&self, request: &EvaluateAnswerRequest) -> anyhow::Result<Evaluation> {
        Ok(self.post("evaluate_answer", request).await?)
    }

    #[instrument(skip(self, request), fields(language = request.programming_language.id()))]
    async fn generate_coding_questions(
        &self,
        request: &GenerateCodingQuestionsRequest,
    ) -> anyhow::Result<Vec<CodingQuestion>> {
        let envelope: QuestionsEnvelope<CodingQuestion> =
            self.post("generate_coding_questions", request).await?;
        Ok(envelope.questions)
    }

    #[instrument(skip(self, request), fields(title = %request.question.title))]
    async fn evaluate_coding_answer(
        &self,
        request: &EvaluateCodingAnswerRequest,
    ) -> anyhow::Result<CodingEvaluation> {
        Ok(self.post("evaluate_coding_answer", request).await?)
    }
}
