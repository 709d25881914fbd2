use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, info};

use crate::api_types::{GenerateRequest, GenerateResponse, GenerationConfig};
use crate::error::{excerpt, GenerationError};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Anything that turns a prompt into raw model text.
pub trait Generator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

pub struct GeminiClient {
    http: Client,
    api_base: String,
    api_key: String,
    model: String,
    config: GenerationConfig,
}

impl GeminiClient {
    pub fn new(http: Client, api_key: String) -> Self {
        Self {
            http,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            config: GenerationConfig {
                temperature: 0.85,
                max_output_tokens: 8192,
            },
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let start = std::time::Instant::now();
        debug!(
            "LLM call starting - model={}, prompt_length={} chars",
            self.model,
            prompt.chars().count()
        );

        let body = GenerateRequest::single_prompt(prompt, self.config);
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .timeout(GENERATION_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!("Generation API error - status={}, body={}", status, excerpt(&body));
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        let answer = parsed.first_text().ok_or(GenerationError::EmptyResponse)?;

        info!(
            "LLM API call completed - duration={:.2}s, response_length={} chars",
            start.elapsed().as_secs_f32(),
            answer.chars().count()
        );
        Ok(answer)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays canned responses in order and records every prompt it saw.
    #[derive(Default)]
    pub struct ScriptedGenerator {
        replies: Mutex<VecDeque<String>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn new<I, S>(replies: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn prompt(&self, i: usize) -> String {
            self.prompts.lock().unwrap()[i].clone()
        }
    }

    impl Generator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(GenerationError::EmptyResponse)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new(Client::new(), "k".into())
            .with_model("gemini-test")
            .with_api_base("http://localhost:9/v1/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9/v1/models/gemini-test:generateContent"
        );
    }
}
