mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::error::AiError;
use crate::traits::{ResponseFormat, TextGenerator};
use client::OpenAiClient;
use types::{ChatRequest, WireMessage};

const MAX_OUTPUT_TOKENS: u32 = 4096;

// =============================================================================
// OpenAi Generator
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    model: String,
    base_url: Option<String>,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    fn build_request(&self, system: &str, prompt: &str, format: ResponseFormat) -> ChatRequest {
        let mut request = ChatRequest::new(&self.model)
            .message(WireMessage::system(system))
            .message(WireMessage::user(prompt));

        if types::uses_max_completion_tokens(&self.model) {
            request = request.max_completion_tokens(MAX_OUTPUT_TOKENS);
        } else {
            request = request.max_tokens(MAX_OUTPUT_TOKENS).temperature(0.7);
        }

        match format {
            ResponseFormat::Json => request.json_object(),
            ResponseFormat::Text => request,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAi {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, AiError> {
        let request = self.build_request(system, prompt, format);
        let response = self.client().chat(&request).await?;

        response
            .text()
            .ok_or_else(|| AiError::EmptyResponse(self.model.clone()))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
