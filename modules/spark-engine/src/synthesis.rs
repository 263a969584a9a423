//! Content synthesis orchestrator.
//!
//! One generator call per draft, bounded by a timeout, zero retries. Any
//! failure along the way (no generator, transport error, timeout, unparsable
//! reply) degrades to a deterministic draft that echoes the query. Callers
//! always get a usable draft back.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use ai_client::{extract_json_object, strip_code_blocks, ResponseFormat, TextGenerator};
use spark_common::{Archetype, Config, SparkError, ToolComponent, ToolSpec};

use crate::intent::{ClassifyOptions, IntentClassifier};
use crate::prompts::{self, PagePayload, WebsitePayload};

const UNTITLED: &str = "Untitled";

// =============================================================================
// Generation outcome
// =============================================================================

/// The collaborator outcome, captured once.
#[derive(Debug, Clone, PartialEq)]
pub enum Generation<T> {
    Parsed(T),
    /// The reason the deterministic fallback was used.
    Fallback(String),
}

impl<T> Generation<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Generation::Fallback(_))
    }

    pub fn parsed(self) -> Option<T> {
        match self {
            Generation::Parsed(value) => Some(value),
            Generation::Fallback(_) => None,
        }
    }
}

/// Make one JSON-mode call and parse the reply defensively.
pub(crate) async fn request_json<T: DeserializeOwned>(
    generator: Option<&dyn TextGenerator>,
    timeout: Duration,
    prompt: &str,
) -> Generation<T> {
    let Some(generator) = generator else {
        debug!("No text generator configured, using fallback");
        return Generation::Fallback("no text generator configured".to_string());
    };

    let call = generator.generate(prompts::SYSTEM_PROMPT, prompt, ResponseFormat::Json);
    let raw = match tokio::time::timeout(timeout, call).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => {
            let err = SparkError::ExternalGenerationFailure(e.to_string());
            warn!(generator = generator.name(), error = %err, "Generation failed, using fallback");
            return Generation::Fallback(err.to_string());
        }
        Err(_) => {
            let err = SparkError::ExternalGenerationFailure(format!(
                "timed out after {}s",
                timeout.as_secs_f64()
            ));
            warn!(generator = generator.name(), error = %err, "Generation timed out, using fallback");
            return Generation::Fallback(err.to_string());
        }
    };

    match parse_json::<T>(&raw) {
        Ok(value) => Generation::Parsed(value),
        Err(e) => {
            warn!(
                generator = generator.name(),
                error = %e,
                reply = ai_client::truncate_to_char_boundary(&raw, 200),
                "Unparsable generation reply, using fallback"
            );
            Generation::Fallback(format!("unparsable reply: {e}"))
        }
    }
}

fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    let cleaned = strip_code_blocks(raw);
    match serde_json::from_str(cleaned) {
        Ok(value) => Ok(value),
        Err(first) => match extract_json_object(raw) {
            Some(object) if object != cleaned => serde_json::from_str(object),
            _ => Err(first),
        },
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn subject(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

// =============================================================================
// Drafts
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct WebsiteDraft {
    pub title: String,
    pub description: String,
    pub content: String,
    pub tools: Vec<ToolComponent>,
    /// Set when the deterministic fallback produced the text.
    pub fallback_reason: Option<String>,
}

impl WebsiteDraft {
    fn from_generation(query: &str, generation: Generation<WebsitePayload>, tools: Vec<ToolComponent>) -> Self {
        match generation {
            Generation::Parsed(payload) => Self {
                title: non_blank(payload.title).unwrap_or_else(|| "Untitled Website".to_string()),
                description: non_blank(payload.description)
                    .unwrap_or_else(|| "A new Infinity website".to_string()),
                content: non_blank(payload.content)
                    .unwrap_or_else(|| "## Welcome\n\nContent is being generated...".to_string()),
                tools,
                fallback_reason: None,
            },
            Generation::Fallback(reason) => Self {
                title: query.to_string(),
                description: "An Infinity-powered website".to_string(),
                content: format!(
                    "## {query}\n\nThis website was created to explore: {query}\n\nContent generation is in progress..."
                ),
                tools,
                fallback_reason: Some(reason),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageDraft {
    pub title: String,
    pub content: String,
    pub tools: Vec<ToolComponent>,
    pub fallback_reason: Option<String>,
}

impl PageDraft {
    fn from_generation(page_query: &str, generation: Generation<PagePayload>, tools: Vec<ToolComponent>) -> Self {
        match generation {
            Generation::Parsed(payload) => Self {
                title: non_blank(payload.title).unwrap_or_else(|| page_query.to_string()),
                content: non_blank(payload.content)
                    .unwrap_or_else(|| format!("## {page_query}\n\nContent coming soon...")),
                tools,
                fallback_reason: None,
            },
            Generation::Fallback(reason) => Self {
                title: page_query.to_string(),
                content: format!("## {page_query}\n\nThis page explores {page_query} in detail."),
                tools,
                fallback_reason: Some(reason),
            },
        }
    }
}

// =============================================================================
// Synthesizer
// =============================================================================

#[derive(Clone)]
pub struct Synthesizer {
    generator: Option<Arc<dyn TextGenerator>>,
    intent: IntentClassifier,
    timeout: Duration,
    max_tools: usize,
}

impl Synthesizer {
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        timeout: Duration,
        max_tools: usize,
    ) -> Self {
        Self {
            intent: IntentClassifier::new(generator.clone(), timeout),
            generator,
            timeout,
            max_tools,
        }
    }

    pub fn from_config(config: &Config, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self::new(generator, config.generation_timeout, config.max_tools)
    }

    /// Generator-backed classifier for standalone intent requests. Drafts
    /// stamp their tools from the keyword path so a synthesis stays at one
    /// generator call.
    pub fn intent(&self) -> &IntentClassifier {
        &self.intent
    }

    pub async fn synthesize_website(&self, query: &str, owner: &str) -> WebsiteDraft {
        self.synthesize_website_for(query, owner, None).await
    }

    /// Website synthesis with an archetype steering tool selection.
    pub async fn synthesize_website_for(
        &self,
        query: &str,
        owner: &str,
        hint: Option<Archetype>,
    ) -> WebsiteDraft {
        let query = subject(query);
        let tools = self.stamp_tools(&query, owner, hint);

        let generation = request_json::<WebsitePayload>(
            self.generator.as_deref(),
            self.timeout,
            &prompts::website_prompt(&query),
        )
        .await;

        let draft = WebsiteDraft::from_generation(&query, generation, tools);
        info!(
            title = %draft.title,
            tools = draft.tools.len(),
            fallback = draft.fallback_reason.is_some(),
            "Website draft synthesized"
        );
        draft
    }

    pub async fn synthesize_page(&self, website_context: &str, page_query: &str, owner: &str) -> PageDraft {
        let page_query = subject(page_query);
        let tools = self.stamp_tools(&page_query, owner, None);

        let generation = request_json::<PagePayload>(
            self.generator.as_deref(),
            self.timeout,
            &prompts::page_prompt(website_context.trim(), &page_query),
        )
        .await;

        let draft = PageDraft::from_generation(&page_query, generation, tools);
        info!(
            title = %draft.title,
            tools = draft.tools.len(),
            fallback = draft.fallback_reason.is_some(),
            "Page draft synthesized"
        );
        draft
    }

    fn stamp_tools(&self, query: &str, owner: &str, hint: Option<Archetype>) -> Vec<ToolComponent> {
        let options = ClassifyOptions::builder()
            .max_tools(self.max_tools)
            .archetype_hint(hint)
            .build();
        let specs: Vec<ToolSpec> = self.intent.classify_keywords(query, &options);

        let now = Utc::now();
        specs
            .into_iter()
            .map(|spec| ToolComponent::stamp(spec, owner, now))
            .collect()
    }
}
