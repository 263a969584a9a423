// Test mocks for the synthesis pipeline.
//
// - MockGenerator (TextGenerator): scripted replies and failures, consumed in
//   call order, with a call counter and prompt log.
//
// Plus helpers for building websites without a generator.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use ai_client::{AiError, ResponseFormat, TextGenerator};
use spark_common::{Archetype, Provenance, Theme, ToolComponent, ToolSpec, ToolType, Website};

// ---------------------------------------------------------------------------
// MockGenerator
// ---------------------------------------------------------------------------

/// Scripted text generator. Each call pops the next scripted reply; once the
/// script runs out it returns the fallback reply (an error unless set with
/// `.failing()`/`.always()`).
/// Builder pattern: `.with_response()`, `.with_failure()`, `.failing()`, `.with_delay()`.
pub struct MockGenerator {
    script: Mutex<VecDeque<Result<String, String>>>,
    fallback: Result<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err("script exhausted".to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, reply: &str) -> Self {
        self.script.lock().unwrap().push_back(Ok(reply.to_string()));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.script.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    /// Every unscripted call fails with `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.fallback = Err(message.to_string());
        self
    }

    /// Every unscripted call returns `reply`.
    pub fn always(mut self, reply: &str) -> Self {
        self.fallback = Ok(reply.to_string());
        self
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(
        &self,
        _system: &str,
        prompt: &str,
        _format: ResponseFormat,
    ) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        next.map_err(AiError::Network)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ---------------------------------------------------------------------------
// Website helpers
// ---------------------------------------------------------------------------

/// A bare website with `tools` attached, created at `created_at`.
pub fn website_with_tools(tools: &[ToolType], created_at: DateTime<Utc>) -> Website {
    let owner = "0xtest";
    Website {
        id: Uuid::new_v4(),
        title: "Test World".to_string(),
        description: "A world for tests".to_string(),
        content: "## Test\n\nBody".to_string(),
        archetype: Archetype::ResearchLibrary,
        rarity_multiplier: 1.0,
        theme: Theme::default(),
        owner: owner.to_string(),
        pages: Vec::new(),
        tools: tools
            .iter()
            .map(|t| ToolComponent::stamp(ToolSpec::new(*t, t.label(), ""), owner, created_at))
            .collect(),
        created_at,
        provenance: Provenance::manual(Archetype::ResearchLibrary),
    }
}
