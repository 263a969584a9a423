use async_trait::async_trait;
use std::sync::Arc;

use crate::error::AiError;

// =============================================================================
// Response Format
// =============================================================================

/// Hint passed to the generator about the shape of the expected reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    /// The reply must be a single JSON object. Providers that support a
    /// native JSON mode should enable it; callers still parse defensively.
    Json,
}

// =============================================================================
// TextGenerator Trait
// =============================================================================

/// A text-generation backend. Output is untrusted: it may be malformed,
/// wrapped in code fences, or missing fields even when `Json` was requested.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, AiError>;

    /// Short label used in logs.
    fn name(&self) -> &str {
        "generator"
    }
}

#[async_trait]
impl<G: TextGenerator + ?Sized> TextGenerator for Arc<G> {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, AiError> {
        (**self).generate(system, prompt, format).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(
            &self,
            _system: &str,
            prompt: &str,
            _format: ResponseFormat,
        ) -> Result<String, AiError> {
            Ok(prompt.to_string())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn arc_forwards_to_inner_generator() {
        let shared: Arc<dyn TextGenerator> = Arc::new(Echo);
        let out = shared
            .generate("sys", "hello", ResponseFormat::Json)
            .await
            .unwrap();
        assert_eq!(out, "hello");
        assert_eq!(shared.name(), "echo");
    }

    #[test]
    fn default_format_is_text() {
        assert_eq!(ResponseFormat::default(), ResponseFormat::Text);
    }
}
