//! Prompt text and the JSON payload shapes requested from the text generator.
//!
//! Payload fields are all optional: generator output is untrusted, and
//! missing fields are filled in by the synthesizer.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use spark_common::{Archetype, ToolType};

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebsitePayload {
    /// Engaging website title, 5-10 words
    #[serde(default)]
    pub title: Option<String>,
    /// Tagline, 15-25 words
    #[serde(default)]
    pub description: Option<String>,
    /// Markdown body organized into `##` sections
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PagePayload {
    /// Page title, 3-8 words
    #[serde(default)]
    pub title: Option<String>,
    /// Markdown body with headings and paragraphs
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ToolPlan {
    #[serde(default)]
    pub tools: Vec<ToolPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolPayload {
    /// One of the tool type ids listed in the prompt
    #[serde(rename = "type")]
    pub tool_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub config: Option<serde_json::Map<String, serde_json::Value>>,
}

fn schema_text<T: JsonSchema>() -> String {
    serde_json::to_string_pretty(&schema_for!(T)).unwrap_or_default()
}

// =============================================================================
// Prompts
// =============================================================================

pub const SYSTEM_PROMPT: &str = "You write educational web content. \
Respond with a single JSON object and nothing else.";

pub fn website_prompt(query: &str) -> String {
    format!(
        r#"You are creating a comprehensive, educational website homepage based on this user query: {query}

Generate a complete website with:
1. A clear, engaging title (5-10 words)
2. A concise description/tagline (15-25 words)
3. Rich, informative content organized into sections with headings

The content should be educational and well structured, practical, and more than a description: real, useful information.

Return ONLY valid JSON matching this schema:
{schema}"#,
        schema = schema_text::<WebsitePayload>(),
    )
}

pub fn page_prompt(website_context: &str, page_query: &str) -> String {
    format!(
        r#"You are adding a new page to a website about {website_context}.

The user wants to add a page about: {page_query}

Generate a new page with:
1. A clear page title (3-8 words)
2. Rich, informative content organized with markdown headings and paragraphs

Return ONLY valid JSON matching this schema:
{schema}"#,
        schema = schema_text::<PagePayload>(),
    )
}

pub fn tool_plan_prompt(query: &str, hint: Option<Archetype>, max_tools: usize) -> String {
    let types = ToolType::ALL
        .iter()
        .map(|t| format!("- `{}`: {}", t.as_str(), t.label()))
        .collect::<Vec<_>>()
        .join("\n");

    let hint_section = match hint {
        Some(archetype) => format!(
            "\nThe website belongs to the \"{}\" world ({}).\n",
            archetype.name(),
            archetype.definition().educational_goal
        ),
        None => String::new(),
    };

    format!(
        r#"Choose the interactive tools that best serve this request: {query}
{hint_section}
Available tool types:
{types}

Pick at most {max_tools} tools, most important first. Give each a short title and a one-sentence description.

Return ONLY valid JSON matching this schema:
{schema}"#,
        schema = schema_text::<ToolPlan>(),
    )
}
