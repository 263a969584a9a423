//! Free-text intent → ordered tool specs.
//!
//! Three layers, first non-empty wins:
//! 1. the text generator, when one is configured, asked for a JSON tool plan
//! 2. a regex keyword table, ordered by where each keyword first appears
//! 3. the archetype hint's default tools, or a single generic content tool

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

use ai_client::{truncate_to_char_boundary, TextGenerator};
use spark_common::{Archetype, SparkError, ToolKind, ToolSpec, ToolType};

use crate::prompts::{self, ToolPayload};
use crate::synthesis::{request_json, Generation};

pub const DEFAULT_MAX_TOOLS: usize = 4;

const TOPIC_MAX_BYTES: usize = 80;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ClassifyOptions {
    #[builder(default = DEFAULT_MAX_TOOLS)]
    pub max_tools: usize,
    /// Steers the generator and supplies default tools when nothing matches.
    #[builder(default)]
    pub archetype_hint: Option<Archetype>,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

// ---------------------------------------------------------------------------
// Keyword table
// ---------------------------------------------------------------------------

static KEYWORD_RULES: LazyLock<Vec<(ToolType, Regex)>> = LazyLock::new(|| {
    [
        (ToolType::Quiz, r"\b(?:quiz\w*|test (?:me|myself|yourself)|exams?|trivia|assess\w*)\b"),
        (ToolType::Flashcards, r"\b(?:flash ?cards?|memori[sz]\w*|spaced repetition|vocab)\b"),
        (ToolType::Simulation, r"\b(?:simulat\w*|experiment\w*|physics|orbits?|interactive model)\b"),
        (ToolType::Calculator, r"\b(?:calculat\w*|compute|convert\w*|formulas?|budget\w*|mortgage|equations?)\b"),
        (ToolType::Timeline, r"\b(?:timelines?|history|historical|chronolog\w*|eras?|centur(?:y|ies))\b"),
        (ToolType::Glossary, r"\b(?:glossary|definitions?|define|terminology|dictionary|vocabulary)\b"),
        (ToolType::CodeSandbox, r"\b(?:code|coding|programm\w*|rust|python|javascript|algorithms?)\b"),
        (ToolType::DataChart, r"\b(?:charts?|graphs?|data|statistics?|trends?|visuali[sz]\w*|plot)\b"),
        (ToolType::ConceptMap, r"\b(?:concept ?maps?|mind ?maps?|relationships?|connections?|brainstorm\w*)\b"),
        (ToolType::Poll, r"\b(?:polls?|vote|voting|surveys?|opinions?)\b"),
        (ToolType::Checklist, r"\b(?:checklists?|to-?do|steps|step by step|routines?|habits?|plan)\b"),
    ]
    .into_iter()
    .map(|(tool, pattern)| (tool, Regex::new(&format!("(?i){pattern}")).unwrap()))
    .collect()
});

fn title_for(tool: ToolType, topic: &str) -> String {
    format!("{topic} {}", tool.label())
}

fn description_for(tool: ToolType, topic: &str) -> String {
    match tool {
        ToolType::Quiz => format!("Test your understanding of {topic}"),
        ToolType::Flashcards => format!("Memorize the key facts of {topic}"),
        ToolType::Simulation => format!("Experiment with {topic} interactively"),
        ToolType::Calculator => format!("Work through the numbers behind {topic}"),
        ToolType::Timeline => format!("Follow how {topic} unfolded over time"),
        ToolType::Glossary => format!("Key terms used in {topic}"),
        ToolType::CodeSandbox => format!("Write and run code exploring {topic}"),
        ToolType::DataChart => format!("Visualize data about {topic}"),
        ToolType::ConceptMap => format!("See how the ideas in {topic} connect"),
        ToolType::Poll => format!("Share your take on {topic}"),
        ToolType::Checklist => format!("Track your progress through {topic}"),
        ToolType::Content => format!("Read about {topic}"),
    }
}

/// Starting configuration for a tool of each type.
pub fn default_config(tool: ToolType) -> Map<String, Value> {
    let value = match tool {
        ToolType::Quiz => json!({ "questionCount": 5, "showExplanations": true }),
        ToolType::Flashcards => json!({ "cardCount": 10, "shuffle": true }),
        ToolType::Simulation => json!({ "interactive": true }),
        ToolType::Calculator => json!({ "precision": 2 }),
        ToolType::Timeline => json!({ "orientation": "vertical" }),
        ToolType::Glossary => json!({ "sorted": true }),
        ToolType::CodeSandbox => json!({ "language": "javascript" }),
        ToolType::DataChart => json!({ "chartType": "bar" }),
        ToolType::ConceptMap => json!({ "layout": "radial" }),
        ToolType::Poll => json!({ "allowMultiple": false }),
        ToolType::Checklist => json!({ "persistProgress": true }),
        ToolType::Content => json!({}),
    };
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn keyword_spec(tool: ToolType, topic: &str) -> ToolSpec {
    ToolSpec::new(tool, title_for(tool, topic), description_for(tool, topic))
        .with_config(default_config(tool))
}

fn topic_of(query: &str) -> &str {
    truncate_to_char_boundary(query.trim(), TOPIC_MAX_BYTES).trim_end()
}

/// Keyword matches for `query`, ordered by first match position. Ties keep
/// table order.
pub fn keyword_tools(query: &str) -> Vec<ToolType> {
    let mut hits: Vec<(usize, usize, ToolType)> = KEYWORD_RULES
        .iter()
        .enumerate()
        .filter_map(|(rank, (tool, re))| re.find(query).map(|m| (m.start(), rank, *tool)))
        .collect();
    hits.sort_by_key(|(pos, rank, _)| (*pos, *rank));
    hits.into_iter().map(|(_, _, tool)| tool).collect()
}

// ---------------------------------------------------------------------------
// IntentClassifier
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct IntentClassifier {
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
}

impl IntentClassifier {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// A classifier that never calls out and relies on the keyword table.
    pub fn keyword_only() -> Self {
        Self::new(None, Duration::from_secs(30))
    }

    /// Never empty. A blank query yields the single generic content tool.
    pub async fn classify(&self, query: &str, options: &ClassifyOptions) -> Vec<ToolSpec> {
        let max_tools = options.max_tools.max(1);
        let query = query.trim();
        if query.is_empty() {
            return vec![keyword_spec(ToolType::Content, "this topic")];
        }

        if let Some(generator) = self.generator.as_deref() {
            let prompt = prompts::tool_plan_prompt(query, options.archetype_hint, max_tools);
            match request_json::<Value>(Some(generator), self.timeout, &prompt).await {
                Generation::Parsed(value) => {
                    let specs = specs_from_plan(value, max_tools);
                    if !specs.is_empty() {
                        info!(count = specs.len(), "Tools chosen by generator");
                        return specs;
                    }
                    warn!("Generator returned no usable tools, using keyword table");
                }
                Generation::Fallback(reason) => {
                    debug!(reason = %reason, "Tool plan unavailable, using keyword table");
                }
            }
        }

        self.classify_keywords(query, options)
    }

    /// Deterministic path: keyword table, then hint defaults, then content.
    pub fn classify_keywords(&self, query: &str, options: &ClassifyOptions) -> Vec<ToolSpec> {
        let max_tools = options.max_tools.max(1);
        let query = query.trim();
        if query.is_empty() {
            return vec![keyword_spec(ToolType::Content, "this topic")];
        }

        // the whole query is matched; only titles use the shortened topic
        let topic = topic_of(query);
        let mut tools = keyword_tools(query);
        if tools.is_empty() {
            tools = match options.archetype_hint {
                Some(archetype) => archetype.default_tools().to_vec(),
                None => vec![ToolType::Content],
            };
        }

        let mut seen = HashSet::new();
        tools
            .into_iter()
            .filter(|t| seen.insert(*t))
            .take(max_tools)
            .map(|t| keyword_spec(t, topic))
            .collect()
    }
}

/// Accepts either `{"tools": [...]}` or a bare array. Entries that fail to
/// parse or have blank titles are dropped; unknown types are kept.
fn specs_from_plan(value: Value, max_tools: usize) -> Vec<ToolSpec> {
    let entries = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("tools") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut specs = Vec::new();
    for entry in entries {
        let payload: ToolPayload = match serde_json::from_value(entry) {
            Ok(p) => p,
            Err(e) => {
                debug!(error = %e, "Skipping malformed tool entry");
                continue;
            }
        };

        let title = payload.title.unwrap_or_default().trim().to_string();
        let raw_type = payload.tool_type.trim();
        if title.is_empty() || raw_type.is_empty() {
            continue;
        }

        let kind = ToolKind::from(raw_type);
        if let ToolKind::Custom(name) = &kind {
            let err = SparkError::UnknownToolType(name.clone());
            warn!(error = %err, "Keeping tool outside the taxonomy");
        }
        if !seen.insert(kind.clone()) {
            continue;
        }

        let config = match (payload.config, kind.known()) {
            (Some(config), _) => config,
            (None, Some(known)) => default_config(known),
            (None, None) => Map::new(),
        };

        specs.push(ToolSpec {
            tool_type: kind,
            title,
            description: payload.description.unwrap_or_default().trim().to_string(),
            config,
        });
        if specs.len() == max_tools {
            break;
        }
    }
    specs
}
