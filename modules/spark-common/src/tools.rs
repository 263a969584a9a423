//! Tool taxonomy and per-type economic weights.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weight used for tool types outside the taxonomy.
pub const DEFAULT_TOOL_WEIGHT: u64 = 10;

/// The fixed tool taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolType {
    Quiz,
    Flashcards,
    Simulation,
    Calculator,
    Timeline,
    Glossary,
    CodeSandbox,
    DataChart,
    ConceptMap,
    Poll,
    Checklist,
    Content,
}

impl ToolType {
    pub const ALL: [ToolType; 12] = [
        ToolType::Quiz,
        ToolType::Flashcards,
        ToolType::Simulation,
        ToolType::Calculator,
        ToolType::Timeline,
        ToolType::Glossary,
        ToolType::CodeSandbox,
        ToolType::DataChart,
        ToolType::ConceptMap,
        ToolType::Poll,
        ToolType::Checklist,
        ToolType::Content,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolType::Quiz => "quiz",
            ToolType::Flashcards => "flashcards",
            ToolType::Simulation => "simulation",
            ToolType::Calculator => "calculator",
            ToolType::Timeline => "timeline",
            ToolType::Glossary => "glossary",
            ToolType::CodeSandbox => "code-sandbox",
            ToolType::DataChart => "data-chart",
            ToolType::ConceptMap => "concept-map",
            ToolType::Poll => "poll",
            ToolType::Checklist => "checklist",
            ToolType::Content => "content",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ToolType::Quiz => "Quiz",
            ToolType::Flashcards => "Flashcards",
            ToolType::Simulation => "Simulation",
            ToolType::Calculator => "Calculator",
            ToolType::Timeline => "Timeline",
            ToolType::Glossary => "Glossary",
            ToolType::CodeSandbox => "Code Sandbox",
            ToolType::DataChart => "Data Chart",
            ToolType::ConceptMap => "Concept Map",
            ToolType::Poll => "Poll",
            ToolType::Checklist => "Checklist",
            ToolType::Content => "Content",
        }
    }

    /// Economic weight added to an artifact's value per attached tool.
    pub fn weight(self) -> u64 {
        match self {
            ToolType::Quiz => 50,
            ToolType::Flashcards => 40,
            ToolType::Simulation => 80,
            ToolType::Calculator => 30,
            ToolType::Timeline => 35,
            ToolType::Glossary => 20,
            ToolType::CodeSandbox => 70,
            ToolType::DataChart => 45,
            ToolType::ConceptMap => 40,
            ToolType::Poll => 25,
            ToolType::Checklist => 15,
            ToolType::Content => 10,
        }
    }

    pub fn parse(s: &str) -> Option<ToolType> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        ToolType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ToolKind
// =============================================================================

/// A tool type as it appears on a spec or component. Types outside the
/// taxonomy are preserved verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolKind {
    Known(ToolType),
    Custom(String),
}

impl ToolKind {
    pub fn known(&self) -> Option<ToolType> {
        match self {
            ToolKind::Known(t) => Some(*t),
            ToolKind::Custom(_) => None,
        }
    }
}

impl From<ToolType> for ToolKind {
    fn from(t: ToolType) -> Self {
        ToolKind::Known(t)
    }
}

impl From<String> for ToolKind {
    fn from(s: String) -> Self {
        match ToolType::parse(&s) {
            Some(t) => ToolKind::Known(t),
            None => ToolKind::Custom(s),
        }
    }
}

impl From<&str> for ToolKind {
    fn from(s: &str) -> Self {
        ToolKind::from(s.to_string())
    }
}

impl From<ToolKind> for String {
    fn from(kind: ToolKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolKind::Known(t) => f.write_str(t.as_str()),
            ToolKind::Custom(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// ToolSpec / ToolComponent
// =============================================================================

/// A functional tool proposed for an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub tool_type: ToolKind,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

impl ToolSpec {
    pub fn new(
        tool_type: impl Into<ToolKind>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            tool_type: tool_type.into(),
            title: title.into(),
            description: description.into(),
            config: serde_json::Map::new(),
        }
    }

    pub fn with_config(mut self, config: serde_json::Map<String, serde_json::Value>) -> Self {
        self.config = config;
        self
    }
}

/// A tool attached to an artifact and owned by a wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolComponent {
    pub id: Uuid,
    #[serde(flatten)]
    pub spec: ToolSpec,
    pub added_at: DateTime<Utc>,
    pub added_by: String,
}

impl ToolComponent {
    pub fn stamp(spec: ToolSpec, owner: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            spec,
            added_at: now,
            added_by: owner.to_string(),
        }
    }

    pub fn tool_type(&self) -> &ToolKind {
        &self.spec.tool_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_loose_spellings() {
        assert_eq!(ToolType::parse("code_sandbox"), Some(ToolType::CodeSandbox));
        assert_eq!(ToolType::parse("Data Chart"), Some(ToolType::DataChart));
        assert_eq!(ToolType::parse(" QUIZ "), Some(ToolType::Quiz));
        assert_eq!(ToolType::parse("hologram"), None);
    }

    #[test]
    fn unknown_kind_survives_round_trip() {
        let kind: ToolKind = serde_json::from_str("\"hologram\"").unwrap();
        assert_eq!(kind, ToolKind::Custom("hologram".to_string()));
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"hologram\"");
    }

    #[test]
    fn known_kind_serializes_kebab_case() {
        let kind = ToolKind::from(ToolType::ConceptMap);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"concept-map\"");
    }

    #[test]
    fn every_tool_type_has_positive_weight() {
        for t in ToolType::ALL {
            assert!(t.weight() > 0, "{t}");
            assert_eq!(ToolType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn component_flattens_spec_fields() {
        let spec = ToolSpec::new(ToolType::Quiz, "Orbit Quiz", "Test yourself");
        let component = ToolComponent::stamp(spec, "0xabc", Utc::now());
        let json = serde_json::to_value(&component).unwrap();

        assert_eq!(json["type"], "quiz");
        assert_eq!(json["title"], "Orbit Quiz");
        assert_eq!(json["addedBy"], "0xabc");
        assert!(json.get("spec").is_none());
    }
}
