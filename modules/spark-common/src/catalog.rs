//! Archetype catalog.
//!
//! Twelve learning worlds plus the designated jackpot world. Definitions are
//! static and exhaustively matched, so adding a variant without a definition
//! or a symbol affinity is a compile error. `validate_catalog` covers the
//! invariants the type system cannot (unique ids, tier bounds).

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SparkError;
use crate::symbols::{Symbol, SYMBOLS};
use crate::tools::ToolType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    PhysicsPlayground,
    LogicGym,
    ResearchLibrary,
    QuantumVisualizer,
    CosmicObservatory,
    CodeForge,
    MathArena,
    HistoryTimeline,
    BiologyLab,
    MindPalace,
    OceanExplorer,
    StoryStudio,
    InfinityNexus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub tools: &'static [ToolType],
    pub base_value: u64,
    pub educational_goal: &'static str,
    pub primary_color: &'static str,
}

impl Archetype {
    /// Every archetype, learning worlds first, jackpot last.
    pub const ALL: [Archetype; 13] = [
        Archetype::PhysicsPlayground,
        Archetype::LogicGym,
        Archetype::ResearchLibrary,
        Archetype::QuantumVisualizer,
        Archetype::CosmicObservatory,
        Archetype::CodeForge,
        Archetype::MathArena,
        Archetype::HistoryTimeline,
        Archetype::BiologyLab,
        Archetype::MindPalace,
        Archetype::OceanExplorer,
        Archetype::StoryStudio,
        Archetype::InfinityNexus,
    ];

    /// The worlds reachable from non-jackpot combinations, in lookup order.
    pub const LEARNING_WORLDS: [Archetype; 12] = [
        Archetype::PhysicsPlayground,
        Archetype::LogicGym,
        Archetype::ResearchLibrary,
        Archetype::QuantumVisualizer,
        Archetype::CosmicObservatory,
        Archetype::CodeForge,
        Archetype::MathArena,
        Archetype::HistoryTimeline,
        Archetype::BiologyLab,
        Archetype::MindPalace,
        Archetype::OceanExplorer,
        Archetype::StoryStudio,
    ];

    pub const JACKPOT: Archetype = Archetype::InfinityNexus;

    pub fn definition(self) -> &'static ArchetypeDefinition {
        match self {
            Archetype::PhysicsPlayground => &PHYSICS_PLAYGROUND,
            Archetype::LogicGym => &LOGIC_GYM,
            Archetype::ResearchLibrary => &RESEARCH_LIBRARY,
            Archetype::QuantumVisualizer => &QUANTUM_VISUALIZER,
            Archetype::CosmicObservatory => &COSMIC_OBSERVATORY,
            Archetype::CodeForge => &CODE_FORGE,
            Archetype::MathArena => &MATH_ARENA,
            Archetype::HistoryTimeline => &HISTORY_TIMELINE,
            Archetype::BiologyLab => &BIOLOGY_LAB,
            Archetype::MindPalace => &MIND_PALACE,
            Archetype::OceanExplorer => &OCEAN_EXPLORER,
            Archetype::StoryStudio => &STORY_STUDIO,
            Archetype::InfinityNexus => &INFINITY_NEXUS,
        }
    }

    pub fn id(self) -> &'static str {
        self.definition().id
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }

    pub fn default_tools(self) -> &'static [ToolType] {
        self.definition().tools
    }

    /// The learning world a symbol leans toward when it lands as a pair.
    pub fn affinity(symbol: Symbol) -> Archetype {
        match symbol {
            Symbol::Planet => Archetype::CosmicObservatory,
            Symbol::Moon => Archetype::StoryStudio,
            Symbol::Star => Archetype::ResearchLibrary,
            Symbol::Comet => Archetype::HistoryTimeline,
            Symbol::Galaxy => Archetype::QuantumVisualizer,
            Symbol::Telescope => Archetype::MathArena,
            Symbol::Atom => Archetype::PhysicsPlayground,
            Symbol::Helix => Archetype::BiologyLab,
            Symbol::Mind => Archetype::MindPalace,
            Symbol::Gem => Archetype::LogicGym,
            Symbol::Flame => Archetype::CodeForge,
            Symbol::Wave => Archetype::OceanExplorer,
        }
    }

    pub fn from_id(id: &str) -> Option<Archetype> {
        Archetype::ALL.iter().copied().find(|a| a.id() == id)
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Archetype {
    type Err = SparkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Archetype::from_id(s.trim())
            .ok_or_else(|| SparkError::Config(format!("unknown archetype {s:?}")))
    }
}

// =============================================================================
// Definitions
// =============================================================================

static PHYSICS_PLAYGROUND: ArchetypeDefinition = ArchetypeDefinition {
    id: "physics-playground",
    name: "Physics Playground",
    emoji: "⚛️",
    description: "Interactive simulations where forces, motion and energy can be poked and prodded.",
    tools: &[ToolType::Simulation, ToolType::Calculator, ToolType::Quiz],
    base_value: 1200,
    educational_goal: "Build intuition for classical mechanics through experimentation",
    primary_color: "oklch(0.55 0.18 250)",
};

static LOGIC_GYM: ArchetypeDefinition = ArchetypeDefinition {
    id: "logic-gym",
    name: "Logic Gym",
    emoji: "🧩",
    description: "Puzzles and drills that train deduction, pattern spotting and proof.",
    tools: &[ToolType::Quiz, ToolType::Checklist, ToolType::Flashcards],
    base_value: 1000,
    educational_goal: "Strengthen formal reasoning with daily puzzle reps",
    primary_color: "oklch(0.60 0.15 145)",
};

static RESEARCH_LIBRARY: ArchetypeDefinition = ArchetypeDefinition {
    id: "research-library",
    name: "Research Library",
    emoji: "📚",
    description: "A curated reading room of sources, summaries and key terms.",
    tools: &[ToolType::Glossary, ToolType::Content, ToolType::ConceptMap],
    base_value: 1100,
    educational_goal: "Practice evaluating sources and synthesizing evidence",
    primary_color: "oklch(0.50 0.08 60)",
};

static QUANTUM_VISUALIZER: ArchetypeDefinition = ArchetypeDefinition {
    id: "quantum-visualizer",
    name: "Quantum Visualizer",
    emoji: "🌀",
    description: "Visual explorations of superposition, entanglement and probability waves.",
    tools: &[ToolType::Simulation, ToolType::DataChart, ToolType::Glossary],
    base_value: 1500,
    educational_goal: "Make counter-intuitive quantum ideas visible and testable",
    primary_color: "oklch(0.55 0.22 300)",
};

static COSMIC_OBSERVATORY: ArchetypeDefinition = ArchetypeDefinition {
    id: "cosmic-observatory",
    name: "Cosmic Observatory",
    emoji: "🔭",
    description: "Star charts, orbital data and the scale of the universe.",
    tools: &[ToolType::DataChart, ToolType::Simulation, ToolType::Timeline],
    base_value: 1300,
    educational_goal: "Understand scale, distance and motion in the cosmos",
    primary_color: "oklch(0.35 0.12 270)",
};

static CODE_FORGE: ArchetypeDefinition = ArchetypeDefinition {
    id: "code-forge",
    name: "Code Forge",
    emoji: "💻",
    description: "Hands-on coding challenges with a live sandbox.",
    tools: &[ToolType::CodeSandbox, ToolType::Checklist, ToolType::Quiz],
    base_value: 1400,
    educational_goal: "Learn programming by building small working programs",
    primary_color: "oklch(0.45 0.10 180)",
};

static MATH_ARENA: ArchetypeDefinition = ArchetypeDefinition {
    id: "math-arena",
    name: "Math Arena",
    emoji: "📐",
    description: "Timed problem sets, calculators and worked examples.",
    tools: &[ToolType::Calculator, ToolType::Quiz, ToolType::DataChart],
    base_value: 1100,
    educational_goal: "Gain fluency through deliberate problem-solving practice",
    primary_color: "oklch(0.65 0.16 40)",
};

static HISTORY_TIMELINE: ArchetypeDefinition = ArchetypeDefinition {
    id: "history-timeline",
    name: "History Timeline",
    emoji: "🏛️",
    description: "Events, causes and consequences laid out across time.",
    tools: &[ToolType::Timeline, ToolType::Quiz, ToolType::Glossary],
    base_value: 1000,
    educational_goal: "Connect events into causal narratives",
    primary_color: "oklch(0.55 0.10 75)",
};

static BIOLOGY_LAB: ArchetypeDefinition = ArchetypeDefinition {
    id: "biology-lab",
    name: "Biology Lab",
    emoji: "🧬",
    description: "Cells, genes and ecosystems explored through models and diagrams.",
    tools: &[ToolType::ConceptMap, ToolType::Simulation, ToolType::Flashcards],
    base_value: 1200,
    educational_goal: "See how living systems are organized from molecules to biomes",
    primary_color: "oklch(0.60 0.17 150)",
};

static MIND_PALACE: ArchetypeDefinition = ArchetypeDefinition {
    id: "mind-palace",
    name: "Mind Palace",
    emoji: "🧠",
    description: "Memory techniques and spaced repetition for anything worth keeping.",
    tools: &[ToolType::Flashcards, ToolType::ConceptMap, ToolType::Quiz],
    base_value: 1000,
    educational_goal: "Retain more with spaced repetition and vivid association",
    primary_color: "oklch(0.58 0.19 330)",
};

static OCEAN_EXPLORER: ArchetypeDefinition = ArchetypeDefinition {
    id: "ocean-explorer",
    name: "Ocean Explorer",
    emoji: "🌊",
    description: "Currents, climate and marine life mapped and charted.",
    tools: &[ToolType::DataChart, ToolType::ConceptMap, ToolType::Poll],
    base_value: 1100,
    educational_goal: "Understand the ocean's role in Earth's climate system",
    primary_color: "oklch(0.55 0.14 220)",
};

static STORY_STUDIO: ArchetypeDefinition = ArchetypeDefinition {
    id: "story-studio",
    name: "Story Studio",
    emoji: "✍️",
    description: "Writing prompts, structure guides and reader polls.",
    tools: &[ToolType::Content, ToolType::Poll, ToolType::Checklist],
    base_value: 900,
    educational_goal: "Develop voice and structure through guided writing",
    primary_color: "oklch(0.62 0.12 20)",
};

static INFINITY_NEXUS: ArchetypeDefinition = ArchetypeDefinition {
    id: "infinity-nexus",
    name: "Infinity Nexus",
    emoji: "♾️",
    description: "A rare convergence world that blends every discipline.",
    tools: &[
        ToolType::Simulation,
        ToolType::CodeSandbox,
        ToolType::DataChart,
        ToolType::Quiz,
    ],
    base_value: 5000,
    educational_goal: "Cross-pollinate ideas across every field of study",
    primary_color: "oklch(0.75 0.15 85)",
};

// =============================================================================
// Validation
// =============================================================================

/// Check catalog invariants. Run once at startup; any error here is a
/// configuration bug, not a runtime condition.
pub fn validate_catalog() -> Result<(), SparkError> {
    let mut seen = HashSet::new();
    for archetype in Archetype::ALL {
        let def = archetype.definition();
        if !seen.insert(def.id) {
            return Err(SparkError::ClassificationAmbiguous(format!(
                "duplicate archetype id {}",
                def.id
            )));
        }
        if Archetype::from_id(def.id) != Some(archetype) {
            return Err(SparkError::ClassificationAmbiguous(format!(
                "archetype id {} does not resolve to itself",
                def.id
            )));
        }
        if def.tools.is_empty() {
            return Err(SparkError::ClassificationAmbiguous(format!(
                "archetype {} has no default tools",
                def.id
            )));
        }
    }

    for symbol in SYMBOLS {
        let affinity = Archetype::affinity(symbol);
        if affinity == Archetype::JACKPOT {
            return Err(SparkError::ClassificationAmbiguous(format!(
                "symbol {} has the jackpot world as its pair affinity",
                symbol.name()
            )));
        }
        let jackpot = symbol.jackpot_multiplier();
        if !(5.0..=10.0).contains(&jackpot) {
            return Err(SparkError::ClassificationAmbiguous(format!(
                "jackpot multiplier {jackpot} for {} outside [5, 10]",
                symbol.name()
            )));
        }
        let pair = symbol.pair_multiplier();
        if !(2.0..5.0).contains(&pair) {
            return Err(SparkError::ClassificationAmbiguous(format!(
                "pair multiplier {pair} for {} outside [2, 5)",
                symbol.name()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_valid() {
        validate_catalog().unwrap();
    }

    #[test]
    fn serde_id_matches_definition_id() {
        for archetype in Archetype::ALL {
            let json = serde_json::to_string(&archetype).unwrap();
            assert_eq!(json, format!("\"{}\"", archetype.id()));
        }
    }

    #[test]
    fn learning_worlds_exclude_jackpot() {
        assert!(!Archetype::LEARNING_WORLDS.contains(&Archetype::JACKPOT));
        assert_eq!(Archetype::LEARNING_WORLDS.len() + 1, Archetype::ALL.len());
    }

    #[test]
    fn every_learning_world_is_some_symbols_affinity() {
        let reachable: HashSet<Archetype> = SYMBOLS.iter().map(|s| Archetype::affinity(*s)).collect();
        for world in Archetype::LEARNING_WORLDS {
            assert!(reachable.contains(&world), "{world} unreachable from pairs");
        }
    }

    #[test]
    fn parse_unknown_archetype_fails() {
        assert!("atlantis".parse::<Archetype>().is_err());
        assert_eq!(
            "logic-gym".parse::<Archetype>().unwrap(),
            Archetype::LogicGym
        );
    }
}
