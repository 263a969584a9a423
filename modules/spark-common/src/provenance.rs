//! Frozen record of the inputs behind a creation outcome.
//!
//! Passed to downstream artifact creation as an opaque JSON string.

use serde::{Deserialize, Serialize};

use crate::catalog::Archetype;
use crate::error::SparkError;
use crate::symbols::Combination;
use crate::types::{BehaviorSignals, ClassificationResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Provenance {
    Spin(SpinProvenance),
    Manual(ManualProvenance),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinProvenance {
    pub combination: Combination,
    pub archetype: Archetype,
    pub rarity_multiplier: f64,
    pub behavior_signals: BehaviorSignals,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualProvenance {
    pub manual: bool,
    pub archetype: Archetype,
}

impl Provenance {
    pub fn spin(
        combination: Combination,
        classification: &ClassificationResult,
        behavior_signals: BehaviorSignals,
    ) -> Self {
        Provenance::Spin(SpinProvenance {
            combination,
            archetype: classification.archetype,
            rarity_multiplier: classification.rarity_multiplier,
            behavior_signals,
            display_name: classification.display_name.clone(),
        })
    }

    /// Provenance for an archetype picked from the catalog instead of spun.
    pub fn manual(archetype: Archetype) -> Self {
        Provenance::Manual(ManualProvenance {
            manual: true,
            archetype,
        })
    }

    pub fn archetype(&self) -> Archetype {
        match self {
            Provenance::Spin(p) => p.archetype,
            Provenance::Manual(p) => p.archetype,
        }
    }

    /// Manual selections always carry the neutral multiplier.
    pub fn rarity_multiplier(&self) -> f64 {
        match self {
            Provenance::Spin(p) => p.rarity_multiplier,
            Provenance::Manual(_) => 1.0,
        }
    }

    pub fn to_json_string(&self) -> Result<String, SparkError> {
        serde_json::to_string(self)
            .map_err(|e| SparkError::Anyhow(anyhow::anyhow!("provenance encoding: {e}")))
    }

    pub fn from_json_str(s: &str) -> Result<Self, SparkError> {
        serde_json::from_str(s)
            .map_err(|e| SparkError::Anyhow(anyhow::anyhow!("provenance decoding: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Symbol;
    use crate::types::RarityTier;

    fn classification() -> ClassificationResult {
        ClassificationResult {
            archetype: Archetype::StoryStudio,
            tier: RarityTier::Rare,
            display_name: "Twin Moon Story Studio".to_string(),
            rarity_multiplier: 2.5,
        }
    }

    #[test]
    fn spin_payload_shape() {
        let combo = Combination::new(Symbol::Moon, Symbol::Moon, Symbol::Star);
        let signals = BehaviorSignals {
            hover_time_ms: 400,
            hesitation_count: 1,
            decision_latency_ms: 2000,
        };
        let provenance = Provenance::spin(combo, &classification(), signals);
        let json: serde_json::Value =
            serde_json::from_str(&provenance.to_json_string().unwrap()).unwrap();

        assert_eq!(json["combination"][0], "🌙");
        assert_eq!(json["archetype"], "story-studio");
        assert_eq!(json["rarityMultiplier"], 2.5);
        assert_eq!(json["behaviorSignals"]["hoverTime"], 400);
        assert_eq!(json["displayName"], "Twin Moon Story Studio");
    }

    #[test]
    fn manual_payload_shape() {
        let provenance = Provenance::manual(Archetype::LogicGym);
        assert_eq!(
            provenance.to_json_string().unwrap(),
            r#"{"manual":true,"archetype":"logic-gym"}"#
        );
        assert_eq!(provenance.rarity_multiplier(), 1.0);
    }

    #[test]
    fn decodes_both_variants() {
        let manual = Provenance::from_json_str(r#"{"manual":true,"archetype":"math-arena"}"#)
            .unwrap();
        assert_eq!(manual, Provenance::manual(Archetype::MathArena));

        let combo = Combination::new(Symbol::Moon, Symbol::Moon, Symbol::Star);
        let spin = Provenance::spin(combo, &classification(), BehaviorSignals::default());
        let back = Provenance::from_json_str(&spin.to_json_string().unwrap()).unwrap();
        assert_eq!(back, spin);
    }
}
