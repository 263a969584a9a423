//! Combination → (archetype, rarity tier, multiplier).
//!
//! Pure and table driven. Every rule reads from the symbol tables and the
//! archetype catalog in `spark-common`; nothing here is random.

use sha2::{Digest, Sha256};
use tracing::debug;

use spark_common::{
    Archetype, BehaviorSignals, ClassificationResult, Combination, RarityTier, SparkError, Symbol,
};

/// Smallest step kept between a weighted multiplier and an exclusive tier ceiling.
const CEILING_MARGIN: f64 = 0.01;

pub fn classify(combination: &Combination) -> ClassificationResult {
    let [a, b, c] = combination.symbols();

    if a == b && b == c {
        return jackpot(a);
    }

    let paired = if a == b || a == c {
        Some(a)
    } else if b == c {
        Some(b)
    } else {
        None
    };

    match paired {
        Some(symbol) => rare(symbol),
        None => common(combination),
    }
}

/// Classify raw glyph input, rejecting bad arity or unknown glyphs.
pub fn classify_glyphs<S: AsRef<str>>(glyphs: &[S]) -> Result<ClassificationResult, SparkError> {
    let combination = Combination::from_glyphs(glyphs)?;
    Ok(classify(&combination))
}

fn jackpot(symbol: Symbol) -> ClassificationResult {
    ClassificationResult {
        archetype: Archetype::JACKPOT,
        tier: RarityTier::Jackpot,
        display_name: format!("{} Jackpot: {}", symbol.name(), Archetype::JACKPOT.name()),
        rarity_multiplier: symbol.jackpot_multiplier(),
    }
}

fn rare(symbol: Symbol) -> ClassificationResult {
    let archetype = Archetype::affinity(symbol);
    ClassificationResult {
        archetype,
        tier: RarityTier::Rare,
        display_name: format!("Twin {} {}", symbol.name(), archetype.name()),
        rarity_multiplier: symbol.pair_multiplier(),
    }
}

/// All-distinct combinations are keyed by a digest of the reel glyphs so that
/// reel order matters and every world stays reachable.
fn common(combination: &Combination) -> ClassificationResult {
    let digest = Sha256::digest(combination.glyphs().join("|").as_bytes());

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let slot = u64::from_be_bytes(head) % Archetype::LEARNING_WORLDS.len() as u64;
    let archetype = Archetype::LEARNING_WORLDS[slot as usize];

    let rarity_multiplier = 1.0 + 0.1 * f64::from(digest[8] % 5);

    ClassificationResult {
        archetype,
        tier: RarityTier::Common,
        display_name: archetype.name().to_string(),
        rarity_multiplier,
    }
}

// =============================================================================
// Behavior weighting
// =============================================================================

/// Optional multiplier bonus derived from interaction telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BehaviorWeighting {
    #[default]
    Off,
    Bounded {
        /// Bonus per full second of hover time.
        per_hover_second: f64,
        /// Bonus per recorded hesitation.
        per_hesitation: f64,
        /// Cap on the combined bonus before tier clamping.
        max_bonus: f64,
    },
}

impl BehaviorWeighting {
    /// The weighting used when `SPARK_BEHAVIOR_WEIGHTING` is on.
    pub fn standard() -> Self {
        BehaviorWeighting::Bounded {
            per_hover_second: 0.05,
            per_hesitation: 0.05,
            max_bonus: 0.5,
        }
    }

    pub fn from_flag(enabled: bool) -> Self {
        if enabled {
            Self::standard()
        } else {
            BehaviorWeighting::Off
        }
    }

    pub fn bonus(&self, signals: &BehaviorSignals) -> f64 {
        match *self {
            BehaviorWeighting::Off => 0.0,
            BehaviorWeighting::Bounded {
                per_hover_second,
                per_hesitation,
                max_bonus,
            } => {
                let hover_seconds = (signals.hover_time_ms / 1000) as f64;
                let raw = hover_seconds * per_hover_second
                    + f64::from(signals.hesitation_count) * per_hesitation;
                raw.clamp(0.0, max_bonus.max(0.0))
            }
        }
    }
}

/// `classify` plus a bounded behavior bonus that never crosses the tier ceiling.
pub fn classify_with_behavior(
    combination: &Combination,
    signals: &BehaviorSignals,
    weighting: &BehaviorWeighting,
) -> ClassificationResult {
    let mut result = classify(combination);
    let bonus = weighting.bonus(signals);
    if bonus <= 0.0 {
        return result;
    }

    let ceiling = match result.tier {
        RarityTier::Jackpot => result.tier.ceiling(),
        RarityTier::Common | RarityTier::Rare => result.tier.ceiling() - CEILING_MARGIN,
    };
    let weighted = (result.rarity_multiplier + bonus).min(ceiling);

    debug!(
        tier = %result.tier,
        base = result.rarity_multiplier,
        weighted,
        "Applied behavior weighting"
    );
    result.rarity_multiplier = weighted.max(result.rarity_multiplier);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_common::SYMBOLS;

    fn combo(a: Symbol, b: Symbol, c: Symbol) -> Combination {
        Combination::new(a, b, c)
    }

    #[test]
    fn triple_planet_is_infinity_nexus_jackpot() {
        let result = classify_glyphs(&["🪐", "🪐", "🪐"]).unwrap();
        assert_eq!(result.archetype, Archetype::InfinityNexus);
        assert_eq!(result.tier, RarityTier::Jackpot);
        assert!(result.rarity_multiplier >= 5.0);
        assert_eq!(result.display_name, "Planet Jackpot: Infinity Nexus");
    }

    #[test]
    fn pair_is_rare_in_any_position() {
        for c in [
            combo(Symbol::Planet, Symbol::Planet, Symbol::Moon),
            combo(Symbol::Planet, Symbol::Moon, Symbol::Planet),
            combo(Symbol::Moon, Symbol::Planet, Symbol::Planet),
        ] {
            let result = classify(&c);
            assert_eq!(result.tier, RarityTier::Rare, "{c}");
            assert_eq!(result.archetype, Archetype::CosmicObservatory);
            assert!((2.0..5.0).contains(&result.rarity_multiplier));
            assert_eq!(result.display_name, "Twin Planet Cosmic Observatory");
        }
    }

    #[test]
    fn distinct_is_common_learning_world() {
        let result = classify_glyphs(&["🪐", "🌙", "⭐"]).unwrap();
        assert_eq!(result.tier, RarityTier::Common);
        assert!((1.0..2.0).contains(&result.rarity_multiplier));
        assert_ne!(result.archetype, Archetype::InfinityNexus);
        assert_eq!(result.display_name, result.archetype.name());
    }

    #[test]
    fn classification_is_deterministic() {
        let c = combo(Symbol::Atom, Symbol::Helix, Symbol::Wave);
        assert_eq!(classify(&c), classify(&c));
    }

    #[test]
    fn every_combination_lands_in_its_tier_band() {
        for a in SYMBOLS {
            for b in SYMBOLS {
                for c in SYMBOLS {
                    let result = classify(&combo(a, b, c));
                    let m = result.rarity_multiplier;
                    match result.tier {
                        RarityTier::Jackpot => {
                            assert!(a == b && b == c);
                            assert!((5.0..=10.0).contains(&m));
                            assert_eq!(result.archetype, Archetype::InfinityNexus);
                        }
                        RarityTier::Rare => {
                            assert!((2.0..5.0).contains(&m));
                            assert_ne!(result.archetype, Archetype::InfinityNexus);
                        }
                        RarityTier::Common => {
                            assert!(a != b && b != c && a != c);
                            assert!((1.0..2.0).contains(&m));
                            assert_ne!(result.archetype, Archetype::InfinityNexus);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn every_learning_world_reachable_from_common() {
        let mut seen = std::collections::HashSet::new();
        for a in SYMBOLS {
            for b in SYMBOLS {
                for c in SYMBOLS {
                    if a != b && b != c && a != c {
                        seen.insert(classify(&combo(a, b, c)).archetype);
                    }
                }
            }
        }
        assert_eq!(seen.len(), Archetype::LEARNING_WORLDS.len());
    }

    #[test]
    fn bad_arity_rejected() {
        assert!(matches!(
            classify_glyphs(&["🪐", "🌙"]),
            Err(SparkError::InvalidCombination(_))
        ));
        assert!(matches!(
            classify_glyphs(&["🪐", "🌙", "🍕"]),
            Err(SparkError::InvalidCombination(_))
        ));
    }

    #[test]
    fn weighting_off_matches_plain_classification() {
        let c = combo(Symbol::Gem, Symbol::Gem, Symbol::Star);
        let signals = BehaviorSignals {
            hover_time_ms: 60_000,
            hesitation_count: 40,
            decision_latency_ms: 90_000,
        };
        assert_eq!(
            classify_with_behavior(&c, &signals, &BehaviorWeighting::Off),
            classify(&c)
        );
    }

    #[test]
    fn weighting_never_crosses_tier_ceiling() {
        let signals = BehaviorSignals {
            hover_time_ms: 600_000,
            hesitation_count: 500,
            decision_latency_ms: 600_000,
        };
        let heavy = BehaviorWeighting::Bounded {
            per_hover_second: 1.0,
            per_hesitation: 1.0,
            max_bonus: 100.0,
        };

        let common = classify_with_behavior(
            &combo(Symbol::Planet, Symbol::Moon, Symbol::Star),
            &signals,
            &heavy,
        );
        assert!(common.rarity_multiplier < 2.0);

        let rare = classify_with_behavior(
            &combo(Symbol::Wave, Symbol::Wave, Symbol::Star),
            &signals,
            &heavy,
        );
        assert!(rare.rarity_multiplier < 5.0);

        let jackpot = classify_with_behavior(
            &combo(Symbol::Flame, Symbol::Flame, Symbol::Flame),
            &signals,
            &heavy,
        );
        assert!(jackpot.rarity_multiplier <= 10.0);
    }

    #[test]
    fn standard_weighting_adds_bounded_bonus() {
        let c = combo(Symbol::Moon, Symbol::Moon, Symbol::Star);
        let signals = BehaviorSignals {
            hover_time_ms: 2_500,
            hesitation_count: 2,
            decision_latency_ms: 4_000,
        };
        let base = classify(&c).rarity_multiplier;
        let weighted = classify_with_behavior(&c, &signals, &BehaviorWeighting::standard());
        // 2 whole seconds and 2 hesitations
        assert!((weighted.rarity_multiplier - (base + 0.2)).abs() < 1e-9);
    }
}
