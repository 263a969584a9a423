//! The reel alphabet and symbol combinations.
//!
//! The alphabet is published configuration shared by reel rendering and the
//! combination classifier. Its order is significant: a symbol's rank indexes
//! rarity tables and must never be reshuffled.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SparkError;

const VARIATION_SELECTOR: char = '\u{FE0F}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Symbol {
    Planet,
    Moon,
    Star,
    Comet,
    Galaxy,
    Telescope,
    Atom,
    Helix,
    Mind,
    Gem,
    Flame,
    Wave,
}

/// The ordered reel alphabet.
pub const SYMBOLS: [Symbol; 12] = [
    Symbol::Planet,
    Symbol::Moon,
    Symbol::Star,
    Symbol::Comet,
    Symbol::Galaxy,
    Symbol::Telescope,
    Symbol::Atom,
    Symbol::Helix,
    Symbol::Mind,
    Symbol::Gem,
    Symbol::Flame,
    Symbol::Wave,
];

impl Symbol {
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Planet => "🪐",
            Symbol::Moon => "🌙",
            Symbol::Star => "⭐",
            Symbol::Comet => "☄\u{FE0F}",
            Symbol::Galaxy => "🌌",
            Symbol::Telescope => "🔭",
            Symbol::Atom => "⚛\u{FE0F}",
            Symbol::Helix => "🧬",
            Symbol::Mind => "🧠",
            Symbol::Gem => "💎",
            Symbol::Flame => "🔥",
            Symbol::Wave => "🌊",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Symbol::Planet => "Planet",
            Symbol::Moon => "Moon",
            Symbol::Star => "Star",
            Symbol::Comet => "Comet",
            Symbol::Galaxy => "Galaxy",
            Symbol::Telescope => "Telescope",
            Symbol::Atom => "Atom",
            Symbol::Helix => "Helix",
            Symbol::Mind => "Mind",
            Symbol::Gem => "Gem",
            Symbol::Flame => "Flame",
            Symbol::Wave => "Wave",
        }
    }

    /// Position in the published alphabet.
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Multiplier awarded when all three reels land on this symbol.
    /// Always within [5.0, 10.0].
    pub fn jackpot_multiplier(self) -> f64 {
        match self {
            Symbol::Planet => 10.0,
            Symbol::Gem => 9.5,
            Symbol::Galaxy => 9.0,
            Symbol::Mind => 8.5,
            Symbol::Comet => 8.0,
            Symbol::Atom => 7.5,
            Symbol::Star => 7.0,
            Symbol::Helix => 6.5,
            Symbol::Moon => 6.0,
            Symbol::Telescope => 5.5,
            Symbol::Flame => 5.0,
            Symbol::Wave => 5.0,
        }
    }

    /// Multiplier awarded when exactly two reels share this symbol.
    /// Always within [2.0, 3.5].
    pub fn pair_multiplier(self) -> f64 {
        2.0 + 0.5 * (self.rank() % 4) as f64
    }

    /// Look up a symbol by glyph. The emoji variation selector is optional.
    pub fn from_glyph(glyph: &str) -> Option<Symbol> {
        let wanted = glyph.trim().trim_end_matches(VARIATION_SELECTOR);
        SYMBOLS
            .iter()
            .copied()
            .find(|s| s.glyph().trim_end_matches(VARIATION_SELECTOR) == wanted)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl FromStr for Symbol {
    type Err = SparkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::from_glyph(s)
            .ok_or_else(|| SparkError::InvalidCombination(format!("unknown symbol {s:?}")))
    }
}

impl TryFrom<String> for Symbol {
    type Error = SparkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.glyph().to_string()
    }
}

// =============================================================================
// Combination
// =============================================================================

/// One symbol per reel, in reel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combination([Symbol; 3]);

impl Combination {
    pub fn new(first: Symbol, second: Symbol, third: Symbol) -> Self {
        Self([first, second, third])
    }

    /// Build a combination from raw glyph text, rejecting wrong arity and
    /// glyphs outside the alphabet.
    pub fn from_glyphs<S: AsRef<str>>(glyphs: &[S]) -> Result<Self, SparkError> {
        if glyphs.len() != 3 {
            return Err(SparkError::InvalidCombination(format!(
                "expected 3 symbols, got {}",
                glyphs.len()
            )));
        }
        let first = glyphs[0].as_ref().parse()?;
        let second = glyphs[1].as_ref().parse()?;
        let third = glyphs[2].as_ref().parse()?;
        Ok(Self::new(first, second, third))
    }

    /// Each reel lands independently and uniformly on the alphabet.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let first = SYMBOLS[rng.random_range(0..SYMBOLS.len())];
        let second = SYMBOLS[rng.random_range(0..SYMBOLS.len())];
        let third = SYMBOLS[rng.random_range(0..SYMBOLS.len())];
        Self::new(first, second, third)
    }

    pub fn symbols(&self) -> [Symbol; 3] {
        self.0
    }

    pub fn glyphs(&self) -> [&'static str; 3] {
        self.0.map(Symbol::glyph)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.0[0], self.0[1], self.0[2])
    }
}
