use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Archetype;
use crate::provenance::Provenance;
use crate::tools::ToolComponent;

// --- Classification ---

/// Outcome desirability tier. Ordered: `Common < Rare < Jackpot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RarityTier {
    /// All three reels distinct
    Common,
    /// Exactly two reels match
    Rare,
    /// All three reels match
    Jackpot,
}

impl RarityTier {
    /// Exclusive upper bound on multipliers within this tier (jackpot is inclusive).
    pub fn ceiling(self) -> f64 {
        match self {
            RarityTier::Common => 2.0,
            RarityTier::Rare => 5.0,
            RarityTier::Jackpot => 10.0,
        }
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RarityTier::Common => write!(f, "common"),
            RarityTier::Rare => write!(f, "rare"),
            RarityTier::Jackpot => write!(f, "jackpot"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub archetype: Archetype,
    pub tier: RarityTier,
    pub display_name: String,
    pub rarity_multiplier: f64,
}

// --- Behavior ---

/// Interaction telemetry captured during one creation session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorSignals {
    #[serde(rename = "hoverTime")]
    pub hover_time_ms: u64,
    pub hesitation_count: u32,
    #[serde(rename = "decisionLatency")]
    pub decision_latency_ms: u64,
}

// --- Website ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Cosmic,
    Minimal,
    Editorial,
    Technical,
    Vibrant,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Cosmic,
        Theme::Minimal,
        Theme::Editorial,
        Theme::Technical,
        Theme::Vibrant,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Theme::Cosmic => "Cosmic",
            Theme::Minimal => "Minimal",
            Theme::Editorial => "Editorial",
            Theme::Technical => "Technical",
            Theme::Vibrant => "Vibrant",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Theme::Cosmic => "Deep space theme with vibrant accents",
            Theme::Minimal => "Clean and simple with focus on content",
            Theme::Editorial => "Magazine-style with elegant typography",
            Theme::Technical => "Code-inspired with monospace fonts",
            Theme::Vibrant => "Bold colors and energetic design",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A generated artifact. Owns its pages and tools.
///
/// The home content lives on the website itself; `pages` holds only pages
/// added after creation, which is what valuation counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: String,
    pub archetype: Archetype,
    pub rarity_multiplier: f64,
    pub theme: Theme,
    pub owner: String,
    pub pages: Vec<Page>,
    pub tools: Vec<ToolComponent>,
    pub created_at: DateTime<Utc>,
    pub provenance: Provenance,
}

impl Website {
    /// Append a page and the tools that came with it. Tokens already minted
    /// for this website keep their snapshot value.
    pub fn add_page(&mut self, page: Page, tools: Vec<ToolComponent>) {
        self.pages.push(page);
        self.tools.extend(tools);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}

// --- Token / Wallet ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub title: String,
    pub archetype: Archetype,
    pub rarity_multiplier: f64,
    pub page_count: usize,
    pub tool_count: usize,
}

/// Immutable value snapshot of one website at mint time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: Uuid,
    pub website_id: Uuid,
    pub value: u64,
    pub metadata: TokenMetadata,
    pub created_at: DateTime<Utc>,
}

/// Long-lived holder of tokens. `balance` always equals the sum of token values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    address: String,
    tokens: Vec<Token>,
    balance: u64,
}

impl Wallet {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            tokens: Vec::new(),
            balance: 0,
        }
    }

    /// A fresh `0x`-prefixed address derived from a random UUID.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self::new(format!("0x{}", &hex[..18]))
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn deposit(&mut self, token: Token) {
        self.balance = self.balance.saturating_add(token.value);
        self.tokens.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(value: u64) -> Token {
        Token {
            id: Uuid::new_v4(),
            website_id: Uuid::new_v4(),
            value,
            metadata: TokenMetadata {
                title: "Orbits".to_string(),
                archetype: Archetype::CosmicObservatory,
                rarity_multiplier: 1.0,
                page_count: 0,
                tool_count: 0,
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(RarityTier::Jackpot > RarityTier::Rare);
        assert!(RarityTier::Rare > RarityTier::Common);
    }

    #[test]
    fn wallet_balance_tracks_deposits() {
        let mut wallet = Wallet::new("0xabc");
        wallet.deposit(token(1200));
        wallet.deposit(token(1050));

        let sum: u64 = wallet.tokens().iter().map(|t| t.value).sum();
        assert_eq!(wallet.balance(), sum);
        assert_eq!(wallet.balance(), 2250);
    }

    #[test]
    fn generated_wallet_address_shape() {
        let wallet = Wallet::generate();
        assert!(wallet.address().starts_with("0x"));
        assert_eq!(wallet.address().len(), 20);
        assert_eq!(wallet.balance(), 0);
    }

    #[test]
    fn behavior_signals_use_provenance_field_names() {
        let signals = BehaviorSignals {
            hover_time_ms: 300,
            hesitation_count: 2,
            decision_latency_ms: 1500,
        };
        let json = serde_json::to_value(signals).unwrap();
        assert_eq!(json["hoverTime"], 300);
        assert_eq!(json["hesitationCount"], 2);
        assert_eq!(json["decisionLatency"], 1500);
    }

    #[test]
    fn theme_defaults_to_cosmic() {
        assert_eq!(Theme::default(), Theme::Cosmic);
        assert_eq!(serde_json::to_string(&Theme::Technical).unwrap(), "\"technical\"");
    }
}
