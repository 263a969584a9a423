//! Spin → finalize → world creation.

use chrono::Utc;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use spark_common::{
    Archetype, BehaviorSignals, ClassificationResult, Combination, Provenance, SparkError, Theme,
    Token, Wallet, Website,
};

use crate::behavior::{BehaviorAggregator, SessionHandle};
use crate::classifier::{classify_with_behavior, BehaviorWeighting};
use crate::mint::{attach_page, build_website, mint_token};
use crate::synthesis::Synthesizer;

/// Everything a finalized spin produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinOutcome {
    pub combination: Combination,
    pub classification: ClassificationResult,
    pub signals: BehaviorSignals,
    pub provenance: Provenance,
}

/// One spin-to-finalize interaction. Behavior is recorded on `behavior()`
/// until `finalize` consumes the session.
pub struct CreationSession {
    behavior: SessionHandle,
    weighting: BehaviorWeighting,
    combination: Option<Combination>,
}

impl CreationSession {
    pub fn start(aggregator: &BehaviorAggregator, weighting: BehaviorWeighting) -> Self {
        Self {
            behavior: aggregator.start(),
            weighting,
            combination: None,
        }
    }

    pub fn behavior(&self) -> &SessionHandle {
        &self.behavior
    }

    /// Sample a fresh combination. Re-spinning replaces the previous result.
    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Combination {
        let combination = Combination::sample(rng);
        self.combination = Some(combination);
        combination
    }

    /// Use a known combination instead of sampling one.
    pub fn land(&mut self, combination: Combination) {
        self.combination = Some(combination);
    }

    pub fn combination(&self) -> Option<Combination> {
        self.combination
    }

    pub fn finalize(self) -> Result<SpinOutcome, SparkError> {
        let combination = self
            .combination
            .ok_or_else(|| SparkError::InvalidCombination("session finalized before any spin".into()))?;
        let signals = self.behavior.finalize();
        let classification = classify_with_behavior(&combination, &signals, &self.weighting);
        let provenance = Provenance::spin(combination, &classification, signals);

        info!(
            combination = %combination,
            archetype = %classification.archetype,
            tier = %classification.tier,
            multiplier = classification.rarity_multiplier,
            "Spin finalized"
        );

        Ok(SpinOutcome {
            combination,
            classification,
            signals,
            provenance,
        })
    }
}

/// A website and the token minted for it at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Creation {
    pub website: Website,
    pub token: Token,
}

/// Turns spin outcomes or catalog picks into websites and tokens.
#[derive(Clone)]
pub struct WorldCreator {
    synthesizer: Synthesizer,
}

impl WorldCreator {
    pub fn new(synthesizer: Synthesizer) -> Self {
        Self { synthesizer }
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    /// The synthesis query for a world: `"<name>: <educational goal>"`.
    pub fn query_for(archetype: Archetype) -> String {
        let def = archetype.definition();
        format!("{}: {}", def.name, def.educational_goal)
    }

    pub async fn create_from_spin(
        &self,
        outcome: &SpinOutcome,
        wallet: &mut Wallet,
        theme: Theme,
    ) -> Creation {
        self.create(outcome.provenance.clone(), wallet, theme).await
    }

    pub async fn create_manual(
        &self,
        archetype: Archetype,
        wallet: &mut Wallet,
        theme: Theme,
    ) -> Creation {
        self.create(Provenance::manual(archetype), wallet, theme).await
    }

    async fn create(&self, provenance: Provenance, wallet: &mut Wallet, theme: Theme) -> Creation {
        let archetype = provenance.archetype();
        let owner = wallet.address().to_string();
        let draft = self
            .synthesizer
            .synthesize_website_for(&Self::query_for(archetype), &owner, Some(archetype))
            .await;

        let now = Utc::now();
        let website = build_website(draft, provenance, theme, &owner, now);
        let token = mint_token(&website, now);
        wallet.deposit(token.clone());

        info!(
            website_id = %website.id,
            archetype = %archetype,
            value = token.value,
            balance = wallet.balance(),
            "World created"
        );
        Creation { website, token }
    }

    /// Synthesize a page about `page_query` and append it. Existing tokens
    /// keep their value; mint again to capture the new total.
    pub async fn add_page(&self, website: &mut Website, page_query: &str) -> Uuid {
        let draft = self
            .synthesizer
            .synthesize_page(&website.title, page_query, &website.owner)
            .await;
        attach_page(website, draft, Utc::now())
    }
}
