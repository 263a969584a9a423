//! End-to-end creation flow: spin, record behavior, finalize, synthesize,
//! mint, and extend, with a scripted text generator.

use std::sync::Arc;
use std::time::Duration;

use ai_client::TextGenerator;
use spark_common::{
    Archetype, Combination, Provenance, RarityTier, Symbol, Theme, ToolKind, ToolType, Wallet,
};
use spark_engine::testing::MockGenerator;
use spark_engine::valuation::{value_at, BASE_VALUE};
use spark_engine::{
    BehaviorAggregator, BehaviorWeighting, CreationSession, Synthesizer, WorldCreator,
};

fn creator_with(generator: MockGenerator) -> (WorldCreator, Arc<MockGenerator>) {
    let generator = Arc::new(generator);
    let synthesizer = Synthesizer::new(
        Some(generator.clone() as Arc<dyn TextGenerator>),
        Duration::from_secs(5),
        4,
    );
    (WorldCreator::new(synthesizer), generator)
}

#[tokio::test]
async fn rare_spin_becomes_a_minted_world() {
    let (creator, generator) = creator_with(MockGenerator::new().with_response(
        r###"{"title":"Stories Written by Moonlight","description":"Guided writing","content":"## Begin\n\nWrite."}"###,
    ));

    let aggregator = BehaviorAggregator::new(Duration::from_millis(10));
    let mut session = CreationSession::start(&aggregator, BehaviorWeighting::Off);
    session.behavior().begin_hover().unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;
    session.behavior().end_hover().unwrap();
    session.land(Combination::new(Symbol::Moon, Symbol::Star, Symbol::Moon));

    let outcome = session.finalize().unwrap();
    assert_eq!(outcome.classification.tier, RarityTier::Rare);
    assert_eq!(outcome.classification.archetype, Archetype::StoryStudio);
    assert_eq!(outcome.signals.hesitation_count, 1);
    assert!(outcome.signals.hover_time_ms > 0);

    let mut wallet = Wallet::new("0xfeedface");
    let creation = creator
        .create_from_spin(&outcome, &mut wallet, Theme::Cosmic)
        .await;

    assert_eq!(creation.website.title, "Stories Written by Moonlight");
    assert_eq!(creation.website.archetype, Archetype::StoryStudio);
    assert_eq!(creation.website.rarity_multiplier, outcome.classification.rarity_multiplier);
    assert_eq!(creation.website.content, "## Begin\n\nWrite.");

    // no keyword in the archetype query, so the archetype's default tools apply
    let tools: Vec<ToolKind> = creation
        .website
        .tools
        .iter()
        .map(|t| t.tool_type().clone())
        .collect();
    assert_eq!(
        tools,
        vec![
            ToolKind::Known(ToolType::Content),
            ToolKind::Known(ToolType::Poll),
            ToolKind::Known(ToolType::Checklist),
        ]
    );
    assert_eq!(
        creation.token.value,
        BASE_VALUE
            + ToolType::Content.weight()
            + ToolType::Poll.weight()
            + ToolType::Checklist.weight()
    );
    assert_eq!(wallet.balance(), creation.token.value);
    assert_eq!(generator.call_count(), 1);

    // the synthesis query is derived from the archetype
    let prompts = generator.prompts();
    assert!(prompts[0].contains("Story Studio: Develop voice and structure through guided writing"));

    let json = creation.website.provenance.to_json_string().unwrap();
    let decoded = Provenance::from_json_str(&json).unwrap();
    assert_eq!(decoded, outcome.provenance);
}

#[tokio::test]
async fn offline_creation_degrades_but_completes() {
    let (creator, _) = creator_with(MockGenerator::new().failing("connection refused"));

    let mut session = CreationSession::start(&BehaviorAggregator::default(), BehaviorWeighting::Off);
    session.land(Combination::new(Symbol::Gem, Symbol::Gem, Symbol::Gem));
    let outcome = session.finalize().unwrap();
    assert_eq!(outcome.classification.archetype, Archetype::InfinityNexus);
    assert!(outcome.classification.rarity_multiplier >= 5.0);

    let mut wallet = Wallet::generate();
    let creation = creator
        .create_from_spin(&outcome, &mut wallet, Theme::Vibrant)
        .await;

    let query = WorldCreator::query_for(Archetype::InfinityNexus);
    assert_eq!(creation.website.title, query);
    assert_eq!(creation.website.description, "An Infinity-powered website");
    assert!(!creation.website.tools.is_empty());
    assert_eq!(wallet.balance(), creation.token.value);
}

#[tokio::test]
async fn page_additions_raise_value_but_not_old_tokens() {
    let (creator, _) = creator_with(MockGenerator::new().failing("offline"));
    let mut wallet = Wallet::new("0xabc");

    let first = creator
        .create_manual(Archetype::MathArena, &mut wallet, Theme::Minimal)
        .await;
    let mut website = first.website;
    let before = value_at(&website, chrono::Utc::now());

    creator
        .add_page(&mut website, "Quiz me on quadratic equations")
        .await;
    let after = value_at(&website, chrono::Utc::now());

    assert!(after >= before + 100);
    assert_eq!(wallet.tokens()[0].value, first.token.value);
    assert_eq!(
        website.tools.last().map(|t| t.tool_type().clone()),
        Some(ToolKind::Known(ToolType::Calculator))
    );
}

#[tokio::test]
async fn weighting_keeps_common_spins_common() {
    let mut session = CreationSession::start(
        &BehaviorAggregator::default(),
        BehaviorWeighting::Bounded {
            per_hover_second: 5.0,
            per_hesitation: 5.0,
            max_bonus: 50.0,
        },
    );
    for _ in 0..20 {
        session.behavior().record_hesitation().unwrap();
    }
    session.behavior().record_hover_tick(30_000).unwrap();
    session.land(Combination::new(Symbol::Planet, Symbol::Moon, Symbol::Star));

    let outcome = session.finalize().unwrap();
    assert_eq!(outcome.classification.tier, RarityTier::Common);
    assert!(outcome.classification.rarity_multiplier < 2.0);
}
