use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::{OpenAi, TextGenerator};
use spark_common::{validate_catalog, Archetype, Combination, Config, Theme, Wallet, Website};
use spark_engine::{
    classify_glyphs, value, BehaviorAggregator, BehaviorWeighting, ClassifyOptions,
    CreationSession, Synthesizer, WorldCreator,
};

#[derive(Parser)]
#[command(name = "spark", about = "Infinity Spark world classification and valuation")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Spin the reels, finalize the session and create the resulting world
    Spin {
        /// Land on these three glyphs instead of sampling
        #[arg(long, num_args = 3, value_name = "GLYPH")]
        glyphs: Option<Vec<String>>,
        /// Simulated hover time before the decision, in milliseconds
        #[arg(long, default_value_t = 0)]
        hover_ms: u64,
        /// Simulated hesitations before the decision
        #[arg(long, default_value_t = 0)]
        hesitations: u32,
        /// Stop after classification without synthesizing a world
        #[arg(long)]
        dry_run: bool,
        #[arg(long, default_value = "cosmic")]
        theme: String,
    },
    /// Classify three glyphs
    Classify {
        #[arg(num_args = 3, value_name = "GLYPH")]
        glyphs: Vec<String>,
    },
    /// Map a free-text request to tools
    Intent {
        query: String,
        /// Archetype id used as a hint, e.g. `code-forge`
        #[arg(long)]
        archetype: Option<String>,
        #[arg(long, env = "SPARK_MAX_TOOLS")]
        max_tools: Option<usize>,
    },
    /// Create a world from a catalog archetype
    Create {
        archetype: String,
        #[arg(long, default_value = "cosmic")]
        theme: String,
        /// Add a page after creation (repeatable)
        #[arg(long = "page", value_name = "QUERY")]
        pages: Vec<String>,
    },
    /// List the archetype catalog
    Catalog,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    emoji: &'static str,
    tools: Vec<&'static str>,
    base_value: u64,
    educational_goal: &'static str,
}

fn catalog_entries() -> Vec<CatalogEntry> {
    Archetype::ALL
        .iter()
        .map(|a| {
            let def = a.definition();
            CatalogEntry {
                id: def.id,
                name: def.name,
                emoji: def.emoji,
                tools: def.tools.iter().map(|t| t.as_str()).collect(),
                base_value: def.base_value,
                educational_goal: def.educational_goal,
            }
        })
        .collect()
}

/// Add each page and return the website's current value. Tokens already in
/// a wallet are snapshots and keep their minted value.
async fn extend_world(creator: &WorldCreator, website: &mut Website, pages: &[String]) -> u64 {
    for page in pages {
        creator.add_page(website, page).await;
    }
    value(website)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::from_default_env().add_directive("spark=info".parse()?);
    if cli.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = Config::from_env()?;
    config.log_redacted();
    validate_catalog()?;

    let generator: Option<Arc<dyn TextGenerator>> = config
        .openai_api_key
        .as_ref()
        .map(|key| Arc::new(OpenAi::new(key.clone(), config.model.clone())) as Arc<dyn TextGenerator>);
    let synthesizer = Synthesizer::from_config(&config, generator);

    match cli.command {
        Command::Spin {
            glyphs,
            hover_ms,
            hesitations,
            dry_run,
            theme,
        } => {
            let theme = parse_theme(&theme)?;
            let aggregator = BehaviorAggregator::from_config(&config);
            let weighting = BehaviorWeighting::from_flag(config.behavior_weighting);
            let mut session = CreationSession::start(&aggregator, weighting);

            session.behavior().record_hover_tick(hover_ms)?;
            for _ in 0..hesitations {
                session.behavior().record_hesitation()?;
            }
            match glyphs {
                Some(glyphs) => session.land(Combination::from_glyphs(glyphs.as_slice())?),
                None => {
                    session.spin(&mut rand::rng());
                }
            }

            let outcome = session.finalize()?;
            println!("{}", serde_json::to_string_pretty(&outcome.provenance)?);
            if dry_run {
                return Ok(());
            }

            let mut wallet = Wallet::generate();
            let creator = WorldCreator::new(synthesizer);
            let creation = creator.create_from_spin(&outcome, &mut wallet, theme).await;
            print_creation(&creation.website, &wallet)?;
        }
        Command::Classify { glyphs } => {
            let result = classify_glyphs(glyphs.as_slice())?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Intent {
            query,
            archetype,
            max_tools,
        } => {
            let hint = archetype.as_deref().map(str::parse::<Archetype>).transpose()?;
            let options = ClassifyOptions::builder()
                .max_tools(max_tools.unwrap_or(config.max_tools))
                .archetype_hint(hint)
                .build();
            let tools = synthesizer.intent().classify(&query, &options).await;
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }
        Command::Create {
            archetype,
            theme,
            pages,
        } => {
            let archetype: Archetype = archetype.parse()?;
            let theme = parse_theme(&theme)?;
            let mut wallet = Wallet::generate();
            let creator = WorldCreator::new(synthesizer);

            let creation = creator.create_manual(archetype, &mut wallet, theme).await;
            let mut website = creation.website;
            let current_value = extend_world(&creator, &mut website, &pages).await;
            print_creation(&website, &wallet)?;
            if !pages.is_empty() {
                info!(
                    website_id = %website.id,
                    minted_value = creation.token.value,
                    current_value,
                    "Website revalued after new pages"
                );
                let revaluation = serde_json::json!({
                    "websiteId": website.id,
                    "mintedValue": creation.token.value,
                    "currentValue": current_value,
                });
                println!("{}", serde_json::to_string_pretty(&revaluation)?);
            }
        }
        Command::Catalog => {
            println!("{}", serde_json::to_string_pretty(&catalog_entries())?);
        }
    }

    Ok(())
}

fn parse_theme(raw: &str) -> Result<Theme> {
    let wanted = raw.trim().to_lowercase();
    Theme::ALL
        .iter()
        .copied()
        .find(|t| t.label().to_lowercase() == wanted)
        .ok_or_else(|| {
            let known: Vec<String> = Theme::ALL.iter().map(|t| t.label().to_lowercase()).collect();
            anyhow!("Unknown theme {raw:?}, expected one of: {}", known.join(", "))
        })
}

fn print_creation(website: &Website, wallet: &Wallet) -> Result<()> {
    info!(
        wallet = wallet.address(),
        balance = wallet.balance(),
        tokens = wallet.tokens().len(),
        "Wallet updated"
    );
    println!("{}", serde_json::to_string_pretty(website)?);
    println!("{}", serde_json::to_string_pretty(wallet)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn theme_names_parse_loosely() {
        assert_eq!(parse_theme(" Technical ").unwrap(), Theme::Technical);
        assert!(parse_theme("neon").is_err());
    }

    #[test]
    fn cli_parses_spin_glyphs() {
        let cli = Cli::parse_from(["spark", "spin", "--glyphs", "🪐", "🪐", "🌙", "--dry-run"]);
        match cli.command {
            Command::Spin { glyphs, dry_run, .. } => {
                assert_eq!(glyphs.unwrap().len(), 3);
                assert!(dry_run);
            }
            _ => panic!("expected spin"),
        }
    }

    #[test]
    fn catalog_output_includes_base_value() {
        let entries = catalog_entries();
        assert_eq!(entries.len(), Archetype::ALL.len());

        let json = serde_json::to_value(&entries).unwrap();
        let story = json
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["id"] == "story-studio")
            .unwrap();
        assert_eq!(story["baseValue"], 900);
    }

    #[tokio::test]
    async fn added_pages_are_revalued_without_a_second_deposit() {
        let creator = WorldCreator::new(Synthesizer::new(None, Duration::from_secs(1), 4));
        let mut wallet = Wallet::new("0xowner");
        let creation = creator
            .create_manual(Archetype::MathArena, &mut wallet, Theme::Minimal)
            .await;
        let mut website = creation.website;

        let pages = vec!["Quadratic equations".to_string(), "Prime numbers".to_string()];
        let current = extend_world(&creator, &mut website, &pages).await;

        assert_eq!(website.page_count(), 2);
        assert!(current > creation.token.value);
        assert_eq!(wallet.tokens().len(), 1);
        assert_eq!(wallet.balance(), creation.token.value);
    }
}
