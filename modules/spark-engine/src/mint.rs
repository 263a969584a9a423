use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use spark_common::{Page, Provenance, Theme, Token, TokenMetadata, Website};

use crate::synthesis::{PageDraft, WebsiteDraft};
use crate::valuation::value_at;

/// Assemble a website from a synthesized draft. Archetype and multiplier
/// come from the provenance record.
pub fn build_website(
    draft: WebsiteDraft,
    provenance: Provenance,
    theme: Theme,
    owner: &str,
    now: DateTime<Utc>,
) -> Website {
    Website {
        id: Uuid::new_v4(),
        title: draft.title,
        description: draft.description,
        content: draft.content,
        archetype: provenance.archetype(),
        rarity_multiplier: provenance.rarity_multiplier(),
        theme,
        owner: owner.to_string(),
        pages: Vec::new(),
        tools: draft.tools,
        created_at: now,
        provenance,
    }
}

/// Append a synthesized page and its tools. Returns the new page id.
pub fn attach_page(website: &mut Website, draft: PageDraft, now: DateTime<Utc>) -> Uuid {
    let page = Page {
        id: Uuid::new_v4(),
        title: draft.title,
        content: draft.content,
        created_at: now,
    };
    let id = page.id;
    website.add_page(page, draft.tools);
    id
}

/// Snapshot the website's value at `now`. Later changes to the website do
/// not affect the token.
pub fn mint_token(website: &Website, now: DateTime<Utc>) -> Token {
    let value = value_at(website, now);
    info!(
        website_id = %website.id,
        archetype = %website.archetype,
        value,
        "Token minted"
    );

    Token {
        id: Uuid::new_v4(),
        website_id: website.id,
        value,
        metadata: TokenMetadata {
            title: website.title.clone(),
            archetype: website.archetype,
            rarity_multiplier: website.rarity_multiplier,
            page_count: website.page_count(),
            tool_count: website.tool_count(),
        },
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::BASE_VALUE;
    use spark_common::{Archetype, Wallet};

    fn draft() -> WebsiteDraft {
        WebsiteDraft {
            title: "Tides".to_string(),
            description: "How the moon moves oceans".to_string(),
            content: "## Tides\n\nBody".to_string(),
            tools: Vec::new(),
            fallback_reason: None,
        }
    }

    #[test]
    fn built_website_carries_provenance() {
        let now = Utc::now();
        let website = build_website(
            draft(),
            Provenance::manual(Archetype::OceanExplorer),
            Theme::Minimal,
            "0xowner",
            now,
        );
        assert_eq!(website.archetype, Archetype::OceanExplorer);
        assert_eq!(website.rarity_multiplier, 1.0);
        assert_eq!(website.page_count(), 0);
        assert_eq!(website.theme, Theme::Minimal);
    }

    #[test]
    fn token_snapshot_survives_new_pages() {
        let now = Utc::now();
        let mut website = build_website(
            draft(),
            Provenance::manual(Archetype::OceanExplorer),
            Theme::default(),
            "0xowner",
            now,
        );
        let token = mint_token(&website, now);
        assert_eq!(token.value, BASE_VALUE);

        attach_page(
            &mut website,
            PageDraft {
                title: "Spring tides".to_string(),
                content: "## Spring tides".to_string(),
                tools: Vec::new(),
                fallback_reason: None,
            },
            now,
        );
        assert_eq!(website.page_count(), 1);
        assert_eq!(token.value, BASE_VALUE);
        assert_eq!(token.metadata.page_count, 0);
        assert!(mint_token(&website, now).value > token.value);
    }

    #[test]
    fn wallet_balance_is_sum_of_minted_tokens() {
        let now = Utc::now();
        let website = build_website(
            draft(),
            Provenance::manual(Archetype::LogicGym),
            Theme::default(),
            "0xowner",
            now,
        );
        let mut wallet = Wallet::new("0xowner");
        wallet.deposit(mint_token(&website, now));
        wallet.deposit(mint_token(&website, now));
        assert_eq!(wallet.balance(), 2 * BASE_VALUE);
    }
}
