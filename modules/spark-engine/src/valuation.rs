//! Artifact valuation.
//!
//! `value = BASE + pages * PAGE_UNIT + Σ tool weights + whole days of age * AGE_UNIT`
//!
//! Non-decreasing in page count, tool count and age; never below `BASE_VALUE`.

use chrono::{DateTime, Utc};
use tracing::warn;

use spark_common::{SparkError, ToolKind, Website, DEFAULT_TOOL_WEIGHT};

pub const BASE_VALUE: u64 = 1000;
pub const PAGE_UNIT_VALUE: u64 = 100;
pub const AGE_UNIT_VALUE: u64 = 10;

/// Weight of one tool. Types outside the taxonomy get `DEFAULT_TOOL_WEIGHT`.
pub fn tool_weight(kind: &ToolKind) -> u64 {
    match kind {
        ToolKind::Known(t) => t.weight(),
        ToolKind::Custom(name) => {
            let err = SparkError::UnknownToolType(name.clone());
            warn!(error = %err, weight = DEFAULT_TOOL_WEIGHT, "Valuing tool at default weight");
            DEFAULT_TOOL_WEIGHT
        }
    }
}

/// Whole days since `created_at`, truncated. Future timestamps count as zero.
pub fn age_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let days = (now - created_at).num_days();
    u64::try_from(days).unwrap_or(0)
}

pub fn value_at(website: &Website, now: DateTime<Utc>) -> u64 {
    let pages = (website.page_count() as u64).saturating_mul(PAGE_UNIT_VALUE);
    let tools: u64 = website
        .tools
        .iter()
        .map(|t| tool_weight(t.tool_type()))
        .fold(0, u64::saturating_add);
    let age = age_days(website.created_at, now).saturating_mul(AGE_UNIT_VALUE);

    BASE_VALUE
        .saturating_add(pages)
        .saturating_add(tools)
        .saturating_add(age)
}

pub fn value(website: &Website) -> u64 {
    value_at(website, Utc::now())
}
