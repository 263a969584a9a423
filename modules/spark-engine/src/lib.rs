//! World Classification & Valuation Engine.
//!
//! Spin → classify → synthesize → value → mint. Classification and valuation
//! are pure; synthesis is the only step that talks to an external
//! collaborator, and it always degrades to a deterministic draft instead of
//! failing.

pub mod behavior;
pub mod classifier;
pub mod intent;
pub mod mint;
pub mod prompts;
pub mod session;
pub mod synthesis;
pub mod valuation;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use behavior::{BehaviorAggregator, SessionHandle};
pub use classifier::{classify, classify_glyphs, classify_with_behavior, BehaviorWeighting};
pub use intent::{ClassifyOptions, IntentClassifier};
pub use mint::{attach_page, build_website, mint_token};
pub use session::{Creation, CreationSession, SpinOutcome, WorldCreator};
pub use synthesis::{Generation, PageDraft, Synthesizer, WebsiteDraft};
pub use valuation::{tool_weight, value, value_at};
