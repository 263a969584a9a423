pub mod catalog;
pub mod config;
pub mod error;
pub mod provenance;
pub mod symbols;
pub mod tools;
pub mod types;

pub use catalog::{validate_catalog, Archetype, ArchetypeDefinition};
pub use config::Config;
pub use error::SparkError;
pub use provenance::Provenance;
pub use symbols::{Combination, Symbol, SYMBOLS};
pub use tools::{ToolComponent, ToolKind, ToolSpec, ToolType, DEFAULT_TOOL_WEIGHT};
pub use types::*;
