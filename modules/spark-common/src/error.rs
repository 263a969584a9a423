use thiserror::Error;

#[derive(Error, Debug)]
pub enum SparkError {
    #[error("Invalid combination: {0}")]
    InvalidCombination(String),

    #[error("Catalog misconfiguration: {0}")]
    ClassificationAmbiguous(String),

    #[error("External generation failed: {0}")]
    ExternalGenerationFailure(String),

    #[error("Unknown tool type: {0}")]
    UnknownToolType(String),

    #[error("Behavior session already finalized")]
    SessionClosed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
