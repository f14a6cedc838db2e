use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("Invalid combat input: {0}")]
    InvalidCombatInput(String),

    #[error("Unknown unit type: {0}")]
    UnknownUnit(String),

    #[error("Insufficient troops: {unit} ({available}/{required})")]
    InsufficientTroops {
        unit: String,
        available: u32,
        required: u32,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FarmError>;
