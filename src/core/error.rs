use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("seed {seed} produced no habitable tile after {attempts} attempts")]
    WorldUninhabitable { seed: u32, attempts: u32 },

    #[error("save data failed validation: {0}")]
    SaveCorrupt(String),

    #[error("invariant violated: {0}")]
    LogicAssertion(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
