use thiserror::Error;

#[derive(Error, Debug)]
pub enum EconomyError {
    #[error("No saved game under key '{key}'")]
    NoSave { key: String },

    #[error("Malformed save data: {reason}")]
    MalformedSave { reason: String },

    #[error("Save version {found} is newer than supported version {supported}")]
    UnsupportedSaveVersion { found: u32, supported: u32 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type EconomyResult<T> = Result<T, EconomyError>;
