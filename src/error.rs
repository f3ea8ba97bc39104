//! Error taxonomy. Recovery errors surface to the user; fetch errors are logged.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid recovery key: {0}")]
    InvalidCredential(String),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("No wallet recovered")]
    NoIdentity,

    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),

    #[error("No pending transaction")]
    NoPendingTransaction,

    #[error("Not supported: {0}")]
    Unsupported(&'static str),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WalletError {
    pub fn invalid_credential<S: Into<String>>(msg: S) -> Self {
        Self::InvalidCredential(msg.into())
    }

    pub fn invalid_transfer<S: Into<String>>(msg: S) -> Self {
        Self::InvalidTransfer(msg.into())
    }
}

/// Failure of a single explorer request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("decode: {0}")]
    Decode(String),
}

#[cfg(feature = "native")]
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

pub type WalletResult<T> = Result<T, WalletError>;
