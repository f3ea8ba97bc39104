//! Explorer - read-only block explorer access.
//!
//! # Architecture
//!
//! ```text
//! WalletController
//!     │
//!     └── ChainSource (trait)
//!             │
//!             ├── HttpExplorer (reqwest, native)
//!             │     ├── GET {balance_url}/{address}       → sats as text
//!             │     ├── GET {utxo_url}?active={address}   → UnspentResponse
//!             │     └── GET {account_url}/{address}       → AccountRecord
//!             │
//!             └── test doubles
//! ```

#[cfg(feature = "native")]
mod http;
mod records;

use async_trait::async_trait;

use crate::error::FetchError;

#[cfg(feature = "native")]
pub use http::HttpExplorer;
pub use records::{AccountRecord, TxRef, UnconfirmedRef, UnspentResponse, UtxoRecord};

/// Source of on-chain data for one address.
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Confirmed balance in satoshis.
    async fn balance(&self, address: &str) -> Result<u64, FetchError>;
    async fn unspent(&self, address: &str) -> Result<Vec<UtxoRecord>, FetchError>;
    /// Confirmed and unconfirmed transaction references.
    async fn account(&self, address: &str) -> Result<AccountRecord, FetchError>;
}
