//! Walletdash: wallet dashboard core. Paste a key, see the wallet.
//!
//! # Architecture
//!
//! ```text
//! WalletController (entry point)
//!   │
//!   ├── WalletSession (single owner of state)
//!   │     ├── identity   ← identity::decode (WIF / hex → P2PKH)
//!   │     ├── balance    ← ChainSource::balance   (stale on error)
//!   │     ├── utxos      ← ChainSource::unspent   (cleared on error)
//!   │     ├── history    ← ChainSource::account   (stale on error)
//!   │     ├── pending    ← ChainSource::account   (first unconfirmed ref)
//!   │     └── composer   → local `transfer` history entries
//!   │
//!   └── ChainSource
//!         └── HttpExplorer (reqwest, native)
//! ```
//!
//! Nothing here signs or broadcasts. Send, RBF and CPFP are placeholders.
//!
//! # Features
//!
//! - `native` (default) - HTTP explorer client, tokio, log subscriber, CLI
//!
//! # Usage
//!
//! ```ignore
//! use walletdash::{WalletConfig, WalletController};
//!
//! let controller = WalletController::from_config(WalletConfig::from_env()?)?;
//! let identity = controller.recover("5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf").await?;
//! let snapshot = controller.snapshot();
//! ```

pub mod composer;
pub mod config;
pub mod controller;
pub mod error;
pub mod explorer;
pub mod export;
pub mod identity;
pub mod session;

#[cfg(feature = "native")]
pub mod logging;

pub use composer::{SendField, SendItem, TransferComposer, COIN_TYPES};
pub use config::WalletConfig;
pub use controller::{RefreshReport, WalletController};
pub use error::{FetchError, WalletError, WalletResult};
pub use explorer::ChainSource;
pub use export::{ExportPayload, EXPORT_FILE_NAME};
pub use identity::{Credential, CredentialKind, WalletIdentity};
pub use session::{
    Applied, Balance, FetchKind, HistoryEntry, HistoryKind, PendingTransaction, SessionEvent, SessionSnapshot,
    UnspentOutput, WalletSession,
};

#[cfg(feature = "native")]
pub use explorer::HttpExplorer;
