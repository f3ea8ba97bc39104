//! Wallet Configuration - explorer endpoints and HTTP timeout.
//!
//! Defaults point at the public explorers. Each value can be overridden from the
//! environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `WALLETDASH_BALANCE_URL` | `balance_url` |
//! | `WALLETDASH_UTXO_URL` | `utxo_url` |
//! | `WALLETDASH_ACCOUNT_URL` | `account_url` |
//! | `WALLETDASH_TIMEOUT_SECS` | `timeout` |

use std::time::Duration;

use crate::error::{WalletError, WalletResult};

pub const DEFAULT_BALANCE_URL: &str = "https://blockchain.info/q/addressbalance";
pub const DEFAULT_UTXO_URL: &str = "https://blockchain.info/unspent";
pub const DEFAULT_ACCOUNT_URL: &str = "https://api.blockcypher.com/v1/btc/main/addrs";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_BALANCE_URL: &str = "WALLETDASH_BALANCE_URL";
pub const ENV_UTXO_URL: &str = "WALLETDASH_UTXO_URL";
pub const ENV_ACCOUNT_URL: &str = "WALLETDASH_ACCOUNT_URL";
pub const ENV_TIMEOUT_SECS: &str = "WALLETDASH_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// GET `{balance_url}/{address}` → integer satoshis
    pub balance_url: String,
    /// GET `{utxo_url}?active={address}`
    pub utxo_url: String,
    /// GET `{account_url}/{address}`
    pub account_url: String,
    pub timeout: Duration,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            balance_url: DEFAULT_BALANCE_URL.into(),
            utxo_url: DEFAULT_UTXO_URL.into(),
            account_url: DEFAULT_ACCOUNT_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl WalletConfig {
    pub fn new() -> Self { Self::default() }
    pub fn with_balance_url(mut self, url: impl Into<String>) -> Self { self.balance_url = trim_slash(url.into()); self }
    pub fn with_utxo_url(mut self, url: impl Into<String>) -> Self { self.utxo_url = trim_slash(url.into()); self }
    pub fn with_account_url(mut self, url: impl Into<String>) -> Self { self.account_url = trim_slash(url.into()); self }
    pub fn with_timeout(mut self, timeout: Duration) -> Self { self.timeout = timeout; self }

    /// Point all three endpoints at one host, using the default path layout.
    /// Used for self-hosted mirrors and for tests.
    pub fn with_base_url(self, base: impl Into<String>) -> Self {
        let base = trim_slash(base.into());
        self.with_balance_url(format!("{base}/q/addressbalance"))
            .with_utxo_url(format!("{base}/unspent"))
            .with_account_url(format!("{base}/v1/btc/main/addrs"))
    }

    /// Defaults, overridden by any `WALLETDASH_*` variables that are set.
    pub fn from_env() -> WalletResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> WalletResult<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_BALANCE_URL).filter(|v| !v.is_empty()) {
            config = config.with_balance_url(url);
        }
        if let Some(url) = lookup(ENV_UTXO_URL).filter(|v| !v.is_empty()) {
            config = config.with_utxo_url(url);
        }
        if let Some(url) = lookup(ENV_ACCOUNT_URL).filter(|v| !v.is_empty()) {
            config = config.with_account_url(url);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.is_empty()) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| WalletError::Config(format!("{ENV_TIMEOUT_SECS} must be whole seconds, got {secs:?}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
