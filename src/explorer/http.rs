//! HttpExplorer - ChainSource over the public explorer REST endpoints.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{AccountRecord, ChainSource, UnspentResponse, UtxoRecord};
use crate::config::WalletConfig;
use crate::error::{FetchError, WalletError, WalletResult};

pub struct HttpExplorer {
    http: Client,
    config: WalletConfig,
}

impl std::fmt::Debug for HttpExplorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExplorer")
            .field("balance_url", &self.config.balance_url)
            .field("utxo_url", &self.config.utxo_url)
            .field("account_url", &self.config.account_url)
            .finish_non_exhaustive()
    }
}

impl HttpExplorer {
    pub fn new(config: WalletConfig) -> WalletResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("walletdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WalletError::Config(format!("HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &WalletConfig { &self.config }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        debug!(%url, "explorer request");
        Ok(self.http.get(url).send().await?.error_for_status()?)
    }
}

#[async_trait]
impl ChainSource for HttpExplorer {
    async fn balance(&self, address: &str) -> Result<u64, FetchError> {
        let url = format!("{}/{}", self.config.balance_url, address);
        let body = self.get(&url).await?.text().await?;
        body.trim()
            .parse::<u64>()
            .map_err(|_| FetchError::Decode(format!("balance is not an integer: {:?}", body.trim())))
    }

    async fn unspent(&self, address: &str) -> Result<Vec<UtxoRecord>, FetchError> {
        let url = format!("{}?active={}", self.config.utxo_url, address);
        let resp: UnspentResponse = self.get(&url).await?.json().await?;
        Ok(resp.unspent_outputs)
    }

    async fn account(&self, address: &str) -> Result<AccountRecord, FetchError> {
        let url = format!("{}/{}", self.config.account_url, address);
        Ok(self.get(&url).await?.json().await?)
    }
}
