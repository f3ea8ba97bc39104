//! WalletController - drives a [`WalletSession`] against a [`ChainSource`].
//!
//! The session sits behind a `std::sync::RwLock`. The lock is taken only to
//! issue a ticket or apply a result, never across an `.await`, so any number
//! of refreshes can be in flight while the UI keeps reading snapshots.

use futures::channel::mpsc;
use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use crate::composer::SendField;
use crate::error::{WalletError, WalletResult};
use crate::explorer::ChainSource;
use crate::export::ExportPayload;
use crate::identity::WalletIdentity;
use crate::session::{Applied, FetchTicket, HistoryEntry, SessionEvent, SessionSnapshot, WalletSession};

/// Outcome of each slice in a full refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub balance: Applied,
    pub utxos: Applied,
    pub history: Applied,
    pub pending: Applied,
}

#[derive(Clone)]
pub struct WalletController {
    source: Arc<dyn ChainSource>,
    session: Arc<RwLock<WalletSession>>,
}

impl WalletController {
    pub fn new(source: Arc<dyn ChainSource>) -> Self {
        Self { source, session: Arc::new(RwLock::new(WalletSession::new())) }
    }

    /// Controller backed by the public HTTP explorers in `config`.
    #[cfg(feature = "native")]
    pub fn from_config(config: crate::config::WalletConfig) -> WalletResult<Self> {
        Ok(Self::new(Arc::new(crate::explorer::HttpExplorer::new(config)?)))
    }

    fn read(&self) -> RwLockReadGuard<'_, WalletSession> {
        self.session.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, WalletSession> {
        self.session.write().unwrap_or_else(|p| p.into_inner())
    }

    fn ticket(&self) -> WalletResult<FetchTicket> {
        self.read().ticket().ok_or(WalletError::NoIdentity)
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    /// Activate `raw` as the wallet, then load balance, UTXOs, history and the
    /// pending transaction for it.
    pub async fn recover(&self, raw: &str) -> WalletResult<WalletIdentity> {
        let (identity, ticket) = {
            let mut session = self.write();
            let ticket = session.recover(raw)?;
            (session.identity().cloned().ok_or(WalletError::NoIdentity)?, ticket)
        };
        let report = self.refresh_with(&ticket).await;
        info!(address = %identity.address, ?report, "initial load finished");
        Ok(identity)
    }

    pub fn forget(&self) { self.write().forget(); }

    // =========================================================================
    // Refresh
    // =========================================================================

    pub async fn refresh_all(&self) -> WalletResult<RefreshReport> {
        let ticket = self.ticket()?;
        Ok(self.refresh_with(&ticket).await)
    }

    /// Balance, UTXO and account requests run concurrently. Each result is
    /// applied as soon as it arrives. The account response feeds both history
    /// and the pending monitor.
    async fn refresh_with(&self, ticket: &FetchTicket) -> RefreshReport {
        let address = ticket.address();
        let balance = async {
            let result = self.source.balance(address).await;
            self.write().apply_balance(ticket, result)
        };
        let utxos = async {
            let result = self.source.unspent(address).await;
            self.write().apply_utxos(ticket, result)
        };
        let account = async {
            let result = self.source.account(address).await;
            let mut session = self.write();
            match result {
                Ok(account) => (
                    session.apply_history(ticket, Ok(account.txrefs)),
                    session.apply_pending(ticket, Ok(account.unconfirmed_txrefs)),
                ),
                Err(e) => (
                    session.apply_history(ticket, Err(e.clone())),
                    session.apply_pending(ticket, Err(e)),
                ),
            }
        };
        let (balance, utxos, (history, pending)) = futures::join!(balance, utxos, account);
        RefreshReport { balance, utxos, history, pending }
    }

    pub async fn refresh_balance(&self) -> WalletResult<Applied> {
        let ticket = self.ticket()?;
        let result = self.source.balance(ticket.address()).await;
        Ok(self.write().apply_balance(&ticket, result))
    }

    pub async fn refresh_utxos(&self) -> WalletResult<Applied> {
        let ticket = self.ticket()?;
        let result = self.source.unspent(ticket.address()).await;
        Ok(self.write().apply_utxos(&ticket, result))
    }

    pub async fn refresh_history(&self) -> WalletResult<Applied> {
        let ticket = self.ticket()?;
        let result = self.source.account(ticket.address()).await.map(|a| a.txrefs);
        Ok(self.write().apply_history(&ticket, result))
    }

    pub async fn refresh_pending(&self) -> WalletResult<Applied> {
        let ticket = self.ticket()?;
        let result = self.source.account(ticket.address()).await.map(|a| a.unconfirmed_txrefs);
        Ok(self.write().apply_pending(&ticket, result))
    }

    // =========================================================================
    // Composer
    // =========================================================================

    pub fn add_send_item(&self) { self.write().add_send_item(); }

    pub fn remove_send_item(&self, index: usize) -> WalletResult<()> {
        self.write().remove_send_item(index)
    }

    pub fn update_send_item(&self, index: usize, field: SendField, value: impl Into<String>) -> WalletResult<()> {
        self.write().update_send_item(index, field, value)
    }

    pub fn submit_transfer(&self) -> WalletResult<Vec<HistoryEntry>> {
        self.write().submit_transfer()
    }

    // =========================================================================
    // Pending transaction
    // =========================================================================

    pub fn replace_by_fee(&self) -> WalletResult<()> {
        self.fee_bump("replace-by-fee")
    }

    pub fn child_pays_for_parent(&self) -> WalletResult<()> {
        self.fee_bump("child-pays-for-parent")
    }

    fn fee_bump(&self, method: &'static str) -> WalletResult<()> {
        let session = self.read();
        let pending = session.pending().ok_or(WalletError::NoPendingTransaction)?;
        warn!(txid = %pending.txid, method, "fee bumping is not implemented");
        Err(WalletError::Unsupported(method))
    }

    pub fn export_pending(&self) -> WalletResult<ExportPayload> {
        let session = self.read();
        let pending = session.pending().ok_or(WalletError::NoPendingTransaction)?;
        ExportPayload::for_pending(pending)
    }

    // =========================================================================
    // Observation
    // =========================================================================

    pub fn snapshot(&self) -> SessionSnapshot { self.read().snapshot() }

    pub fn identity(&self) -> Option<WalletIdentity> { self.read().identity().cloned() }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEvent> { self.write().subscribe() }
}
