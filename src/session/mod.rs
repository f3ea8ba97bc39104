//! WalletSession - single owner of all wallet state.
//!
//! # State
//!
//! ```text
//! WalletSession
//!   ├── identity: Option<WalletIdentity>
//!   ├── epoch            bumped on every identity change
//!   ├── balance          stale-on-error
//!   ├── utxos            clear-on-error
//!   ├── history          stale-on-error, feed order
//!   ├── pending          stale-on-error, first unconfirmed ref
//!   └── composer
//! ```
//!
//! Fetches run outside the session. Each one is issued with a [`FetchTicket`]
//! and its result is handed back through one of the `apply_*` methods. A result
//! whose ticket no longer matches the active identity is dropped, so a slow
//! response for a previous key can never land on the current one.

pub mod events;
pub mod model;

use chrono::Utc;
use futures::channel::mpsc;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::composer::{SendField, TransferComposer};
use crate::error::{FetchError, WalletError, WalletResult};
use crate::explorer::{TxRef, UnconfirmedRef, UtxoRecord};
use crate::identity::{self, Credential, WalletIdentity};

pub use events::{FetchKind, SessionEvent};
pub use model::{Balance, HistoryEntry, HistoryKind, Outpoint, PendingTransaction, UnspentOutput, BTC};

/// Identifies the identity a fetch was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    address: String,
}

impl FetchTicket {
    pub fn address(&self) -> &str { &self.address }
}

/// What happened to a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Applied {
    Updated,
    /// Fetch failed; the slice's error policy was applied
    Failed,
    /// Ticket did not match the active identity; nothing changed
    Stale,
}

/// Serializable view of the whole session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub identity: Option<WalletIdentity>,
    pub balance: Balance,
    pub utxos: Vec<UnspentOutput>,
    pub history: Vec<HistoryEntry>,
    pub pending: Option<PendingTransaction>,
    pub composer: TransferComposer,
}

#[derive(Debug, Default)]
pub struct WalletSession {
    identity: Option<WalletIdentity>,
    epoch: u64,
    balance: Balance,
    utxos: BTreeMap<Outpoint, UnspentOutput>,
    history: Vec<HistoryEntry>,
    pending: Option<PendingTransaction>,
    composer: TransferComposer,
    watchers: Vec<mpsc::UnboundedSender<SessionEvent>>,
}

impl WalletSession {
    pub fn new() -> Self { Self::default() }

    // =========================================================================
    // Identity transitions
    // =========================================================================

    /// Decode `raw` and make it the active identity.
    ///
    /// On failure nothing changes. On success all derived state is discarded
    /// and the returned ticket is the only one that will be accepted.
    pub fn recover(&mut self, raw: &str) -> WalletResult<FetchTicket> {
        let identity = match identity::decode(Credential::new(raw)) {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "wallet recovery failed");
                return Err(e);
            }
        };
        info!(address = %identity.address, kind = ?identity.kind, "wallet recovered");
        let address = identity.address.clone();
        self.reset_derived();
        self.identity = Some(identity);
        self.emit(SessionEvent::IdentityChanged { address: Some(address) });
        self.ticket().ok_or(WalletError::NoIdentity)
    }

    /// Drop the active identity and everything derived from it.
    pub fn forget(&mut self) {
        if self.identity.take().is_some() {
            info!("wallet forgotten");
        }
        self.reset_derived();
        self.emit(SessionEvent::IdentityChanged { address: None });
    }

    fn reset_derived(&mut self) {
        self.epoch += 1;
        self.balance.clear();
        self.utxos.clear();
        self.history.clear();
        self.pending = None;
        self.composer.reset();
    }

    /// Ticket for a fetch against the active identity.
    pub fn ticket(&self) -> Option<FetchTicket> {
        self.identity.as_ref().map(|id| FetchTicket { epoch: self.epoch, address: id.address.clone() })
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.epoch == self.epoch
            && self.identity.as_ref().is_some_and(|id| id.address == ticket.address)
    }

    fn check(&mut self, kind: FetchKind, ticket: &FetchTicket) -> bool {
        if self.is_current(ticket) {
            return true;
        }
        debug!(%kind, address = %ticket.address, "discarding stale response");
        self.emit(SessionEvent::StaleDiscarded { kind, address: ticket.address.clone() });
        false
    }

    fn failed(&mut self, kind: FetchKind, ticket: &FetchTicket, error: &FetchError) {
        warn!(%kind, address = %ticket.address, %error, "fetch failed");
        self.emit(SessionEvent::FetchFailed { kind, error: error.to_string() });
    }

    // =========================================================================
    // Fetch results
    // =========================================================================

    pub fn apply_balance(&mut self, ticket: &FetchTicket, result: Result<u64, FetchError>) -> Applied {
        if !self.check(FetchKind::Balance, ticket) {
            return Applied::Stale;
        }
        match result {
            Ok(sats) => {
                self.balance.insert(BTC.into(), model::sats_to_coin(sats));
                debug!(address = %ticket.address, sats, "balance updated");
                self.emit(SessionEvent::BalanceUpdated);
                Applied::Updated
            }
            Err(e) => {
                self.failed(FetchKind::Balance, ticket, &e);
                Applied::Failed
            }
        }
    }

    pub fn apply_utxos(&mut self, ticket: &FetchTicket, result: Result<Vec<UtxoRecord>, FetchError>) -> Applied {
        if !self.check(FetchKind::Utxos, ticket) {
            return Applied::Stale;
        }
        match result {
            Ok(records) => {
                self.utxos = records
                    .into_iter()
                    .map(UnspentOutput::from)
                    .map(|u| (u.outpoint(), u))
                    .collect();
                self.emit(SessionEvent::UtxosUpdated { count: self.utxos.len() });
                Applied::Updated
            }
            Err(e) => {
                self.utxos.clear();
                self.failed(FetchKind::Utxos, ticket, &e);
                self.emit(SessionEvent::UtxosCleared);
                Applied::Failed
            }
        }
    }

    pub fn apply_history(&mut self, ticket: &FetchTicket, result: Result<Vec<TxRef>, FetchError>) -> Applied {
        if !self.check(FetchKind::History, ticket) {
            return Applied::Stale;
        }
        match result {
            Ok(refs) => {
                let now = Utc::now();
                self.history = refs
                    .iter()
                    .enumerate()
                    .map(|(i, r)| HistoryEntry::from_txref(i, r, &ticket.address, now))
                    .collect();
                self.emit(SessionEvent::HistoryUpdated { count: self.history.len() });
                Applied::Updated
            }
            Err(e) => {
                self.failed(FetchKind::History, ticket, &e);
                Applied::Failed
            }
        }
    }

    pub fn apply_pending(&mut self, ticket: &FetchTicket, result: Result<Vec<UnconfirmedRef>, FetchError>) -> Applied {
        if !self.check(FetchKind::Pending, ticket) {
            return Applied::Stale;
        }
        match result {
            Ok(refs) => {
                self.pending = refs.first().map(PendingTransaction::from);
                if let Some(p) = &self.pending {
                    info!(txid = %p.txid, fee_rate = p.fee_rate, "pending transaction tracked");
                }
                let txid = self.pending.as_ref().map(|p| p.txid.clone());
                self.emit(SessionEvent::PendingUpdated { txid });
                Applied::Updated
            }
            Err(e) => {
                self.failed(FetchKind::Pending, ticket, &e);
                Applied::Failed
            }
        }
    }

    // =========================================================================
    // Composer
    // =========================================================================

    pub fn composer(&self) -> &TransferComposer { &self.composer }

    pub fn add_send_item(&mut self) {
        self.composer.add_item();
        self.emit(SessionEvent::ComposerChanged);
    }

    pub fn remove_send_item(&mut self, index: usize) -> WalletResult<()> {
        self.composer.remove_item(index)?;
        self.emit(SessionEvent::ComposerChanged);
        Ok(())
    }

    pub fn update_send_item(&mut self, index: usize, field: SendField, value: impl Into<String>) -> WalletResult<()> {
        self.composer.update_item(index, field, value)?;
        self.emit(SessionEvent::ComposerChanged);
        Ok(())
    }

    /// Record every composer line as an unconfirmed `transfer` history entry
    /// and reset the composer. Returns the appended entries.
    pub fn submit_transfer(&mut self) -> WalletResult<Vec<HistoryEntry>> {
        if self.identity.is_none() {
            return Err(WalletError::NoIdentity);
        }
        let lines = self.composer.take_lines()?;
        let now = Utc::now();
        let start = self.history.len();
        self.history.extend(lines.into_iter().enumerate().map(|(i, line)| HistoryEntry {
            sequence_id: (start + i) as u64,
            amount: line.amount,
            counterparty: line.recipient,
            timestamp: now,
            coin: line.coin,
            txid: placeholder_txid(),
            confirmed: false,
            kind: HistoryKind::Transfer,
        }));
        let added = self.history[start..].to_vec();
        info!(count = added.len(), "transfer recorded locally");
        self.emit(SessionEvent::TransferSubmitted { count: added.len() });
        self.emit(SessionEvent::ComposerChanged);
        Ok(added)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn identity(&self) -> Option<&WalletIdentity> { self.identity.as_ref() }
    pub fn balance(&self) -> &Balance { &self.balance }
    pub fn utxos(&self) -> impl Iterator<Item = &UnspentOutput> { self.utxos.values() }
    pub fn history(&self) -> &[HistoryEntry] { &self.history }
    pub fn pending(&self) -> Option<&PendingTransaction> { self.pending.as_ref() }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            identity: self.identity.clone(),
            balance: self.balance.clone(),
            utxos: self.utxos.values().cloned().collect(),
            history: self.history.clone(),
            pending: self.pending.clone(),
            composer: self.composer.clone(),
        }
    }

    // =========================================================================
    // Observation
    // =========================================================================

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded();
        self.watchers.push(tx);
        rx
    }

    fn emit(&mut self, event: SessionEvent) {
        self.watchers.retain(|w| w.unbounded_send(event.clone()).is_ok());
    }
}

fn placeholder_txid() -> String {
    hex::encode(rand::random::<[u8; 32]>())
}
