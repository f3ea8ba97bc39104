//! View model: what a renderer draws for the active wallet.

use bitcoin::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::explorer::{TxRef, UnconfirmedRef, UtxoRecord};

pub const BTC: &str = "BTC";

/// Satoshis → BTC.
pub fn sats_to_coin(sats: u64) -> f64 {
    Amount::from_sat(sats).to_btc()
}

/// Coin symbol → amount in major units.
pub type Balance = BTreeMap<String, f64>;

/// (txid, output index)
pub type Outpoint = (String, u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnspentOutput {
    pub txid: String,
    pub output_index: u32,
    /// satoshis
    pub amount: u64,
    pub confirmations: u64,
}

impl UnspentOutput {
    pub fn outpoint(&self) -> Outpoint { (self.txid.clone(), self.output_index) }
}

impl From<UtxoRecord> for UnspentOutput {
    fn from(r: UtxoRecord) -> Self {
        Self { txid: r.hash, output_index: r.output_index, amount: r.value, confirmations: r.confirmations }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Received,
    Sent,
    /// Local composer entry; never seen on chain
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub sequence_id: u64,
    /// major units
    pub amount: f64,
    pub counterparty: String,
    pub timestamp: DateTime<Utc>,
    pub coin: String,
    pub txid: String,
    pub confirmed: bool,
    pub kind: HistoryKind,
}

impl HistoryEntry {
    /// Map a confirmed feed reference. `position` is the index in the feed.
    pub fn from_txref(position: usize, r: &TxRef, own_address: &str, now: DateTime<Utc>) -> Self {
        let timestamp = r
            .confirmed
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(now);
        let kind = match r.tx_input_n {
            Some(n) if n >= 0 => HistoryKind::Sent,
            _ => HistoryKind::Received,
        };
        Self {
            sequence_id: position as u64,
            amount: sats_to_coin(r.value),
            counterparty: r.addresses.first().cloned().unwrap_or_else(|| own_address.to_string()),
            timestamp,
            coin: BTC.into(),
            txid: r.tx_hash.clone(),
            confirmed: r.confirmations > 0,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub txid: String,
    /// major units
    pub amount: f64,
    /// sat/vB
    #[serde(rename = "fee")]
    pub fee_rate: f64,
}

impl From<&UnconfirmedRef> for PendingTransaction {
    fn from(r: &UnconfirmedRef) -> Self {
        Self { txid: r.tx_hash.clone(), amount: sats_to_coin(r.value), fee_rate: r.fees.unwrap_or(0.0) }
    }
}
