//! Session events, delivered to every subscriber in emission order.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchKind { Balance, Utxos, History, Pending }

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchKind::Balance => "balance",
            FetchKind::Utxos => "utxos",
            FetchKind::History => "history",
            FetchKind::Pending => "pending",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// `None` when the wallet was forgotten
    IdentityChanged { address: Option<String> },
    BalanceUpdated,
    UtxosUpdated { count: usize },
    UtxosCleared,
    HistoryUpdated { count: usize },
    PendingUpdated { txid: Option<String> },
    FetchFailed { kind: FetchKind, error: String },
    StaleDiscarded { kind: FetchKind, address: String },
    TransferSubmitted { count: usize },
    ComposerChanged,
}
