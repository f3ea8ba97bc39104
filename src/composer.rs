//! Transfer composer - editable list of outgoing transfer lines.
//!
//! Submitting only records the lines locally (see `WalletSession::submit_transfer`).
//! Nothing is built, signed or broadcast.

use serde::Serialize;

use crate::error::{WalletError, WalletResult};
use crate::session::model::BTC;

pub const COIN_TYPES: &[&str] = &["BTC", "ETH", "USDT", "LTC", "WBTC"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendItem {
    pub recipient: String,
    /// As typed; parsed on submit
    pub amount: String,
    pub coin: String,
}

impl SendItem {
    pub fn blank() -> Self {
        Self { recipient: String::new(), amount: String::new(), coin: BTC.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendField { Recipient, Amount, Coin }

impl SendField {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "recipient" | "to" => Some(SendField::Recipient),
            "amount" => Some(SendField::Amount),
            "coin" | "cointype" | "coin_type" => Some(SendField::Coin),
            _ => None,
        }
    }
}

/// A validated line, ready to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferLine {
    pub recipient: String,
    pub amount: f64,
    pub coin: String,
}

/// Always holds at least one line. Only the last line can be extended, any
/// other line can be removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferComposer {
    items: Vec<SendItem>,
}

impl Default for TransferComposer {
    fn default() -> Self { Self::new() }
}

impl TransferComposer {
    pub fn new() -> Self { Self { items: vec![SendItem::blank()] } }

    pub fn items(&self) -> &[SendItem] { &self.items }

    pub fn add_item(&mut self) { self.items.push(SendItem::blank()); }

    pub fn remove_item(&mut self, index: usize) -> WalletResult<()> {
        if index >= self.items.len().saturating_sub(1) {
            return Err(WalletError::invalid_transfer(format!("line {index} cannot be removed")));
        }
        self.items.remove(index);
        Ok(())
    }

    pub fn update_item(&mut self, index: usize, field: SendField, value: impl Into<String>) -> WalletResult<()> {
        let value = value.into();
        let item = self
            .items
            .get_mut(index)
            .ok_or_else(|| WalletError::invalid_transfer(format!("no line {index}")))?;
        match field {
            SendField::Recipient => item.recipient = value,
            SendField::Amount => item.amount = value,
            SendField::Coin => {
                if !COIN_TYPES.contains(&value.as_str()) {
                    return Err(WalletError::invalid_transfer(format!("unsupported coin {value}")));
                }
                item.coin = value;
            }
        }
        Ok(())
    }

    /// Parse every line. Fails on the first bad line and leaves the composer as is.
    pub fn validate(&self) -> WalletResult<Vec<TransferLine>> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let recipient = item.recipient.trim();
                if recipient.is_empty() {
                    return Err(WalletError::invalid_transfer(format!("line {i}: recipient is empty")));
                }
                let amount: f64 = item
                    .amount
                    .trim()
                    .parse()
                    .map_err(|_| WalletError::invalid_transfer(format!("line {i}: amount {:?} is not a number", item.amount)))?;
                if !amount.is_finite() || amount <= 0.0 {
                    return Err(WalletError::invalid_transfer(format!("line {i}: amount must be positive")));
                }
                Ok(TransferLine { recipient: recipient.to_string(), amount, coin: item.coin.clone() })
            })
            .collect()
    }

    /// Validate, then reset to a single blank line.
    pub fn take_lines(&mut self) -> WalletResult<Vec<TransferLine>> {
        let lines = self.validate()?;
        self.reset();
        Ok(lines)
    }

    pub fn reset(&mut self) { self.items = vec![SendItem::blank()]; }
}
