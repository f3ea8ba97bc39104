//! Wire shapes returned by the block explorers. Field names follow the feeds.

use serde::{Deserialize, Serialize};

/// One entry of `GET {utxo_url}?active={address}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoRecord {
    #[serde(rename = "tx_hash_big_endian")]
    pub hash: String,
    #[serde(rename = "tx_output_n")]
    pub output_index: u32,
    pub value: u64,
    #[serde(default)]
    pub confirmations: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnspentResponse {
    #[serde(default)]
    pub unspent_outputs: Vec<UtxoRecord>,
}

/// Confirmed reference from `GET {account_url}/{address}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxRef {
    pub tx_hash: String,
    pub value: u64,
    #[serde(default)]
    pub confirmations: u64,
    /// RFC 3339 confirmation time
    #[serde(default)]
    pub confirmed: Option<String>,
    #[serde(default)]
    pub addresses: Vec<String>,
    /// -1 when the address received the output, otherwise the spending input index
    #[serde(default)]
    pub tx_input_n: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnconfirmedRef {
    pub tx_hash: String,
    pub value: u64,
    /// sat/vB
    #[serde(default)]
    pub fees: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(default)]
    pub txrefs: Vec<TxRef>,
    #[serde(default)]
    pub unconfirmed_txrefs: Vec<UnconfirmedRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_tolerates_missing_fields() {
        let account: AccountRecord = serde_json::from_value(json!({
            "address": "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm",
            "txrefs": [{"tx_hash": "aa", "value": 1500, "confirmations": 0}],
        }))
        .expect("decode");
        assert_eq!(account.txrefs.len(), 1);
        assert!(account.txrefs[0].confirmed.is_none());
        assert!(account.txrefs[0].addresses.is_empty());
        assert!(account.unconfirmed_txrefs.is_empty());
    }

    #[test]
    fn test_unspent_field_names() {
        let resp: UnspentResponse = serde_json::from_value(json!({
            "unspent_outputs": [{
                "tx_hash": "reversed",
                "tx_hash_big_endian": "bb",
                "tx_output_n": 2,
                "value": 12_345,
                "confirmations": 6,
                "script": "76a914"
            }]
        }))
        .expect("decode");
        assert_eq!(resp.unspent_outputs[0].hash, "bb");
        assert_eq!(resp.unspent_outputs[0].output_index, 2);
    }
}
