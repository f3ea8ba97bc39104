//! Identity - Derives a P2PKH address from a pasted private key.
//!
//! Two encodings are accepted. The first character decides which decoder runs:
//!
//! | Prefix | Encoding | Public key |
//! |--------|----------|------------|
//! | `5` | WIF (Base58-check) | uncompressed |
//! | `K`, `L` | WIF (Base58-check) | compressed |
//! | anything else | 64 hex chars | uncompressed |
//!
//! The prefix sniff is not validation. Every branch still has to decode, and any
//! failure comes back as [`WalletError::InvalidCredential`].

use bitcoin::secp256k1::{Secp256k1, SecretKey};
use bitcoin::{Address, Network, NetworkKind, PrivateKey};
use serde::Serialize;
use std::fmt;
use zeroize::Zeroizing;

use crate::error::{WalletError, WalletResult};

const WIF_PREFIXES: [char; 3] = ['5', 'K', 'L'];

/// Raw recovery key as pasted by the user. Lives in memory only.
#[derive(Clone)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = Zeroizing::new(raw.into());
        Self(Zeroizing::new(raw.trim().to_string()))
    }

    pub fn kind(&self) -> CredentialKind {
        if self.0.starts_with(&WIF_PREFIXES[..]) { CredentialKind::Wif } else { CredentialKind::Hex }
    }

    pub fn expose(&self) -> &str { &self.0 }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind { Wif, Hex }

/// The active wallet. Replaced wholesale on every successful recovery.
#[derive(Debug, Clone, Serialize)]
pub struct WalletIdentity {
    pub address: String,
    pub public_key_hex: String,
    pub kind: CredentialKind,
    pub compressed: bool,
    #[serde(skip)]
    credential: Credential,
}

impl WalletIdentity {
    pub fn credential(&self) -> &Credential { &self.credential }
}

/// Decode a credential and derive its mainnet P2PKH identity.
pub fn decode(credential: Credential) -> WalletResult<WalletIdentity> {
    let kind = credential.kind();
    let private = match kind {
        CredentialKind::Wif => decode_wif(credential.expose())?,
        CredentialKind::Hex => decode_hex(credential.expose())?,
    };

    let secp = Secp256k1::new();
    let public = private.public_key(&secp);
    let address = Address::p2pkh(public.pubkey_hash(), Network::Bitcoin).to_string();

    Ok(WalletIdentity {
        address,
        public_key_hex: hex::encode(public.to_bytes()),
        kind,
        compressed: public.compressed,
        credential,
    })
}

/// Convenience wrapper over [`decode`] for raw strings.
pub fn recover(raw: &str) -> WalletResult<WalletIdentity> {
    decode(Credential::new(raw))
}

fn decode_wif(wif: &str) -> WalletResult<PrivateKey> {
    let key = PrivateKey::from_wif(wif)
        .map_err(|e| WalletError::invalid_credential(format!("WIF: {e}")))?;
    if key.network != NetworkKind::Main {
        return Err(WalletError::invalid_credential("WIF is not a mainnet key"));
    }
    Ok(key)
}

fn decode_hex(raw: &str) -> WalletResult<PrivateKey> {
    if raw.len() != 64 {
        return Err(WalletError::invalid_credential(format!(
            "hex key must be 64 characters, got {}",
            raw.len()
        )));
    }
    let bytes = Zeroizing::new(
        hex::decode(raw).map_err(|e| WalletError::invalid_credential(format!("hex: {e}")))?,
    );
    let sk = SecretKey::from_slice(&bytes)
        .map_err(|e| WalletError::invalid_credential(format!("scalar: {e}")))?;
    Ok(PrivateKey::new_uncompressed(sk, Network::Bitcoin))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_HEX: &str = "0000000000000000000000000000000000000000000000000000000000000001";
    const ONE_WIF_UNCOMPRESSED: &str = "5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf";
    const ONE_WIF_COMPRESSED: &str = "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn";
    const GENERATOR_ADDR_UNCOMPRESSED: &str = "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm";
    const GENERATOR_ADDR_COMPRESSED: &str = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";

    #[test]
    fn test_hex_scalar_one_is_generator_address() {
        let id = recover(ONE_HEX).expect("should derive");
        assert_eq!(id.address, GENERATOR_ADDR_UNCOMPRESSED);
        assert_eq!(id.kind, CredentialKind::Hex);
        assert!(!id.compressed);
        assert_eq!(id.public_key_hex.len(), 130);
        assert!(id.public_key_hex.starts_with("04"));
    }

    #[test]
    fn test_hex_deterministic() {
        let key = "1e99423a4ed27608a15a2616a2b0e9e52ced330ac530edcc32c8ffc6a526aedd";
        let a = recover(key).expect("should derive");
        let b = recover(key).expect("should derive");
        assert_eq!(a.address, b.address);
        assert_eq!(a.public_key_hex, b.public_key_hex);
    }

    #[test]
    fn test_wif_honours_compression_flag() {
        let uncompressed = recover(ONE_WIF_UNCOMPRESSED).expect("should derive");
        assert_eq!(uncompressed.address, GENERATOR_ADDR_UNCOMPRESSED);
        assert_eq!(uncompressed.kind, CredentialKind::Wif);

        let compressed = recover(ONE_WIF_COMPRESSED).expect("should derive");
        assert_eq!(compressed.address, GENERATOR_ADDR_COMPRESSED);
        assert!(compressed.compressed);
        assert_eq!(compressed.public_key_hex.len(), 66);
    }

    #[test]
    fn test_wif_prefixed_garbage_fails_cleanly() {
        for bad in ["5notbase58check", "K0OIl", "L", "5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDg"] {
            match recover(bad) {
                Err(WalletError::InvalidCredential(_)) => {}
                other => panic!("expected InvalidCredential for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_malformed_hex_fails() {
        assert!(matches!(recover("zz"), Err(WalletError::InvalidCredential(_))));
        assert!(matches!(recover(&"g".repeat(64)), Err(WalletError::InvalidCredential(_))));
        assert!(matches!(recover(&"0".repeat(64)), Err(WalletError::InvalidCredential(_))));
        assert!(matches!(recover(""), Err(WalletError::InvalidCredential(_))));
    }

    #[test]
    fn test_scalar_at_curve_order_fails() {
        let n = "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141";
        assert!(matches!(recover(n), Err(WalletError::InvalidCredential(_))));
        assert!(matches!(recover(&"f".repeat(64)), Err(WalletError::InvalidCredential(_))));
    }

    #[test]
    fn test_testnet_wif_rejected() {
        let testnet = "cVt4o7BGAig1UXywgGSmARhxMdzP5qvQsxKkSsc1XEkw3tDTQFpy";
        match decode_wif(testnet) {
            Err(WalletError::InvalidCredential(msg)) => assert!(msg.contains("mainnet"), "{msg}"),
            other => panic!("expected mainnet rejection, got {other:?}"),
        }
        // 'c' is not a WIF prefix, so full recovery fails on the hex branch
        assert_eq!(Credential::new(testnet).kind(), CredentialKind::Hex);
        assert!(matches!(recover(testnet), Err(WalletError::InvalidCredential(_))));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let id = recover(&format!("  {ONE_HEX}\n")).expect("should derive");
        assert_eq!(id.address, GENERATOR_ADDR_UNCOMPRESSED);
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let id = recover(ONE_HEX).expect("should derive");
        let debug = format!("{:?}", id);
        assert!(!debug.contains(ONE_HEX));
        assert_eq!(id.credential().expose(), ONE_HEX);
    }
}
