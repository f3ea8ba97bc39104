//! Export of the tracked pending transaction as `transaction.json`.

use std::path::{Path, PathBuf};

use crate::error::{WalletError, WalletResult};
use crate::session::PendingTransaction;

pub const EXPORT_FILE_NAME: &str = "transaction.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub file_name: &'static str,
    pub contents: String,
}

impl ExportPayload {
    pub fn for_pending(pending: &PendingTransaction) -> WalletResult<Self> {
        let contents = serde_json::to_string_pretty(pending)
            .map_err(|e| WalletError::Export(format!("serialize: {e}")))?;
        Ok(Self { file_name: EXPORT_FILE_NAME, contents })
    }

    /// Write into `dir`, replacing any previous export. Returns the file path.
    pub fn write_to_dir(&self, dir: &Path) -> WalletResult<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| WalletError::Export(format!("mkdir {}: {e}", dir.display())))?;
        let path = dir.join(self.file_name);
        std::fs::write(&path, &self.contents).map_err(|e| WalletError::Export(format!("write {}: {e}", path.display())))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    fn pending() -> PendingTransaction {
        PendingTransaction { txid: "ff".repeat(32), amount: 0.0002, fee_rate: 3.5 }
    }

    #[test]
    fn test_payload_is_pretty_json() {
        let payload = ExportPayload::for_pending(&pending()).expect("export");
        assert_eq!(payload.file_name, "transaction.json");
        assert!(payload.contents.contains("\n  \"txid\""));
        let v: Value = serde_json::from_str(&payload.contents).expect("json");
        assert_eq!(v["amount"], 0.0002);
        assert_eq!(v["fee"], 3.5);
    }

    #[test]
    fn test_write_to_dir_round_trips() {
        let dir = TempDir::new().expect("tempdir");
        let payload = ExportPayload::for_pending(&pending()).expect("export");
        let path = payload.write_to_dir(&dir.path().join("out")).expect("write");
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(EXPORT_FILE_NAME));
        let read: PendingTransaction = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, pending());
    }
}
