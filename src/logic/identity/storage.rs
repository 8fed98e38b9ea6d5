//! Device Identity Storage with Checksum
//!
//! Persists one opaque device id across restarts. The file carries a SHA-256
//! checksum; a missing, unreadable or tampered file is replaced by a fresh id.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::IdentityProvider;
use crate::constants::IDENTITY_FILE_NAME;
use crate::logic::error::{RiskError, RiskResult};

const CHECKSUM_PREFIX: &str = "DeviceRisk_Identity_v1_";

/// Stored identity file format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IdentityFile {
    device_id: String,
    created_at: DateTime<Utc>,
    checksum: String,
    format_version: u32,
}

pub struct FileIdentityStore {
    file_path: PathBuf,
    /// Serializes get_or_create so two readers never mint two ids
    cached: Mutex<Option<String>>,
}

impl FileIdentityStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            cached: Mutex::new(None),
        }
    }

    /// Store under the platform's local data directory
    pub fn in_data_dir() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("device-risk");
        Self::new(data_dir.join(IDENTITY_FILE_NAME))
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn load(&self) -> RiskResult<String> {
        let content = fs::read_to_string(&self.file_path)?;
        let file: IdentityFile = serde_json::from_str(&content)?;

        if file.checksum != checksum(&file.device_id, &file.created_at) {
            return Err(RiskError::Identity("checksum mismatch (file tampered)".to_string()));
        }
        if file.device_id.trim().is_empty() {
            return Err(RiskError::Identity("empty device id".to_string()));
        }

        Ok(file.device_id)
    }

    fn create(&self) -> RiskResult<String> {
        let device_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let file = IdentityFile {
            checksum: checksum(&device_id, &created_at),
            device_id: device_id.clone(),
            created_at,
            format_version: 1,
        };

        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.file_path, serde_json::to_string_pretty(&file)?)?;

        log::info!("Device identity created: {}...", &device_id[..8]);
        Ok(device_id)
    }
}

impl IdentityProvider for FileIdentityStore {
    fn get_or_create(&self) -> RiskResult<String> {
        let mut cached = self.cached.lock();
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }

        let id = match self.load() {
            Ok(id) => id,
            Err(e) => {
                if self.file_path.exists() {
                    log::warn!("Identity file unusable ({}), regenerating", e);
                }
                self.create()?
            }
        };

        *cached = Some(id.clone());
        Ok(id)
    }
}

fn checksum(device_id: &str, created_at: &DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(CHECKSUM_PREFIX.as_bytes());
    hasher.update(device_id.as_bytes());
    hasher.update(created_at.to_rfc3339().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_then_reload_same_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("identity.json");

        let first = FileIdentityStore::new(&path).get_or_create().unwrap();
        // New store instance simulates a process restart
        let second = FileIdentityStore::new(&path).get_or_create().unwrap();

        assert_eq!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn test_tampered_file_is_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");

        let original = FileIdentityStore::new(&path).get_or_create().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let forged = content.replace(&original, "00000000-0000-0000-0000-000000000000");
        fs::write(&path, forged).unwrap();

        let regenerated = FileIdentityStore::new(&path).get_or_create().unwrap();
        assert_ne!(regenerated, original);
        assert_ne!(regenerated, "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_garbage_file_is_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");
        fs::write(&path, "not json").unwrap();

        let id = FileIdentityStore::new(&path).get_or_create().unwrap();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_cached_within_instance() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileIdentityStore::new(dir.path().join("identity.json"));
        assert_eq!(store.get_or_create().unwrap(), store.get_or_create().unwrap());
    }
}
