//! Persistent authentication preferences.
//!
//! The stored PIN hash and the biometric opt-in live in a small JSON file
//! (`auth_prefs.json`) next to the credential database. The gate loads them
//! once through a [`PrefsStore`] and writes them back after setup changes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pin::PinHash;
use crate::error::{Error, Result};
use crate::private_fs;

/// File name of the preferences file inside the data directory.
pub const PREFS_FILE: &str = "auth_prefs.json";

/// Authentication state derived on every start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthPrefs {
    pub pin: Option<PinHash>,
    pub use_biometric: bool,
    /// Wrong PIN entries since the last successful login or lockout.
    pub failed_pin_attempts: u32,
    /// PIN entry is refused until this instant.
    pub locked_until: Option<DateTime<Utc>>,
}

impl AuthPrefs {
    pub fn is_pin_set(&self) -> bool {
        self.pin.is_some()
    }

    /// Whether a lockout is still running at `now`.
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }
}

/// Read/write capability for [`AuthPrefs`].
pub trait PrefsStore {
    fn load(&self) -> Result<AuthPrefs>;
    fn save(&self, prefs: &AuthPrefs) -> Result<()>;
}

/// On-disk layout. Key names match the legacy preferences keys.
#[derive(Debug, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(rename = "PIN", default, skip_serializing_if = "Option::is_none")]
    pin: Option<String>,
    #[serde(rename = "UseBiometric", default)]
    use_biometric: bool,
    #[serde(rename = "FailedPinAttempts", default, skip_serializing_if = "is_zero")]
    failed_pin_attempts: u32,
    #[serde(rename = "LockedUntil", default, skip_serializing_if = "Option::is_none")]
    locked_until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// JSON file backed preferences.
#[derive(Debug, Clone)]
pub struct JsonPrefsStore {
    path: PathBuf,
}

impl JsonPrefsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Preferences file inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(PREFS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Option<PrefsFile>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn write_file(&self, file: &PrefsFile) -> Result<()> {
        private_fs::create_parent_dir(&self.path)?;

        let json = serde_json::to_string_pretty(file)?;

        // Atomic write: write to an owner-only temp file, then rename
        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut out = private_fs::create_file(&temp_path)?;
            out.write_all(json.as_bytes())?;
            out.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl PrefsStore for JsonPrefsStore {
    fn load(&self) -> Result<AuthPrefs> {
        let Some(file) = self.read_file()? else {
            return Ok(AuthPrefs::default());
        };

        let mut prefs = AuthPrefs {
            pin: None,
            use_biometric: file.use_biometric,
            failed_pin_attempts: file.failed_pin_attempts,
            locked_until: file.locked_until,
        };

        match file.pin {
            None => {}
            Some(value) if PinHash::is_hash(&value) => prefs.pin = Some(PinHash::from_hash(value)?),
            Some(plaintext) => {
                tracing::info!("Upgrading plaintext PIN in {}", self.path.display());
                prefs.pin = Some(PinHash::from_legacy_plaintext(&plaintext)?);
                self.save(&prefs)?;
            }
        }

        Ok(prefs)
    }

    fn save(&self, prefs: &AuthPrefs) -> Result<()> {
        self.write_file(&PrefsFile {
            pin: prefs.pin.as_ref().map(|p| p.hash_string().to_string()),
            use_biometric: prefs.use_biometric,
            failed_pin_attempts: prefs.failed_pin_attempts,
            locked_until: prefs.locked_until,
            updated_at: Some(Utc::now().to_rfc3339()),
        })
    }
}

/// Process-local preferences, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefsStore {
    inner: Arc<Mutex<AuthPrefs>>,
}

impl MemoryPrefsStore {
    pub fn new(prefs: AuthPrefs) -> Self {
        Self {
            inner: Arc::new(Mutex::new(prefs)),
        }
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load(&self) -> Result<AuthPrefs> {
        self.inner
            .lock()
            .map(|prefs| prefs.clone())
            .map_err(|_| Error::Storage("Preferences lock poisoned".to_string()))
    }

    fn save(&self, prefs: &AuthPrefs) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| Error::Storage("Preferences lock poisoned".to_string()))?;
        *guard = prefs.clone();
        Ok(())
    }
}
