//! Runtime configuration resolved from command-line flags.

use std::path::PathBuf;

use anyhow::Context;
use pwkeeper_core::auth::{GateConfig, JsonPrefsStore, DEFAULT_MAX_PIN_ATTEMPTS};
use pwkeeper_core::db::{default_data_dir, DATABASE_FILE};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub gate: GateConfig,
}

impl AppConfig {
    /// Build the configuration. The attempt limit can only be tightened:
    /// it is clamped to `1..=DEFAULT_MAX_PIN_ATTEMPTS`.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        max_pin_attempts: u32,
        no_biometric: bool,
    ) -> anyhow::Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir().context("Could not determine a data directory")?,
        };

        Ok(Self {
            data_dir,
            gate: GateConfig {
                max_pin_attempts: Some(max_pin_attempts.clamp(1, DEFAULT_MAX_PIN_ATTEMPTS)),
                allow_biometric: !no_biometric,
                ..GateConfig::default()
            },
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn prefs_store(&self) -> JsonPrefsStore {
        JsonPrefsStore::in_dir(&self.data_dir)
    }
}
