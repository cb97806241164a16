//! Core library for pwkeeper.
//!
//! This crate provides the credential store and the startup authentication
//! gate, independent of any presentation layer. Dialogs and the biometric
//! sensor are injected through the traits in [`auth`].
//!
//! # Usage
//!
//! ```no_run
//! use pwkeeper_core::db::Database;
//! use pwkeeper_core::models::CreateCredentialInput;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! db.insert_credential(CreateCredentialInput::new("Bank", "me@example.com", "hunter2"))?;
//! let credentials = db.list_credentials()?;
//! # Ok::<(), pwkeeper_core::Error>(())
//! ```

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
mod private_fs;

// Re-export commonly used types at crate root
pub use db::Database;
pub use error::{Error, Result};
