//! Terminal front end for pwkeeper.
//!
//! The `pwk` binary wires [`pwkeeper_core`]'s gate and credential store to
//! stdin/stderr dialogs ([`terminal`]) and an fprintd fingerprint reader
//! ([`fprintd`]).

pub mod commands;
pub mod config;
pub mod fprintd;
pub mod terminal;

pub use config::AppConfig;
