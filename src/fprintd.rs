//! Fingerprint verification through fprintd.
//!
//! Uses the `fprintd-list` and `fprintd-verify` command line tools, so no
//! D-Bus bindings are needed. Output parsing is kept in pure functions.

use std::process::Command;

use pwkeeper_core::auth::{BiometricAuthenticator, BiometricCapability, BiometricOutcome};

/// Consecutive non-matching scans before the sensor gives up and the gate
/// falls back to the PIN.
pub const MAX_FAILED_SCANS: u32 = 5;

/// Validates user names passed to fprintd.
/// Only allows alphanumeric, underscore, hyphen and dot.
fn is_valid_user(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Locate a binary in PATH.
fn find_binary(name: &str) -> Option<String> {
    let output = Command::new("which").arg(name).output().ok()?;

    if output.status.success() {
        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !path.is_empty() {
            return Some(path);
        }
    }
    None
}

/// Map `fprintd-list` output to a capability.
pub fn parse_list_output(success: bool, output: &str) -> BiometricCapability {
    if output.contains("No devices available") {
        BiometricCapability::NoHardware
    } else if !success {
        BiometricCapability::HardwareUnavailable
    } else if output.contains("no fingers enrolled") {
        BiometricCapability::NoneEnrolled
    } else if output.contains("Fingerprints for user") {
        BiometricCapability::Available
    } else {
        BiometricCapability::HardwareUnavailable
    }
}

/// Map `fprintd-verify` output to a prompt outcome.
pub fn parse_verify_output(output: &str) -> BiometricOutcome {
    // "verify-no-match" contains "verify-match", check it first
    if output.contains("verify-no-match") {
        BiometricOutcome::Failed
    } else if output.contains("verify-match") {
        BiometricOutcome::Succeeded
    } else {
        let reason = output
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("fingerprint verification failed");
        BiometricOutcome::Error(reason.to_string())
    }
}

/// Counts consecutive non-matching scans and turns the last allowed one
/// into an error, so the gate falls back to the PIN.
#[derive(Debug, Default)]
pub struct ScanLimiter {
    failed_scans: u32,
}

impl ScanLimiter {
    pub fn record(&mut self, outcome: BiometricOutcome) -> BiometricOutcome {
        self.limiter.record(outcome)
    }
}

pub struct FprintdAuthenticator {
    user: Option<String>,
    limiter: ScanLimiter,
}

impl FprintdAuthenticator {
    /// Authenticator for the user in `$USER`.
    pub fn for_current_user() -> Self {
        Self::new(std::env::var("USER").ok())
    }

    pub fn new(user: Option<String>) -> Self {
        let user = user.filter(|u| is_valid_user(u));
        Self {
            user,
            limiter: ScanLimiter::default(),
        }
    }

    fn run(&self, tool: &str) -> Option<(bool, String)> {
        let path = find_binary(tool)?;
        let user = self.user.as_deref()?;

        let output = Command::new(path).arg(user).output().ok()?;
        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Some((output.status.success(), text))
    }
}

impl BiometricAuthenticator for FprintdAuthenticator {
    fn capability(&self) -> BiometricCapability {
        if self.user.is_none() {
            return BiometricCapability::HardwareUnavailable;
        }

        match self.run("fprintd-list") {
            Some((success, output)) => parse_list_output(success, &output),
            None => BiometricCapability::NoHardware,
        }
    }

    fn authenticate(&mut self) -> BiometricOutcome {
        eprintln!("Biometric login: place your finger on the sensor");

        let outcome = match self.run("fprintd-verify") {
            Some((_, output)) => parse_verify_output(&output),
            None => BiometricOutcome::Error("fprintd-verify is not available".to_string()),
        };

        self.limiter.record(outcome)
    }
}
