//! Biometric sensor abstraction.

use std::fmt;

/// Result of probing the platform for strong biometric support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometricCapability {
    Available,
    NoHardware,
    HardwareUnavailable,
    NoneEnrolled,
}

impl BiometricCapability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::NoHardware => "no biometric hardware",
            Self::HardwareUnavailable => "biometric hardware unavailable",
            Self::NoneEnrolled => "no biometrics enrolled",
        }
    }
}

impl fmt::Display for BiometricCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one biometric prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiometricOutcome {
    Succeeded,
    /// The prompt could not complete (sensor error, user chose the PIN).
    Error(String),
    /// A scan was read but did not match.
    Failed,
}

/// Platform biometric verification.
pub trait BiometricAuthenticator {
    fn capability(&self) -> BiometricCapability;

    /// Show the prompt and block until it reports an outcome.
    fn authenticate(&mut self) -> BiometricOutcome;
}

/// Authenticator for machines without a sensor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBiometrics;

impl BiometricAuthenticator for NoBiometrics {
    fn capability(&self) -> BiometricCapability {
        BiometricCapability::NoHardware
    }

    fn authenticate(&mut self) -> BiometricOutcome {
        BiometricOutcome::Error(BiometricCapability::NoHardware.to_string())
    }
}
