//! Startup authentication state machine.
//!
//! ```text
//!   no PIN ──► PinSetup ──► CheckBiometricAvailability ──► Authenticated
//!   PIN + biometric ──► BiometricPrompt ──(error)──► PinPrompt
//!   PIN only ──► PinPrompt ──► Authenticated | LockedOut
//! ```
//!
//! Any cancelled dialog ends the flow with [`GateOutcome::Cancelled`].
//!
//! Wrong PIN entries are counted in the stored preferences, so the attempt
//! limit holds across restarts. Reaching it stores a lockout deadline; until
//! then every start ends in [`GateOutcome::LockedOut`] at the PIN prompt.

use chrono::{Duration, Utc};

use super::biometric::{BiometricAuthenticator, BiometricOutcome};
use super::pin::{validate_pin, PinHash};
use super::prefs::{AuthPrefs, PrefsStore};
use super::prompt::{Confirmation, Prompter, TextPrompt};
use crate::error::{Error, Result};

pub const DEFAULT_MAX_PIN_ATTEMPTS: u32 = 5;
pub const DEFAULT_LOCKOUT_MINUTES: i64 = 5;

const SETUP_PIN_PROMPT: TextPrompt<'static> =
    TextPrompt::secret("Set up PIN").with_hint("Enter a 6-digit PIN");
const ENTER_PIN_PROMPT: TextPrompt<'static> = TextPrompt::secret("Enter PIN");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateConfig {
    /// Wrong PIN entries allowed before lockout. `None` never locks out.
    pub max_pin_attempts: Option<u32>,
    /// How long PIN entry stays refused after the limit is reached.
    pub lockout_period: Duration,
    /// When false the biometric prompt is skipped even if enabled.
    pub allow_biometric: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_pin_attempts: Some(DEFAULT_MAX_PIN_ATTEMPTS),
            lockout_period: Duration::minutes(DEFAULT_LOCKOUT_MINUTES),
            allow_biometric: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    PinSetup,
    CheckBiometricAvailability,
    BiometricPrompt,
    PinPrompt,
    Authenticated,
    Cancelled,
    LockedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Authenticated,
    Cancelled,
    LockedOut,
}

impl GateOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

pub struct Gate<S: PrefsStore> {
    store: S,
    prefs: AuthPrefs,
    config: GateConfig,
}

impl<S: PrefsStore> Gate<S> {
    /// Load preferences once and build the gate.
    pub fn new(store: S, config: GateConfig) -> Result<Self> {
        let prefs = store.load()?;
        Ok(Self {
            store,
            prefs,
            config,
        })
    }

    pub fn prefs(&self) -> &AuthPrefs {
        &self.prefs
    }

    /// State the gate starts in for the loaded preferences.
    pub fn initial_state(&self) -> GateState {
        if !self.prefs.is_pin_set() {
            GateState::PinSetup
        } else if self.prefs.use_biometric && self.config.allow_biometric {
            GateState::BiometricPrompt
        } else {
            GateState::PinPrompt
        }
    }

    /// Drive the state machine until it reaches a terminal state.
    pub fn run(
        &mut self,
        prompter: &mut dyn Prompter,
        biometrics: &mut dyn BiometricAuthenticator,
    ) -> Result<GateOutcome> {
        let mut state = self.initial_state();
        tracing::info!(?state, "Starting authentication");

        loop {
            let next = self.step(state, prompter, biometrics)?;
            if next != state {
                tracing::debug!(from = ?state, to = ?next, "Gate transition");
            }
            state = next;

            match state {
                GateState::Authenticated => return Ok(GateOutcome::Authenticated),
                GateState::Cancelled => return Ok(GateOutcome::Cancelled),
                GateState::LockedOut => return Ok(GateOutcome::LockedOut),
                _ => {}
            }
        }
    }

    /// Perform the work of `state` and return the state that follows it.
    pub fn step(
        &mut self,
        state: GateState,
        prompter: &mut dyn Prompter,
        biometrics: &mut dyn BiometricAuthenticator,
    ) -> Result<GateState> {
        match state {
            GateState::PinSetup => self.pin_setup(prompter),
            GateState::CheckBiometricAvailability => {
                self.check_biometric_availability(prompter, biometrics)
            }
            GateState::BiometricPrompt => self.biometric_prompt(prompter, biometrics),
            GateState::PinPrompt => self.pin_prompt(prompter),
            terminal => Ok(terminal),
        }
    }

    fn pin_setup(&mut self, prompter: &mut dyn Prompter) -> Result<GateState> {
        match self.ask_new_pin(prompter)? {
            Some(pin) => {
                self.prefs.pin = Some(pin);
                self.store.save(&self.prefs)?;
                tracing::info!("PIN configured");
                Ok(GateState::CheckBiometricAvailability)
            }
            None => Ok(GateState::Cancelled),
        }
    }

    /// Show the setup dialog until a valid PIN is entered or it is cancelled.
    fn ask_new_pin(&self, prompter: &mut dyn Prompter) -> Result<Option<PinHash>> {
        loop {
            let Some(entered) = prompter.prompt_text(&SETUP_PIN_PROMPT)? else {
                return Ok(None);
            };

            match validate_pin(&entered) {
                Ok(()) => return PinHash::hash(&entered).map(Some),
                Err(Error::Validation(message)) => prompter.notify(&message),
                Err(e) => return Err(e),
            }
        }
    }

    fn check_biometric_availability(
        &mut self,
        prompter: &mut dyn Prompter,
        biometrics: &dyn BiometricAuthenticator,
    ) -> Result<GateState> {
        let capability = biometrics.capability();
        if !capability.is_available() {
            tracing::info!(%capability, "Skipping biometric enrollment");
            return Ok(GateState::Authenticated);
        }

        let answer = prompter.confirm(
            "Enable Biometric Login",
            "Do you want to enable biometric authentication?",
        )?;

        match answer {
            Confirmation::Cancel => Ok(GateState::Cancelled),
            answer => {
                self.prefs.use_biometric = answer == Confirmation::Yes;
                self.store.save(&self.prefs)?;
                Ok(GateState::Authenticated)
            }
        }
    }

    fn biometric_prompt(
        &mut self,
        prompter: &mut dyn Prompter,
        biometrics: &mut dyn BiometricAuthenticator,
    ) -> Result<GateState> {
        match biometrics.authenticate() {
            BiometricOutcome::Succeeded => {
                prompter.notify("Authentication succeeded!");
                self.clear_pin_failures()?;
                Ok(GateState::Authenticated)
            }
            BiometricOutcome::Error(reason) => {
                tracing::warn!(%reason, "Biometric prompt failed, falling back to PIN");
                prompter.notify(&format!("Authentication error: {}", reason));
                Ok(GateState::PinPrompt)
            }
            BiometricOutcome::Failed => {
                prompter.notify("Authentication failed");
                Ok(GateState::BiometricPrompt)
            }
        }
    }

    fn pin_prompt(&mut self, prompter: &mut dyn Prompter) -> Result<GateState> {
        if self.prefs.is_locked_at(Utc::now()) {
            tracing::warn!(until = ?self.prefs.locked_until, "PIN entry still locked out");
            prompter.notify("Too many failed attempts. Try again later");
            return Ok(GateState::LockedOut);
        }
        if self.prefs.locked_until.is_some() {
            self.prefs.locked_until = None;
            self.prefs.failed_pin_attempts = 0;
        }

        let Some(entered) = prompter.prompt_text(&ENTER_PIN_PROMPT)? else {
            return Ok(GateState::Cancelled);
        };

        if self.verify_pin(&entered)? {
            self.clear_pin_failures()?;
            prompter.notify("PIN authentication successful");
            return Ok(GateState::Authenticated);
        }

        self.prefs.failed_pin_attempts += 1;
        let locked = self
            .config
            .max_pin_attempts
            .is_some_and(|max| self.prefs.failed_pin_attempts >= max);

        if locked {
            tracing::warn!(attempts = self.prefs.failed_pin_attempts, "PIN entry locked out");
            let until = Utc::now()
                .checked_add_signed(self.config.lockout_period)
                .ok_or_else(|| Error::Validation("Lockout period is out of range".to_string()))?;
            self.prefs.failed_pin_attempts = 0;
            self.prefs.locked_until = Some(until);
            self.store.save(&self.prefs)?;
            prompter.notify("Too many failed attempts");
            return Ok(GateState::LockedOut);
        }

        self.store.save(&self.prefs)?;
        prompter.notify("Invalid PIN");
        Ok(GateState::PinPrompt)
    }

    /// Forget wrong PIN entries and any lockout after a successful login.
    fn clear_pin_failures(&mut self) -> Result<()> {
        if self.prefs.failed_pin_attempts == 0 && self.prefs.locked_until.is_none() {
            return Ok(());
        }
        self.prefs.failed_pin_attempts = 0;
        self.prefs.locked_until = None;
        self.store.save(&self.prefs)
    }

    fn verify_pin(&self, entered: &str) -> Result<bool> {
        match &self.prefs.pin {
            Some(pin) => pin.verify(entered),
            None => Ok(false),
        }
    }

    /// Replace the PIN through the setup dialog. Call after a successful
    /// [`run`](Self::run). Returns false if the dialog was cancelled.
    pub fn change_pin(&mut self, prompter: &mut dyn Prompter) -> Result<bool> {
        match self.ask_new_pin(prompter)? {
            Some(pin) => {
                self.prefs.pin = Some(pin);
                self.store.save(&self.prefs)?;
                tracing::info!("PIN changed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Turn biometric login on or off. Enabling requires available hardware.
    pub fn set_biometric(
        &mut self,
        enabled: bool,
        biometrics: &dyn BiometricAuthenticator,
    ) -> Result<()> {
        if enabled {
            let capability = biometrics.capability();
            if !capability.is_available() {
                return Err(Error::Validation(format!(
                    "Biometric authentication is not available: {}",
                    capability
                )));
            }
        }

        self.prefs.use_biometric = enabled;
        self.store.save(&self.prefs)?;
        tracing::info!(enabled, "Biometric login updated");
        Ok(())
    }
}
