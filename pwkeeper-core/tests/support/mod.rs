//! Scripted collaborators for driving the gate in tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use pwkeeper_core::auth::{
    BiometricAuthenticator, BiometricCapability, BiometricOutcome, Confirmation, Prompter,
    TextPrompt,
};
use pwkeeper_core::db::Database;
use zeroize::Zeroizing;

/// Answers dialogs from a queue and records what was shown.
#[derive(Default)]
pub struct ScriptedPrompter {
    texts: VecDeque<Option<String>>,
    confirmations: VecDeque<Confirmation>,
    pub prompts: Vec<String>,
    pub confirms: Vec<String>,
    pub notices: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a typed answer for the next text dialog.
    pub fn typing(mut self, text: &str) -> Self {
        self.texts.push_back(Some(text.to_string()));
        self
    }

    /// Queue a cancel for the next text dialog.
    pub fn cancelling(mut self) -> Self {
        self.texts.push_back(None);
        self
    }

    pub fn answering(mut self, answer: Confirmation) -> Self {
        self.confirmations.push_back(answer);
        self
    }

    pub fn count_prompts(&self, title: &str) -> usize {
        self.prompts.iter().filter(|p| *p == title).count()
    }

    pub fn saw_notice(&self, notice: &str) -> bool {
        self.notices.iter().any(|n| n == notice)
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt_text(
        &mut self,
        prompt: &TextPrompt<'_>,
    ) -> pwkeeper_core::Result<Option<Zeroizing<String>>> {
        self.prompts.push(prompt.title.to_string());
        let answer = self
            .texts
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected text prompt: {}", prompt.title));
        Ok(answer.map(Zeroizing::new))
    }

    fn confirm(&mut self, title: &str, _message: &str) -> pwkeeper_core::Result<Confirmation> {
        self.confirms.push(title.to_string());
        Ok(self
            .confirmations
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected confirmation: {}", title)))
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

/// Sensor with a fixed capability and a queue of prompt outcomes.
pub struct ScriptedBiometrics {
    capability: BiometricCapability,
    outcomes: VecDeque<BiometricOutcome>,
    pub prompts: usize,
}

impl ScriptedBiometrics {
    pub fn new(capability: BiometricCapability) -> Self {
        Self {
            capability,
            outcomes: VecDeque::new(),
            prompts: 0,
        }
    }

    pub fn then(mut self, outcome: BiometricOutcome) -> Self {
        self.outcomes.push_back(outcome);
        self
    }
}

impl BiometricAuthenticator for ScriptedBiometrics {
    fn capability(&self) -> BiometricCapability {
        self.capability
    }

    fn authenticate(&mut self) -> BiometricOutcome {
        self.prompts += 1;
        self.outcomes
            .pop_front()
            .expect("unexpected biometric prompt")
    }
}

pub fn setup_db() -> Database {
    let db = Database::open_memory().expect("Failed to create test database");
    db.migrate().expect("Failed to migrate test database");
    db
}
