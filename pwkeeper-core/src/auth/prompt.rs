//! Dialog collaborators the gate calls into.

use zeroize::Zeroizing;

use crate::error::Result;

/// A modal text-entry dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPrompt<'a> {
    pub title: &'a str,
    pub hint: Option<&'a str>,
    /// Input should not be echoed.
    pub secret: bool,
}

impl<'a> TextPrompt<'a> {
    pub const fn new(title: &'a str) -> Self {
        Self {
            title,
            hint: None,
            secret: false,
        }
    }

    pub const fn secret(title: &'a str) -> Self {
        Self {
            title,
            hint: None,
            secret: true,
        }
    }

    pub const fn with_hint(mut self, hint: &'a str) -> Self {
        self.hint = Some(hint);
        self
    }
}

/// Answer to a yes/no dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    Cancel,
}

/// Presentation layer used by the gate and the vault commands.
pub trait Prompter {
    /// Show a text dialog. `None` means the user cancelled.
    fn prompt_text(&mut self, prompt: &TextPrompt<'_>) -> Result<Option<Zeroizing<String>>>;

    /// Show a yes/no dialog.
    fn confirm(&mut self, title: &str, message: &str) -> Result<Confirmation>;

    /// Show a transient message.
    fn notify(&mut self, message: &str);
}
