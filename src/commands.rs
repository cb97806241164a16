//! Vault commands run after the gate has authenticated the user.

use std::io::Write;

use anyhow::{bail, Context};
use pwkeeper_core::auth::{Confirmation, Prompter, TextPrompt};
use pwkeeper_core::models::{CreateCredentialInput, Credential};
use pwkeeper_core::{Database, Error};

const TITLE_PROMPT: TextPrompt<'static> = TextPrompt::new("Title");
const EMAIL_PROMPT: TextPrompt<'static> = TextPrompt::new("Email/User").with_hint("optional");
const PASSWORD_PROMPT: TextPrompt<'static> = TextPrompt::secret("Password");

/// Which records a delete targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Id(i64),
    /// Every record with exactly this title.
    Title(String),
}

/// Print credentials as an indented listing or as JSON.
pub fn render(out: &mut dyn Write, credentials: &[Credential], json: bool) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(credentials)?)?;
        return Ok(());
    }

    if credentials.is_empty() {
        writeln!(out, "No entries")?;
        return Ok(());
    }

    for credential in credentials {
        writeln!(out, "[{}] {}", credential.id, credential.title)?;
        for line in credential.details().lines() {
            writeln!(out, "    {}", line)?;
        }
    }
    Ok(())
}

pub fn list(db: &Database, out: &mut dyn Write, json: bool) -> anyhow::Result<()> {
    let credentials = db.list_credentials()?;
    render(out, &credentials, json)
}

pub fn search(db: &Database, query: &str, out: &mut dyn Write, json: bool) -> anyhow::Result<()> {
    let credentials = db.search_credentials(query)?;
    render(out, &credentials, json)
}

/// Add a credential, prompting for any field not given on the command line.
/// Returns the new id, or `None` if a dialog was cancelled.
pub fn add(
    db: &Database,
    prompter: &mut dyn Prompter,
    title: Option<String>,
    email: Option<String>,
) -> anyhow::Result<Option<i64>> {
    let (mut title, mut email) = (title, email);

    loop {
        let Some(input) = collect_input(prompter, title.take(), email.take())? else {
            return Ok(None);
        };

        match db.insert_credential(input) {
            Ok(id) => {
                prompter.notify(&format!("Added entry {}", id));
                return Ok(Some(id));
            }
            // Re-open the dialog with every field blank
            Err(Error::Validation(message)) => prompter.notify(&message),
            Err(e) => return Err(e).context("Failed to store entry"),
        }
    }
}

fn collect_input(
    prompter: &mut dyn Prompter,
    title: Option<String>,
    email: Option<String>,
) -> anyhow::Result<Option<CreateCredentialInput>> {
    let title = match title {
        Some(title) => title,
        None => match prompter.prompt_text(&TITLE_PROMPT)? {
            Some(title) => title.as_str().to_owned(),
            None => return Ok(None),
        },
    };

    let email = match email {
        Some(email) => email,
        None => match prompter.prompt_text(&EMAIL_PROMPT)? {
            Some(email) => email.as_str().to_owned(),
            None => return Ok(None),
        },
    };

    let Some(secret) = prompter.prompt_text(&PASSWORD_PROMPT)? else {
        return Ok(None);
    };

    Ok(Some(CreateCredentialInput::new(title, email, secret.as_str())))
}

/// Delete after confirmation. Returns the number of rows removed.
pub fn delete(
    db: &Database,
    prompter: &mut dyn Prompter,
    target: DeleteTarget,
    assume_yes: bool,
) -> anyhow::Result<usize> {
    if let DeleteTarget::Id(id) = target {
        if db.get_credential(id)?.is_none() {
            bail!("No entry with id {}", id);
        }
    }

    if !assume_yes {
        let answer = prompter.confirm("Delete Item", "Are you sure you want to delete this item?")?;
        if answer != Confirmation::Yes {
            return Ok(0);
        }
    }

    let removed = match target {
        DeleteTarget::Id(id) => usize::from(db.delete_credential(id)?),
        DeleteTarget::Title(title) => db.delete_credentials_by_title(&title)?,
    };

    prompter.notify(&format!("Deleted {} entr{}", removed, if removed == 1 { "y" } else { "ies" }));
    Ok(removed)
}
