use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A stored title/email/secret triple.
///
/// `title` is a display field and is not unique; `id` is the stable key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: i64,
    pub title: String,
    pub email: String,
    pub secret: String,
}

impl Credential {
    /// Email for display, `N/A` when none was stored.
    pub fn email_display(&self) -> &str {
        if self.email.is_empty() {
            "N/A"
        } else {
            &self.email
        }
    }

    /// The two-line detail block shown under the title in listings.
    pub fn details(&self) -> String {
        format!(
            "Email/User: {}\nPassword: {}",
            self.email_display(),
            self.secret
        )
    }
}

// Keep secrets out of logs and panic messages.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("email", &self.email)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CreateCredentialInput {
    pub title: String,
    #[serde(default)]
    pub email: String,
    pub secret: String,
}

impl CreateCredentialInput {
    pub fn new(
        title: impl Into<String>,
        email: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            email: email.into(),
            secret: secret.into(),
        }
    }

    /// Trim every field and reject an empty title or secret.
    pub fn normalized(self) -> Result<Self> {
        let title = self.title.trim().to_string();
        let email = self.email.trim().to_string();
        let secret = self.secret.trim().to_string();

        if title.is_empty() || secret.is_empty() {
            return Err(Error::Validation(
                "Please fill the title and password".to_string(),
            ));
        }

        Ok(Self {
            title,
            email,
            secret,
        })
    }
}

impl fmt::Debug for CreateCredentialInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateCredentialInput")
            .field("title", &self.title)
            .field("email", &self.email)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
