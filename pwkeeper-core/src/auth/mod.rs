//! Local authentication: PIN setup and entry, biometric unlock.

mod biometric;
mod gate;
mod pin;
mod prefs;
mod prompt;

pub use biometric::*;
pub use gate::*;
pub use pin::*;
pub use prefs::*;
pub use prompt::*;
