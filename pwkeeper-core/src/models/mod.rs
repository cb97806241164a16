mod credential;

pub use credential::*;
