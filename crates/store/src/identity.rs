//! Authenticated caller identity.

use std::fmt;

/// An authenticated identity, as reported by the access gate after a
/// successful login (typically an email address).
///
/// The store never reads an ambient "current user" - every operation takes
/// an `Identity` explicitly, and the only place one should be constructed is
/// the boundary that consumes the gate's verdict. The string itself is
/// opaque and untrusted: it is sanitized before ever becoming part of a
/// filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Identity {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
