//! Move tokens sent back to the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque move chosen by the decision step, e.g. `"copper"`.
///
/// The adapter never interprets the content; it is written back to the
/// engine verbatim followed by a newline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveToken(String);

impl MoveToken {
    pub fn new(token: impl Into<String>) -> Self {
        MoveToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MoveToken {
    fn from(s: &str) -> Self {
        MoveToken(s.to_string())
    }
}

impl From<String> for MoveToken {
    fn from(s: String) -> Self {
        MoveToken(s)
    }
}
