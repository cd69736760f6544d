//! A single decoded line of engine output.

use std::fmt;
use std::ops::Deref;

/// One line of engine output, without its line terminator.
///
/// Lines are produced once by the reader and never mutated afterwards,
/// so the text is held as a boxed `str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line(Box<str>);

impl Line {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Line {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Line {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Line {
    fn from(s: String) -> Self {
        Line(s.into_boxed_str())
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Line(s.into())
    }
}

impl PartialEq<str> for Line {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Line {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
