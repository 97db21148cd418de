use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque server-issued thread identifier.
///
/// Thread ids are minted by the backend the element talks to; this layer
/// never inspects their contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<String> for ThreadId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for ThreadId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<ThreadId> for String {
    fn from(id: ThreadId) -> Self {
        id.0
    }
}
