//! Validated pipeline identifiers

use crate::core::error::InvalidNameError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Concourse identifier rules: a leading lowercase (or caseless) letter, then
/// lowercase letters, ASCII digits, `-`, `_` or `.`
const IDENTIFIER_PATTERN: &str = r"^[\p{Ll}\p{Lt}\p{Lm}\p{Lo}][\p{Ll}\p{Lt}\p{Lm}\p{Lo}0-9\-_.]*$";

fn identifier_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(IDENTIFIER_PATTERN).expect("identifier pattern is valid"))
}

/// Name of a resource, resource type, job, task or task input/output
///
/// Every named entity in a pipeline is identified solely by one of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Validate `raw` and wrap it
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidNameError> {
        let raw = raw.into();

        if raw.is_empty() {
            return Err(InvalidNameError {
                value: raw,
                reason: "identifier must not be empty".to_string(),
            });
        }

        if !identifier_regex().is_match(&raw) {
            let reason = match raw.chars().next() {
                Some(c) if !c.is_alphabetic() || c.is_uppercase() => {
                    format!("must start with a lowercase letter, found '{}'", c)
                }
                _ => "may only contain lowercase letters, digits, '-', '_' and '.'".to_string(),
            };
            return Err(InvalidNameError { value: raw, reason });
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = InvalidNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = InvalidNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::str::FromStr for Identifier {
    type Err = InvalidNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
