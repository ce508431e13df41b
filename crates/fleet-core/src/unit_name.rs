// ── Unit names ──
//
// fleet accepts `[A-Za-z0-9:_.@-]+`. Submission validates up front so a bad
// name never reaches the backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A validated unit name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitName(String);

impl UnitName {
    /// Validate `name` against the allowed character set.
    pub fn parse(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::InvalidUnitName {
                name,
                reason: "name must not be empty".into(),
            });
        }
        if let Some(bad) = name.chars().find(|c| !is_allowed(*c)) {
            return Err(CoreError::InvalidUnitName {
                reason: format!("character {bad:?} not allowed; use [a-zA-Z0-9:_.@-]"),
                name,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '@' | '-')
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UnitName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UnitName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for UnitName {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UnitName> for String {
    fn from(name: UnitName) -> Self {
        name.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_character_set() {
        for name in [
            "web.service",
            "web@1.service",
            "a:b_c-d.timer",
            "ABC123",
            "x",
        ] {
            assert_eq!(UnitName::parse(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn rejects_disallowed_characters() {
        for name in [
            "web service",
            "web/1.service",
            "ünit.service",
            "a\nb",
            "semi;colon",
            "web$.service",
        ] {
            let err = UnitName::parse(name).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidUnitName { name: ref n, .. } if n == name),
                "expected rejection of {name:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            UnitName::parse(""),
            Err(CoreError::InvalidUnitName { .. })
        ));
    }

    #[test]
    fn serde_validates() {
        let ok: UnitName = serde_json::from_str("\"web.service\"").unwrap();
        assert_eq!(ok.to_string(), "web.service");
        assert!(serde_json::from_str::<UnitName>("\"bad name\"").is_err());
    }
}
