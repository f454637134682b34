use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The destination URL an alias resolves to.
///
/// Only emptiness is checked; the value is stored and returned verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target(String);

impl Target {
    pub fn new(target: impl Into<String>) -> Result<Self, StoreError> {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(StoreError::Validation("target cannot be empty".to_string()));
        }
        Ok(Self(target))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Target {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Target> for String {
    fn from(value: Target) -> Self {
        value.0
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank() {
        assert!(matches!(Target::new(""), Err(StoreError::Validation(_))));
        assert!(matches!(Target::new(" \t"), Err(StoreError::Validation(_))));
    }

    #[test]
    fn keeps_value_verbatim() {
        let target = Target::new(" https://example.com/a b ").unwrap();
        assert_eq!(target.as_str(), " https://example.com/a b ");
    }
}
