//! Schema identifiers (labels and relationship types)
//!
//! Cypher cannot bind labels or relationship types as parameters, so they are
//! the only caller-supplied values ever interpolated into query text. These
//! newtypes can only be obtained through the allow-list check below, which
//! makes an unvalidated identifier unrepresentable at the store boundary.

use super::error::{GraphError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("identifier pattern is valid"));

/// Returns true when `raw` is non-empty and made only of ASCII letters, digits and `_`
pub fn is_safe_identifier(raw: &str) -> bool {
    IDENTIFIER.is_match(raw)
}

/// A validated node label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    pub fn parse(raw: &str) -> Result<Self> {
        if is_safe_identifier(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(GraphError::InvalidLabel(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Backtick-quoted form for interpolation into Cypher
    pub fn quoted(&self) -> String {
        format!("`{}`", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated relationship type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipType(String);

impl RelationshipType {
    pub fn parse(raw: &str) -> Result<Self> {
        if is_safe_identifier(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(GraphError::InvalidRelationshipType(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn quoted(&self) -> String {
        format!("`{}`", self.0)
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
