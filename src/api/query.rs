//! Query-string parameter structs

use crate::graph::DEFAULT_SLICE_LIMIT;
use serde::{Deserialize, Deserializer};

/// Helper to deserialize the limit from the query string (which is always a string)
fn deserialize_limit<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => s.trim().parse().map_err(D::Error::custom),
        _ => Ok(DEFAULT_SLICE_LIMIT),
    }
}

fn default_limit() -> i64 {
    DEFAULT_SLICE_LIMIT
}

/// Parameters of `GET /neo4j/graph`
#[derive(Debug, Deserialize, Clone)]
pub struct GraphParams {
    /// Max traversal rows (default: 100)
    #[serde(default = "default_limit", deserialize_with = "deserialize_limit")]
    pub limit: i64,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

impl GraphParams {
    /// Validated limit
    pub fn validate(&self) -> Result<i64, String> {
        if self.limit < 0 {
            return Err("limit cannot be negative".to_string());
        }
        Ok(self.limit)
    }
}
