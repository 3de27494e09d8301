//! Graph models shared by the store, the mapper and the API
//!
//! These types are independent of the Bolt driver: `bolt.rs` is the only
//! module that translates between them and `neo4rs` values.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Property name → value
pub type PropertyMap = BTreeMap<String, PropertyValue>;

// ============================================================================
// Property values
// ============================================================================

/// A property value as held by the store.
///
/// Temporal variants only ever come back from the store; request bodies are
/// JSON and deserialize into the plain variants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<PropertyValue>),
    Map(PropertyMap),
    Date(NaiveDate),
    LocalTime(NaiveTime),
    Time {
        time: NaiveTime,
        offset: FixedOffset,
    },
    LocalDateTime(NaiveDateTime),
    DateTime(DateTime<FixedOffset>),
    /// Signed ISO-8601 duration; `nanos` is always in `0..1_000_000_000`
    Duration {
        months: i64,
        days: i64,
        seconds: i64,
        nanos: i64,
    },
}

impl PropertyValue {
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            PropertyValue::Date(_)
                | PropertyValue::LocalTime(_)
                | PropertyValue::Time { .. }
                | PropertyValue::LocalDateTime(_)
                | PropertyValue::DateTime(_)
                | PropertyValue::Duration { .. }
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropertyValue::Null,
            serde_json::Value::Bool(b) => PropertyValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Integer(i),
                None => PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => PropertyValue::String(s),
            serde_json::Value::Array(items) => {
                PropertyValue::List(items.into_iter().map(PropertyValue::from).collect())
            }
            serde_json::Value::Object(map) => PropertyValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, PropertyValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(value: PropertyMap) -> Self {
        PropertyValue::Map(value)
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Null => serializer.serialize_unit(),
            PropertyValue::Bool(b) => serializer.serialize_bool(*b),
            PropertyValue::Integer(i) => serializer.serialize_i64(*i),
            PropertyValue::Float(f) => serializer.serialize_f64(*f),
            PropertyValue::String(s) => serializer.serialize_str(s),
            PropertyValue::List(items) => items.serialize(serializer),
            PropertyValue::Map(map) => map.serialize(serializer),
            temporal => {
                let iso = super::convert::to_iso8601(temporal).unwrap_or_default();
                serializer.serialize_str(&iso)
            }
        }
    }
}

// ============================================================================
// Graph entities
// ============================================================================

/// A node as returned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: i64,
    pub labels: Vec<String>,
    pub properties: PropertyMap,
}

impl GraphNode {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// A directed, typed relationship as returned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRelationship {
    pub id: i64,
    pub rel_type: String,
    pub start_node: i64,
    pub end_node: i64,
    pub properties: PropertyMap,
}

/// One row of the optional-match traversal behind a graph slice
#[derive(Debug, Clone)]
pub struct SliceRecord {
    pub node: GraphNode,
    pub relationship: Option<GraphRelationship>,
    pub neighbor: Option<GraphNode>,
}

/// One row of a user → entity → user round trip (goals, metrics)
#[derive(Debug, Clone)]
pub struct LinkedRecord {
    pub user: GraphNode,
    pub target: GraphNode,
    pub outgoing: GraphRelationship,
    pub back: GraphRelationship,
}

/// How a relationship endpoint is located
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef {
    /// Store-assigned internal ID
    Id(i64),
    /// Application-level `uiNodeId` property
    UiNodeId(String),
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRef::Id(id) => write!(f, "node {}", id),
            NodeRef::UiNodeId(key) => write!(f, "uiNodeId '{}'", key),
        }
    }
}

/// Property holding the application-level node key
pub const UI_NODE_ID_PROPERTY: &str = "uiNodeId";

/// Label of user nodes
pub const USER_LABEL: &str = "User";

/// Property identifying a user (their email address)
pub const USER_KEY_PROPERTY: &str = "value";

/// Relationship type pointing from an owned entity back to its user
pub const BELONGS_TO_USER: &str = "BELONGS_TO_USER";

/// A kind of entity hanging off a user node, e.g. `(:User)-[:HAS_GOAL]->(:Goal)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserLink {
    Goals,
    Metrics,
}

impl UserLink {
    pub fn target_label(&self) -> &'static str {
        match self {
            UserLink::Goals => "Goal",
            UserLink::Metrics => "Metric",
        }
    }

    pub fn forward_type(&self) -> &'static str {
        match self {
            UserLink::Goals => "HAS_GOAL",
            UserLink::Metrics => "HAS_METRIC",
        }
    }
}
