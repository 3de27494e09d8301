//! Translation between `neo4rs` Bolt values and graph models

use super::cypher::CypherQuery;
use super::error::{GraphError, Result};
use super::models::{GraphNode, GraphRelationship, PropertyMap, PropertyValue};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType, Query, Row};

/// Build a driver query, binding every parameter
pub(crate) fn to_query(cypher: &CypherQuery) -> Query {
    cypher
        .params()
        .iter()
        .fold(neo4rs::query(cypher.text()), |q, (key, value)| {
            q.param(key, to_bolt(value))
        })
}

/// Values are converted before binding so temporals are stored as ISO strings
pub(crate) fn to_bolt(value: &PropertyValue) -> BoltType {
    match super::convert::convert_value(value.clone()) {
        PropertyValue::Null => BoltType::Null(BoltNull),
        PropertyValue::Bool(b) => BoltType::from(b),
        PropertyValue::Integer(i) => BoltType::from(i),
        PropertyValue::Float(f) => BoltType::from(f),
        PropertyValue::String(s) => BoltType::from(s),
        PropertyValue::List(items) => {
            let mut list = BoltList::new();
            for item in &items {
                list.push(to_bolt(item));
            }
            BoltType::List(list)
        }
        PropertyValue::Map(map) => {
            let mut bolt = BoltMap::new();
            for (key, item) in &map {
                bolt.put(BoltString::new(key), to_bolt(item));
            }
            BoltType::Map(bolt)
        }
        // convert_value leaves no temporal behind
        _ => BoltType::Null(BoltNull),
    }
}

/// Decode a store value into a property value
pub(crate) fn from_bolt(value: BoltType) -> PropertyValue {
    match value {
        BoltType::Null(_) => PropertyValue::Null,
        BoltType::Boolean(b) => PropertyValue::Bool(b.value),
        BoltType::Integer(i) => PropertyValue::Integer(i.value),
        BoltType::Float(f) => PropertyValue::Float(f.value),
        BoltType::String(s) => PropertyValue::String(s.value),
        BoltType::List(list) => {
            PropertyValue::List(list.value.into_iter().map(from_bolt).collect())
        }
        BoltType::Map(map) => PropertyValue::Map(
            map.value
                .into_iter()
                .map(|(k, v)| (k.value, from_bolt(v)))
                .collect(),
        ),
        temporal @ BoltType::Date(_) => {
            temporal_or_null(NaiveDate::try_from(temporal).map(PropertyValue::Date))
        }
        BoltType::LocalTime(time) => PropertyValue::LocalTime(NaiveTime::from(time)),
        BoltType::Time(time) => {
            let (time, offset): (NaiveTime, FixedOffset) = time.into();
            PropertyValue::Time { time, offset }
        }
        temporal @ BoltType::LocalDateTime(_) => temporal_or_null(
            NaiveDateTime::try_from(temporal).map(PropertyValue::LocalDateTime),
        ),
        temporal @ BoltType::DateTime(_) => temporal_or_null(
            DateTime::<FixedOffset>::try_from(temporal).map(PropertyValue::DateTime),
        ),
        // Rendered with the offset in effect at that instant; the zone name is dropped
        BoltType::DateTimeZoneId(zoned) => temporal_or_null(
            DateTime::<FixedOffset>::try_from(&zoned).map(PropertyValue::DateTime),
        ),
        // Only readable through the owning node or relationship, see `entity_property`
        BoltType::Duration(_) => {
            tracing::warn!("Nested duration property dropped");
            PropertyValue::Null
        }
        BoltType::Bytes(bytes) => PropertyValue::List(
            bytes
                .value
                .iter()
                .map(|b| PropertyValue::Integer(i64::from(*b)))
                .collect(),
        ),
        BoltType::Point2D(point) => point_map(
            point.sr_id.value,
            &[("x", point.x.value), ("y", point.y.value)],
        ),
        BoltType::Point3D(point) => point_map(
            point.sr_id.value,
            &[
                ("x", point.x.value),
                ("y", point.y.value),
                ("z", point.z.value),
            ],
        ),
        other => {
            tracing::debug!("Unsupported property type dropped: {:?}", other);
            PropertyValue::Null
        }
    }
}

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Decode a node or relationship property.
///
/// The driver only exposes a duration as `(seconds, nanos)` through serde,
/// with months and days already folded into the seconds.
fn entity_property<E: std::fmt::Display>(
    value: BoltType,
    duration_seconds: impl FnOnce() -> std::result::Result<(i64, i64), E>,
) -> PropertyValue {
    match value {
        BoltType::Duration(_) => match duration_seconds() {
            Ok((seconds, nanos)) => PropertyValue::Duration {
                months: 0,
                days: 0,
                seconds: seconds + nanos.div_euclid(NANOS_PER_SEC),
                nanos: nanos.rem_euclid(NANOS_PER_SEC),
            },
            Err(e) => {
                tracing::warn!("Failed to decode duration property: {}", e);
                PropertyValue::Null
            }
        },
        other => from_bolt(other),
    }
}

/// Points become `{srid, x, y[, z]}`
fn point_map(srid: i64, coordinates: &[(&str, f64)]) -> PropertyValue {
    let mut map = PropertyMap::new();
    map.insert("srid".to_string(), PropertyValue::Integer(srid));
    for (axis, value) in coordinates {
        map.insert(axis.to_string(), PropertyValue::Float(*value));
    }
    PropertyValue::Map(map)
}

fn temporal_or_null(decoded: std::result::Result<PropertyValue, neo4rs::Error>) -> PropertyValue {
    decoded.unwrap_or_else(|e| {
        tracing::warn!("Failed to decode temporal property: {}", e);
        PropertyValue::Null
    })
}

pub(crate) fn node_from(node: &neo4rs::Node) -> GraphNode {
    let mut properties = PropertyMap::new();
    for key in node.keys() {
        let key = key.to_string();
        match node.get::<BoltType>(&key) {
            Ok(value) => {
                let value = entity_property(value, || node.get::<(i64, i64)>(&key));
                properties.insert(key, value);
            }
            Err(e) => tracing::warn!("Skipping node property {}: {}", key, e),
        }
    }

    let mut labels: Vec<String> = Vec::new();
    for label in node.labels() {
        let label = label.to_string();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    GraphNode {
        id: node.id(),
        labels,
        properties,
    }
}

pub(crate) fn relationship_from(rel: &neo4rs::Relation) -> GraphRelationship {
    let mut properties = PropertyMap::new();
    for key in rel.keys() {
        let key = key.to_string();
        match rel.get::<BoltType>(&key) {
            Ok(value) => {
                let value = entity_property(value, || rel.get::<(i64, i64)>(&key));
                properties.insert(key, value);
            }
            Err(e) => tracing::warn!("Skipping relationship property {}: {}", key, e),
        }
    }

    GraphRelationship {
        id: rel.id(),
        rel_type: rel.typ().to_string(),
        start_node: rel.start_node_id(),
        end_node: rel.end_node_id(),
        properties,
    }
}

pub(crate) fn node_column(row: &Row, column: &str, operation: &str) -> Result<GraphNode> {
    let node: neo4rs::Node = row
        .get(column)
        .map_err(|e| GraphError::store(operation, e))?;
    Ok(node_from(&node))
}

pub(crate) fn optional_node_column(
    row: &Row,
    column: &str,
    operation: &str,
) -> Result<Option<GraphNode>> {
    let node: Option<neo4rs::Node> = row
        .get(column)
        .map_err(|e| GraphError::store(operation, e))?;
    Ok(node.as_ref().map(node_from))
}

pub(crate) fn relationship_column(
    row: &Row,
    column: &str,
    operation: &str,
) -> Result<GraphRelationship> {
    let rel: neo4rs::Relation = row
        .get(column)
        .map_err(|e| GraphError::store(operation, e))?;
    Ok(relationship_from(&rel))
}

pub(crate) fn optional_relationship_column(
    row: &Row,
    column: &str,
    operation: &str,
) -> Result<Option<GraphRelationship>> {
    let rel: Option<neo4rs::Relation> = row
        .get(column)
        .map_err(|e| GraphError::store(operation, e))?;
    Ok(rel.as_ref().map(relationship_from))
}
