//! Result mapping: graph records → response shapes
//!
//! All properties pass through the property converter on the way out.

use crate::neo4j::convert::convert_properties;
use crate::neo4j::models::*;
use serde::Serialize;
use std::collections::HashSet;

// ============================================================================
// Views
// ============================================================================

/// `{id, labels, properties}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: i64,
    pub labels: Vec<String>,
    pub properties: PropertyMap,
}

/// `{id, properties}`, used by the user-centric endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
    pub id: i64,
    pub properties: PropertyMap,
}

/// A created relationship: `{id, type, start_node, end_node, properties}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipView {
    pub id: i64,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub start_node: i64,
    pub end_node: i64,
    pub properties: PropertyMap,
}

/// A graph-slice edge: `{id, type, source, target, properties}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceRelationship {
    pub id: i64,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub source: i64,
    pub target: i64,
    pub properties: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSlice {
    pub nodes: Vec<NodeView>,
    pub relationships: Vec<SliceRelationship>,
}

/// An edge with both endpoints inlined; the ID is rendered as a string
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkView {
    pub id: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub from_node: NodeSummary,
    pub to_node: NodeSummary,
}

/// Entities linked to a user plus both relationships of every link
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkedEntities {
    pub entities: Vec<NodeSummary>,
    pub relationships: Vec<LinkView>,
}

// ============================================================================
// Mapping
// ============================================================================

pub fn node_view(node: GraphNode) -> NodeView {
    NodeView {
        id: node.id,
        labels: node.labels,
        properties: convert_properties(node.properties),
    }
}

pub fn node_summary(node: GraphNode) -> NodeSummary {
    NodeSummary {
        id: node.id,
        properties: convert_properties(node.properties),
    }
}

pub fn relationship_view(rel: GraphRelationship) -> RelationshipView {
    RelationshipView {
        id: rel.id,
        rel_type: rel.rel_type,
        start_node: rel.start_node,
        end_node: rel.end_node,
        properties: convert_properties(rel.properties),
    }
}

fn slice_relationship(rel: GraphRelationship) -> SliceRelationship {
    SliceRelationship {
        id: rel.id,
        rel_type: rel.rel_type,
        source: rel.start_node,
        target: rel.end_node,
        properties: convert_properties(rel.properties),
    }
}

/// Flatten traversal rows into distinct nodes and the ordered list of edges.
///
/// Nodes keep the order in which they were first seen. A row without a
/// relationship still contributes its node.
pub fn graph_slice(records: Vec<SliceRecord>) -> GraphSlice {
    let mut seen = HashSet::new();
    let mut nodes = Vec::new();
    let mut relationships = Vec::new();

    for record in records {
        for node in std::iter::once(record.node).chain(record.neighbor) {
            if seen.insert(node.id) {
                nodes.push(node_view(node));
            }
        }
        if let Some(rel) = record.relationship {
            relationships.push(slice_relationship(rel));
        }
    }

    GraphSlice {
        nodes,
        relationships,
    }
}

/// One entity per row plus its forward and back links, endpoints inlined
pub fn linked_entities(records: Vec<LinkedRecord>) -> LinkedEntities {
    let mut linked = LinkedEntities::default();

    for record in records {
        let endpoints = [&record.user, &record.target];
        for rel in [&record.outgoing, &record.back] {
            let (Some(from), Some(to)) = (
                endpoints.iter().find(|n| n.id == rel.start_node),
                endpoints.iter().find(|n| n.id == rel.end_node),
            ) else {
                tracing::warn!("Relationship {} endpoints missing from record", rel.id);
                continue;
            };
            linked.relationships.push(LinkView {
                id: rel.id.to_string(),
                rel_type: rel.rel_type.clone(),
                from_node: node_summary((*from).clone()),
                to_node: node_summary((*to).clone()),
            });
        }
        linked.entities.push(node_summary(record.target));
    }

    linked
}
