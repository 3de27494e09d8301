//! In-memory mock implementation of GraphStore for testing.
//!
//! Mirrors the semantics of the Cypher issued by `Neo4jClient` over
//! `tokio::sync::RwLock` collections, and counts every call so tests can
//! assert that rejected input never reached the store.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::error::{GraphError, Result};
use crate::neo4j::identifier::{Label, RelationshipType};
use crate::neo4j::models::*;
use crate::neo4j::traits::GraphStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory mock implementation of GraphStore for testing.
pub struct MockGraphStore {
    pub nodes: RwLock<BTreeMap<i64, GraphNode>>,
    pub relationships: RwLock<Vec<GraphRelationship>>,
    next_id: AtomicI64,
    queries: AtomicUsize,
    unavailable: AtomicBool,
}

impl Default for MockGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(BTreeMap::new()),
            relationships: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(0),
            queries: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    /// A store whose every call fails as if the server were down
    pub fn unreachable() -> Self {
        let store = Self::new();
        store.unavailable.store(true, Ordering::SeqCst);
        store
    }

    /// Number of store calls issued so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Insert a node directly, bypassing the call counter
    pub async fn seed_node(&self, labels: &[&str], properties: PropertyMap) -> GraphNode {
        let node = GraphNode {
            id: self.allocate_id(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties,
        };
        self.nodes.write().await.insert(node.id, node.clone());
        node
    }

    /// Insert a relationship directly, bypassing the call counter
    pub async fn seed_relationship(
        &self,
        start_node: i64,
        end_node: i64,
        rel_type: &str,
        properties: PropertyMap,
    ) -> GraphRelationship {
        let rel = GraphRelationship {
            id: self.allocate_id(),
            rel_type: rel_type.to_string(),
            start_node,
            end_node,
            properties,
        };
        self.relationships.write().await.push(rel.clone());
        rel
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn begin(&self) -> Result<()> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GraphError::StoreUnavailable(
                "connection refused (mock)".to_string(),
            ));
        }
        Ok(())
    }

    async fn resolve(&self, node: &NodeRef) -> Option<i64> {
        let nodes = self.nodes.read().await;
        match node {
            NodeRef::Id(id) => nodes.get(id).map(|n| n.id),
            NodeRef::UiNodeId(key) => nodes
                .values()
                .find(|n| {
                    n.properties.get(UI_NODE_ID_PROPERTY).and_then(|v| v.as_str())
                        == Some(key.as_str())
                })
                .map(|n| n.id),
        }
    }

    async fn user(&self, email: &str) -> Option<GraphNode> {
        self.nodes
            .read()
            .await
            .values()
            .find(|n| {
                n.has_label(USER_LABEL)
                    && n.properties.get(USER_KEY_PROPERTY).and_then(|v| v.as_str()) == Some(email)
            })
            .cloned()
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn create_node(&self, label: &Label, properties: &PropertyMap) -> Result<GraphNode> {
        self.begin()?;
        Ok(self
            .seed_node(&[label.as_str()], properties.clone())
            .await)
    }

    async fn get_node(&self, id: i64) -> Result<Option<GraphNode>> {
        self.begin()?;
        Ok(self.nodes.read().await.get(&id).cloned())
    }

    async fn list_nodes(&self, label: &Label) -> Result<Vec<GraphNode>> {
        self.begin()?;
        Ok(self
            .nodes
            .read()
            .await
            .values()
            .filter(|n| n.has_label(label.as_str()))
            .cloned()
            .collect())
    }

    async fn create_relationship(
        &self,
        from: &NodeRef,
        to: &NodeRef,
        rel_type: &RelationshipType,
        properties: &PropertyMap,
    ) -> Result<Option<GraphRelationship>> {
        self.begin()?;
        let (Some(start), Some(end)) = (self.resolve(from).await, self.resolve(to).await) else {
            return Ok(None);
        };
        Ok(Some(
            self.seed_relationship(start, end, rel_type.as_str(), properties.clone())
                .await,
        ))
    }

    async fn graph_slice(&self, limit: i64) -> Result<Vec<SliceRecord>> {
        self.begin()?;
        let nodes = self.nodes.read().await;
        let relationships = self.relationships.read().await;

        let mut records = Vec::new();
        for node in nodes.values() {
            let outgoing: Vec<&GraphRelationship> = relationships
                .iter()
                .filter(|r| r.start_node == node.id)
                .collect();
            if outgoing.is_empty() {
                records.push(SliceRecord {
                    node: node.clone(),
                    relationship: None,
                    neighbor: None,
                });
            }
            for rel in outgoing {
                records.push(SliceRecord {
                    node: node.clone(),
                    relationship: Some(rel.clone()),
                    neighbor: nodes.get(&rel.end_node).cloned(),
                });
            }
        }
        records.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(records)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<GraphNode>> {
        self.begin()?;
        Ok(self.user(email).await)
    }

    async fn linked_to_user(&self, email: &str, link: UserLink) -> Result<Vec<LinkedRecord>> {
        self.begin()?;
        let Some(user) = self.user(email).await else {
            return Ok(Vec::new());
        };
        let nodes = self.nodes.read().await;
        let relationships = self.relationships.read().await;

        let mut records = Vec::new();
        for outgoing in relationships
            .iter()
            .filter(|r| r.start_node == user.id && r.rel_type == link.forward_type())
        {
            let Some(target) = nodes
                .get(&outgoing.end_node)
                .filter(|n| n.has_label(link.target_label()))
            else {
                continue;
            };
            for back in relationships.iter().filter(|r| {
                r.start_node == target.id && r.end_node == user.id && r.rel_type == BELONGS_TO_USER
            }) {
                records.push(LinkedRecord {
                    user: user.clone(),
                    target: target.clone(),
                    outgoing: outgoing.clone(),
                    back: back.clone(),
                });
            }
        }
        Ok(records)
    }

    async fn test_connection(&self) -> Result<String> {
        self.begin()?;
        Ok("Connected!".to_string())
    }

    async fn close(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }
}
