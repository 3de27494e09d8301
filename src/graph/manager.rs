//! Graph operations exposed to the HTTP layer

use super::mapper::{self, GraphSlice, LinkedEntities, NodeSummary, NodeView, RelationshipView};
use crate::neo4j::error::{GraphError, Result};
use crate::neo4j::{GraphStore, Label, NodeRef, PropertyMap, RelationshipType, UserLink, USER_LABEL};
use std::sync::Arc;

/// Default number of traversal rows in a graph slice
pub const DEFAULT_SLICE_LIMIT: i64 = 100;

/// Manager for graph operations
pub struct GraphManager {
    store: Arc<dyn GraphStore>,
}

impl GraphManager {
    /// Create a new graph manager
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Create a node. The label is validated before anything reaches the store.
    pub async fn create_node(&self, label: &str, properties: PropertyMap) -> Result<NodeView> {
        let label = Label::parse(label)?;
        let node = self.store.create_node(&label, &properties).await?;
        tracing::info!("Created node {} with label {}", node.id, label);
        Ok(mapper::node_view(node))
    }

    /// Get a node by internal ID
    pub async fn get_node(&self, id: i64) -> Result<NodeView> {
        self.store
            .get_node(id)
            .await?
            .map(mapper::node_view)
            .ok_or_else(|| GraphError::NotFound(format!("Node with ID {} not found", id)))
    }

    // ========================================================================
    // Relationships
    // ========================================================================

    /// Create a relationship between two existing nodes
    pub async fn create_relationship(
        &self,
        from: NodeRef,
        to: NodeRef,
        rel_type: &str,
        properties: PropertyMap,
    ) -> Result<RelationshipView> {
        let rel_type = RelationshipType::parse(rel_type)?;
        let rel = self
            .store
            .create_relationship(&from, &to, &rel_type, &properties)
            .await?
            .ok_or_else(|| GraphError::RelationshipNotCreated {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        tracing::info!(
            "Created relationship {} ({})-[:{}]->({})",
            rel.id,
            rel.start_node,
            rel.rel_type,
            rel.end_node
        );
        Ok(mapper::relationship_view(rel))
    }

    /// Deduplicated nodes and ordered relationships from up to `limit` traversal rows
    pub async fn graph_slice(&self, limit: i64) -> Result<GraphSlice> {
        let records = self.store.graph_slice(limit).await?;
        Ok(mapper::graph_slice(records))
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn list_users(&self) -> Result<Vec<NodeSummary>> {
        let label = Label::parse(USER_LABEL)?;
        let users = self.store.list_nodes(&label).await?;
        Ok(users.into_iter().map(mapper::node_summary).collect())
    }

    pub async fn get_user(&self, email: &str) -> Result<NodeSummary> {
        self.store
            .find_user_by_email(email)
            .await?
            .map(mapper::node_summary)
            .ok_or_else(|| GraphError::NotFound("User not found".to_string()))
    }

    /// Goals or metrics of a user, with both link directions
    pub async fn user_links(&self, email: &str, link: UserLink) -> Result<LinkedEntities> {
        let records = self.store.linked_to_user(email, link).await?;
        Ok(mapper::linked_entities(records))
    }

    // ========================================================================
    // Connectivity
    // ========================================================================

    pub async fn test_connection(&self) -> Result<String> {
        self.store.test_connection().await
    }

    pub async fn close(&self) {
        self.store.close().await
    }
}
