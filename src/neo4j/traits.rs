//! GraphStore trait definition
//!
//! Abstract interface over the graph operations of `Neo4jClient`, so the
//! manager and the HTTP layer can run against an in-memory mock in tests.

use crate::neo4j::error::Result;
use crate::neo4j::identifier::{Label, RelationshipType};
use crate::neo4j::models::*;
use async_trait::async_trait;

/// Abstract interface for all graph database operations.
///
/// Labels and relationship types are taken as validated newtypes: an
/// implementation never sees an identifier that failed validation.
#[async_trait]
pub trait GraphStore: Send + Sync {
    // ========================================================================
    // Nodes
    // ========================================================================

    /// Create one node carrying `label` and `properties`
    async fn create_node(&self, label: &Label, properties: &PropertyMap) -> Result<GraphNode>;

    /// Get a node by internal ID
    async fn get_node(&self, id: i64) -> Result<Option<GraphNode>>;

    /// List every node carrying `label`
    async fn list_nodes(&self, label: &Label) -> Result<Vec<GraphNode>>;

    // ========================================================================
    // Relationships
    // ========================================================================

    /// Create a directed relationship; `None` when an endpoint did not match
    async fn create_relationship(
        &self,
        from: &NodeRef,
        to: &NodeRef,
        rel_type: &RelationshipType,
        properties: &PropertyMap,
    ) -> Result<Option<GraphRelationship>>;

    /// Up to `limit` rows of `(node, optional relationship, optional neighbor)`
    async fn graph_slice(&self, limit: i64) -> Result<Vec<SliceRecord>>;

    // ========================================================================
    // Users
    // ========================================================================

    /// Get the user node keyed by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<GraphNode>>;

    /// Entities linked to a user by `link` and back by `BELONGS_TO_USER`
    async fn linked_to_user(&self, email: &str, link: UserLink) -> Result<Vec<LinkedRecord>>;

    // ========================================================================
    // Connectivity
    // ========================================================================

    /// Round-trip a literal message through the store
    async fn test_connection(&self) -> Result<String>;

    /// Release the underlying connection; later calls fail with `StoreUnavailable`
    async fn close(&self);
}
