//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `Neo4jClient`.

use async_trait::async_trait;

use super::client::Neo4jClient;
use super::error::Result;
use super::identifier::{Label, RelationshipType};
use super::models::*;
use super::traits::GraphStore;

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn create_node(&self, label: &Label, properties: &PropertyMap) -> Result<GraphNode> {
        self.create_node(label, properties).await
    }

    async fn get_node(&self, id: i64) -> Result<Option<GraphNode>> {
        self.get_node(id).await
    }

    async fn list_nodes(&self, label: &Label) -> Result<Vec<GraphNode>> {
        self.list_nodes(label).await
    }

    async fn create_relationship(
        &self,
        from: &NodeRef,
        to: &NodeRef,
        rel_type: &RelationshipType,
        properties: &PropertyMap,
    ) -> Result<Option<GraphRelationship>> {
        self.create_relationship(from, to, rel_type, properties)
            .await
    }

    async fn graph_slice(&self, limit: i64) -> Result<Vec<SliceRecord>> {
        self.graph_slice(limit).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<GraphNode>> {
        self.find_user_by_email(email).await
    }

    async fn linked_to_user(&self, email: &str, link: UserLink) -> Result<Vec<LinkedRecord>> {
        self.linked_to_user(email, link).await
    }

    async fn test_connection(&self) -> Result<String> {
        self.test_connection().await
    }

    async fn close(&self) {
        self.close().await
    }
}
