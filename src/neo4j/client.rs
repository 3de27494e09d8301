//! Neo4j client: connection management and query execution

use super::bolt;
use super::cypher::{self, CypherQuery};
use super::error::{GraphError, Result};
use super::identifier::{Label, RelationshipType};
use super::models::*;
use neo4rs::{Graph, Row};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Client for Neo4j operations.
///
/// Owns the process-wide driver pool. Every operation borrows it through a
/// [`Session`] for its own duration only.
pub struct Neo4jClient {
    graph: RwLock<Option<Arc<Graph>>>,
    uri: String,
}

/// A scoped handle on the driver pool.
///
/// The pooled Bolt connection used by a query is returned when the result
/// stream is drained or dropped, so a `Session` going out of scope (normally
/// or through `?`) releases everything it acquired.
pub struct Session {
    graph: Arc<Graph>,
}

impl Session {
    /// Run `cypher` and collect every row
    pub async fn fetch_all(&self, cypher: CypherQuery, operation: &str) -> Result<Vec<Row>> {
        tracing::debug!(operation, query = cypher.text(), "Executing Cypher");
        let mut stream = self
            .graph
            .execute(bolt::to_query(&cypher))
            .await
            .map_err(|e| classify(operation, e))?;

        let mut rows = Vec::new();
        while let Some(row) = stream.next().await.map_err(|e| classify(operation, e))? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Run `cypher` and return its first row, if any
    pub async fn fetch_one(&self, cypher: CypherQuery, operation: &str) -> Result<Option<Row>> {
        Ok(self.fetch_all(cypher, operation).await?.into_iter().next())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        tracing::trace!("Session released");
    }
}

/// Connection-level failures become `StoreUnavailable`, the rest `Store`
fn classify(operation: &str, err: neo4rs::Error) -> GraphError {
    match err {
        neo4rs::Error::IOError { .. } | neo4rs::Error::ConnectionError => {
            tracing::warn!("Neo4j unreachable during {}: {}", operation, err);
            GraphError::StoreUnavailable(err.to_string())
        }
        other => {
            tracing::warn!("Neo4j error during {}: {}", operation, other);
            GraphError::store(operation, other)
        }
    }
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .map_err(|e| GraphError::StoreUnavailable(format!("Failed to connect to Neo4j: {}", e)))?;

        tracing::info!("Neo4j driver initialised for {}", uri);

        Ok(Self {
            graph: RwLock::new(Some(Arc::new(graph))),
            uri: uri.to_string(),
        })
    }

    /// Acquire a session; fails once the client has been closed
    pub async fn session(&self) -> Result<Session> {
        match self.graph.read().await.as_ref() {
            Some(graph) => Ok(Session {
                graph: Arc::clone(graph),
            }),
            None => Err(GraphError::StoreUnavailable(
                "Neo4j connection has been closed".to_string(),
            )),
        }
    }

    /// Release the driver pool. Later operations fail with `StoreUnavailable`.
    pub async fn close(&self) {
        if self.graph.write().await.take().is_some() {
            tracing::info!("Neo4j connection to {} closed", self.uri);
        }
    }

    // ========================================================================
    // Node operations
    // ========================================================================

    /// Create a node with one label
    pub async fn create_node(&self, label: &Label, properties: &PropertyMap) -> Result<GraphNode> {
        const OP: &str = "create_node";
        let session = self.session().await?;
        let row = session
            .fetch_one(cypher::create_node(label, properties), OP)
            .await?
            .ok_or_else(|| GraphError::store(OP, "CREATE returned no row"))?;
        bolt::node_column(&row, "n", OP)
    }

    /// Get a node by internal ID
    pub async fn get_node(&self, id: i64) -> Result<Option<GraphNode>> {
        const OP: &str = "get_node";
        let session = self.session().await?;
        match session.fetch_one(cypher::node_by_id(id), OP).await? {
            Some(row) => Ok(Some(bolt::node_column(&row, "n", OP)?)),
            None => Ok(None),
        }
    }

    /// List every node carrying `label`
    pub async fn list_nodes(&self, label: &Label) -> Result<Vec<GraphNode>> {
        const OP: &str = "list_nodes";
        let session = self.session().await?;
        session
            .fetch_all(cypher::nodes_by_label(label), OP)
            .await?
            .iter()
            .map(|row| bolt::node_column(row, "n", OP))
            .collect()
    }

    // ========================================================================
    // Relationship operations
    // ========================================================================

    /// Create a relationship; `None` when an endpoint did not match
    pub async fn create_relationship(
        &self,
        from: &NodeRef,
        to: &NodeRef,
        rel_type: &RelationshipType,
        properties: &PropertyMap,
    ) -> Result<Option<GraphRelationship>> {
        const OP: &str = "create_relationship";
        let session = self.session().await?;
        let q = cypher::create_relationship(from, to, rel_type, properties);
        match session.fetch_one(q, OP).await? {
            Some(row) => Ok(Some(bolt::relationship_column(&row, "r", OP)?)),
            None => Ok(None),
        }
    }

    /// Raw rows of the graph-slice traversal
    pub async fn graph_slice(&self, limit: i64) -> Result<Vec<SliceRecord>> {
        const OP: &str = "graph_slice";
        let session = self.session().await?;
        let rows = session.fetch_all(cypher::graph_slice(limit), OP).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(SliceRecord {
                node: bolt::node_column(row, "n", OP)?,
                relationship: bolt::optional_relationship_column(row, "r", OP)?,
                neighbor: bolt::optional_node_column(row, "m", OP)?,
            });
        }
        Ok(records)
    }

    // ========================================================================
    // User operations
    // ========================================================================

    /// Get the user node keyed by email
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<GraphNode>> {
        const OP: &str = "find_user_by_email";
        let session = self.session().await?;
        match session.fetch_one(cypher::user_by_email(email), OP).await? {
            Some(row) => Ok(Some(bolt::node_column(&row, "u", OP)?)),
            None => Ok(None),
        }
    }

    /// Goals or metrics linked to a user in both directions
    pub async fn linked_to_user(&self, email: &str, link: UserLink) -> Result<Vec<LinkedRecord>> {
        const OP: &str = "linked_to_user";
        let session = self.session().await?;
        let rows = session
            .fetch_all(cypher::linked_to_user(email, link), OP)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(LinkedRecord {
                user: bolt::node_column(row, "u", OP)?,
                target: bolt::node_column(row, "g", OP)?,
                outgoing: bolt::relationship_column(row, "r1", OP)?,
                back: bolt::relationship_column(row, "r2", OP)?,
            });
        }
        Ok(records)
    }

    // ========================================================================
    // Connectivity
    // ========================================================================

    /// Round-trip a literal through the store
    pub async fn test_connection(&self) -> Result<String> {
        const OP: &str = "test_connection";
        let session = self.session().await?;
        let row = session
            .fetch_one(cypher::connection_test(), OP)
            .await?
            .ok_or_else(|| GraphError::store(OP, "no row returned"))?;
        row.get::<String>("message")
            .map_err(|e| GraphError::store(OP, e))
    }
}
