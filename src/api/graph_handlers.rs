//! Node, relationship and graph-slice handlers

use crate::graph::{GraphSlice, NodeView, RelationshipView};
use crate::neo4j::{NodeRef, PropertyMap};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use super::handlers::AppError;
use super::query::GraphParams;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateNodeRequest {
    pub label: String,
    pub properties: PropertyMap,
}

/// Relationship creation body. `K` is `i64` when endpoints are addressed by
/// internal ID and `String` when addressed by `uiNodeId`.
#[derive(Debug, Deserialize)]
pub struct CreateRelationshipRequest<K> {
    pub from_id: K,
    pub to_id: K,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default)]
    pub properties: Option<PropertyMap>,
}

#[derive(Serialize)]
pub struct NodeResponse {
    pub node: NodeView,
}

#[derive(Serialize)]
pub struct RelationshipResponse {
    pub message: &'static str,
    pub relationship: RelationshipView,
}

#[derive(Serialize)]
pub struct ConnectionResponse {
    pub status: &'static str,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/nodes, /neo4j/nodes
pub async fn create_node(
    State(state): State<AppState>,
    payload: Result<Json<CreateNodeRequest>, JsonRejection>,
) -> Result<Json<NodeResponse>, AppError> {
    let Json(req) = payload?;
    let node = state.graph.create_node(&req.label, req.properties).await?;
    Ok(Json(NodeResponse { node }))
}

/// GET /api/nodes/{id}, /neo4j/nodes/{id}
pub async fn get_node(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<NodeResponse>, AppError> {
    let Path(id) = id?;
    let node = state.graph.get_node(id).await?;
    Ok(Json(NodeResponse { node }))
}

/// POST /neo4j/relationships — endpoints matched by internal ID
pub async fn create_relationship_by_id(
    State(state): State<AppState>,
    payload: Result<Json<CreateRelationshipRequest<i64>>, JsonRejection>,
) -> Result<Json<RelationshipResponse>, AppError> {
    let Json(req) = payload?;
    create_relationship(
        &state,
        NodeRef::Id(req.from_id),
        NodeRef::Id(req.to_id),
        &req.rel_type,
        req.properties,
    )
    .await
}

/// POST /api/relationships — endpoints matched by `uiNodeId`
pub async fn create_relationship_by_ui_id(
    State(state): State<AppState>,
    payload: Result<Json<CreateRelationshipRequest<String>>, JsonRejection>,
) -> Result<Json<RelationshipResponse>, AppError> {
    let Json(req) = payload?;
    create_relationship(
        &state,
        NodeRef::UiNodeId(req.from_id),
        NodeRef::UiNodeId(req.to_id),
        &req.rel_type,
        req.properties,
    )
    .await
}

async fn create_relationship(
    state: &AppState,
    from: NodeRef,
    to: NodeRef,
    rel_type: &str,
    properties: Option<PropertyMap>,
) -> Result<Json<RelationshipResponse>, AppError> {
    let relationship = state
        .graph
        .create_relationship(from, to, rel_type, properties.unwrap_or_default())
        .await?;
    Ok(Json(RelationshipResponse {
        message: "Relationship created successfully",
        relationship,
    }))
}

/// GET /neo4j/graph?limit=N
pub async fn get_graph(
    State(state): State<AppState>,
    params: Result<Query<GraphParams>, QueryRejection>,
) -> Result<Json<GraphSlice>, AppError> {
    let Query(params) = params?;
    let limit = params.validate().map_err(AppError::BadRequest)?;
    Ok(Json(state.graph.graph_slice(limit).await?))
}

/// GET /neo4j/test-connection
pub async fn test_connection(
    State(state): State<AppState>,
) -> Result<Json<ConnectionResponse>, AppError> {
    match state.graph.test_connection().await {
        Ok(message) => Ok(Json(ConnectionResponse {
            status: "success",
            message,
        })),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "Neo4j connection failed: {}",
            e
        ))),
    }
}
