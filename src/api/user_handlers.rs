//! User lookup and user-linked goal/metric handlers

use crate::graph::{LinkView, NodeSummary};
use crate::neo4j::UserLink;
use crate::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde::Serialize;

use super::handlers::AppError;

#[derive(Serialize)]
pub struct GoalsResponse {
    pub goals: Vec<NodeSummary>,
    pub relationships: Vec<LinkView>,
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub metrics: Vec<NodeSummary>,
    pub relationships: Vec<LinkView>,
}

/// GET /neo4j/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<NodeSummary>>, AppError> {
    Ok(Json(state.graph.list_users().await?))
}

/// GET /api/users/{email}
pub async fn get_user(
    State(state): State<AppState>,
    email: Result<Path<String>, PathRejection>,
) -> Result<Json<NodeSummary>, AppError> {
    let Path(email) = email?;
    Ok(Json(state.graph.get_user(&email).await?))
}

/// GET /api/smart-goals/{email}
pub async fn get_smart_goals(
    State(state): State<AppState>,
    email: Result<Path<String>, PathRejection>,
) -> Result<Json<GoalsResponse>, AppError> {
    let Path(email) = email?;
    let linked = state.graph.user_links(&email, UserLink::Goals).await?;
    Ok(Json(GoalsResponse {
        goals: linked.entities,
        relationships: linked.relationships,
    }))
}

/// GET /api/metrics/{email}
pub async fn get_metrics(
    State(state): State<AppState>,
    email: Result<Path<String>, PathRejection>,
) -> Result<Json<MetricsResponse>, AppError> {
    let Path(email) = email?;
    let linked = state.graph.user_links(&email, UserLink::Metrics).await?;
    Ok(Json(MetricsResponse {
        metrics: linked.entities,
        relationships: linked.relationships,
    }))
}
