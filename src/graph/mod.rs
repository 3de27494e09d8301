//! Graph façade: request-level operations over the graph store.
//!
//! ```text
//! handler ──► GraphManager ──► Label / RelationshipType validation
//!                  │
//!                  ▼
//!            GraphStore (Neo4jClient: cypher builder + scoped Session)
//!                  │  raw records
//!                  ▼
//!               mapper ──► NodeView / GraphSlice / LinkedEntities
//! ```

pub mod manager;
pub mod mapper;

pub use manager::{GraphManager, DEFAULT_SLICE_LIMIT};
pub use mapper::{
    GraphSlice, LinkView, LinkedEntities, NodeSummary, NodeView, RelationshipView,
    SliceRelationship,
};
