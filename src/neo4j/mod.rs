//! Neo4j client, query construction and graph models

mod bolt;
pub mod client;
pub mod convert;
pub mod cypher;
pub mod error;
pub mod identifier;
mod impl_graph_store;
pub mod models;
pub mod traits;

pub use client::{Neo4jClient, Session};
pub use error::GraphError;
pub use identifier::{Label, RelationshipType};
pub use models::*;
pub use traits::GraphStore;

#[cfg(test)]
pub(crate) mod mock;
