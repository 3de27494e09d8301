//! Parameterized Cypher construction
//!
//! Only validated [`Label`]s and [`RelationshipType`]s reach the query text;
//! every data value is bound as a parameter.

use super::identifier::{Label, RelationshipType};
use super::models::{
    NodeRef, PropertyMap, PropertyValue, UserLink, BELONGS_TO_USER, UI_NODE_ID_PROPERTY,
    USER_KEY_PROPERTY, USER_LABEL,
};
use std::collections::BTreeMap;

/// Query text plus its bound parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CypherQuery {
    text: String,
    params: BTreeMap<String, PropertyValue>,
}

impl CypherQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &BTreeMap<String, PropertyValue> {
        &self.params
    }
}

/// `CREATE` one node carrying `label` and `properties`, returned as `n`
pub fn create_node(label: &Label, properties: &PropertyMap) -> CypherQuery {
    CypherQuery::new(format!("CREATE (n:{} $props) RETURN n", label.quoted()))
        .param("props", properties.clone())
}

/// Match both endpoints, `CREATE` the edge and set its properties; returned as `r`
pub fn create_relationship(
    from: &NodeRef,
    to: &NodeRef,
    rel_type: &RelationshipType,
    properties: &PropertyMap,
) -> CypherQuery {
    let text = format!(
        r#"
        MATCH (a) WHERE {}
        MATCH (b) WHERE {}
        CREATE (a)-[r:{}]->(b)
        SET r = $props
        RETURN r
        "#,
        endpoint_predicate("a", "from_id", from),
        endpoint_predicate("b", "to_id", to),
        rel_type.quoted()
    );

    CypherQuery::new(text)
        .param("from_id", endpoint_value(from))
        .param("to_id", endpoint_value(to))
        .param("props", properties.clone())
}

fn endpoint_predicate(alias: &str, param: &str, node: &NodeRef) -> String {
    match node {
        NodeRef::Id(_) => format!("id({}) = ${}", alias, param),
        NodeRef::UiNodeId(_) => format!("{}.{} = ${}", alias, UI_NODE_ID_PROPERTY, param),
    }
}

fn endpoint_value(node: &NodeRef) -> PropertyValue {
    match node {
        NodeRef::Id(id) => PropertyValue::Integer(*id),
        NodeRef::UiNodeId(key) => PropertyValue::String(key.clone()),
    }
}

/// Single node by internal ID, returned as `n`
pub fn node_by_id(id: i64) -> CypherQuery {
    CypherQuery::new("MATCH (n) WHERE id(n) = $id RETURN n").param("id", id)
}

/// Up to `limit` `(n, r, m)` rows; `r` and `m` are null for nodes without outgoing edges
pub fn graph_slice(limit: i64) -> CypherQuery {
    CypherQuery::new(
        r#"
        MATCH (n)
        OPTIONAL MATCH (n)-[r]->(m)
        RETURN n, r, m
        LIMIT $limit
        "#,
    )
    .param("limit", limit)
}

/// Every node carrying `label`, returned as `n`
pub fn nodes_by_label(label: &Label) -> CypherQuery {
    CypherQuery::new(format!("MATCH (n:{}) RETURN n", label.quoted()))
}

/// The user node keyed by `email`, returned as `u`
pub fn user_by_email(email: &str) -> CypherQuery {
    CypherQuery::new(format!(
        "MATCH (u:`{}` {{{}: $email}}) RETURN u",
        USER_LABEL, USER_KEY_PROPERTY
    ))
    .param("email", email)
}

/// Entities linked to a user in both directions, returned as `u, g, r1, r2`
pub fn linked_to_user(email: &str, link: UserLink) -> CypherQuery {
    CypherQuery::new(format!(
        r#"
        MATCH (u:`{user}` {{{key}: $email}})-[r1:`{forward}`]->(g:`{target}`)
        MATCH (g)-[r2:`{back}`]->(u)
        RETURN u, g, r1, r2
        "#,
        user = USER_LABEL,
        key = USER_KEY_PROPERTY,
        forward = link.forward_type(),
        target = link.target_label(),
        back = BELONGS_TO_USER,
    ))
    .param("email", email)
}

/// Round trip used to probe connectivity, returned as `message`
pub fn connection_test() -> CypherQuery {
    CypherQuery::new("RETURN 'Connected!' AS message")
}
