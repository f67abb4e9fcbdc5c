//! Decoded documents.
//!
//! The compiled statement returns the document as JSON text; these types let
//! callers deserialize it into something typed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `{data, included?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub data: Vec<ResourceObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,
}

impl Document {
    /// Find an included resource by type and id.
    pub fn find_included(&self, type_name: &str, id: &Value) -> Option<&ResourceObject> {
        self.included
            .as_deref()?
            .iter()
            .find(|r| r.type_name == type_name && &r.id == id)
    }
}

/// `{id, type, attributes?, relationships?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    pub id: Value,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<BTreeMap<String, RelationshipObject>>,
}

impl ResourceObject {
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier {
            id: self.id.clone(),
            type_name: self.type_name.clone(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.as_ref()?.get(name)
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipData> {
        self.relationships.as_ref()?.get(name).map(|r| &r.data)
    }
}

/// `{id, type}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    pub id: Value,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// `{data}` under a relationship name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipObject {
    pub data: RelationshipData,
}

/// A list for to-many relationships, an identifier or null for to-one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    Many(Vec<ResourceIdentifier>),
    One(Option<ResourceIdentifier>),
}

impl RelationshipData {
    pub fn identifiers(&self) -> Vec<&ResourceIdentifier> {
        match self {
            RelationshipData::Many(ids) => ids.iter().collect(),
            RelationshipData::One(id) => id.iter().collect(),
        }
    }
}
