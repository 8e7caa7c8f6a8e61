use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::documentation::DocumentationTag;

/// Documentation of one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDoc {
    pub package: String,
    pub module: String,
    pub name: String,
    pub file_name: String,
    pub description: String,
    pub tags: IndexMap<String, DocumentationTag>,
    #[serde(rename = "Args")]
    pub args: Vec<Property>,
    #[serde(rename = "Blocks")]
    pub blocks: Vec<Property>,
    #[serde(rename = "Element")]
    pub element: Option<ElementProperty>,
}

/// One Arg, Block, tuple slot or nested object field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub identifier: String,
    #[serde(rename = "type")]
    pub ty: PropertyType,
    pub is_required: bool,
    pub is_internal: bool,
    pub description: String,
    pub tags: IndexMap<String, DocumentationTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Documentation shape of a type.
///
/// `raw` is always the canonical text of the classified type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PropertyType {
    Function {
        raw: String,
    },
    /// Arrays and tuples. Only tuples carry `items`, one per slot.
    Array {
        raw: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<Vec<Property>>,
    },
    /// Union of literals, one rendered item per constituent.
    Enum {
        raw: String,
        items: Vec<String>,
    },
    Object {
        items: Vec<Property>,
    },
    Opaque {
        raw: String,
    },
}

impl PropertyType {
    /// Canonical text of the type, absent for structured objects.
    pub fn raw(&self) -> Option<&str> {
        match self {
            PropertyType::Function { raw }
            | PropertyType::Array { raw, .. }
            | PropertyType::Enum { raw, .. }
            | PropertyType::Opaque { raw } => Some(raw),
            PropertyType::Object { .. } => None,
        }
    }
}

/// The root element of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementProperty {
    pub identifier: String,
    #[serde(rename = "type")]
    pub ty: PropertyType,
    pub description: String,
    /// Link to the element's DOM interface documentation.
    pub url: String,
}
