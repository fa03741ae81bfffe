//! JSON host values.
//!
//! Lets the encoder walk a plain `serde_json::Value`, the way a dynamic
//! host would hand over its argument tree:
//!
//! - a JSON array is a list;
//! - `{"tuple": [...]}` is a tuple;
//! - an object with a string `"var"` key is a leaf, flagged through the
//!   optional boolean keys `"requiresMarking"` and `"volatile"`;
//! - anything else is unsupported and reported by its JSON type name.

use crate::error::CodecError;
use crate::node::{LeafToken, Shape, StructureNode, Structured};
use serde_json::{Map, Value};
use std::borrow::Borrow;

pub const TUPLE_KEY: &str = "tuple";
pub const VAR_KEY: &str = "var";
pub const REQUIRES_MARKING_KEY: &str = "requiresMarking";
pub const VOLATILE_KEY: &str = "volatile";

/// A host leaf object.
pub type HostLeaf = Map<String, Value>;

impl LeafToken for HostLeaf {
    fn requires_marking(&self) -> bool {
        flag(self, REQUIRES_MARKING_KEY)
    }

    fn is_volatile(&self) -> bool {
        flag(self, VOLATILE_KEY)
    }
}

impl Structured for Value {
    type Leaf = HostLeaf;

    fn shape(&self) -> Shape<'_, Self, HostLeaf> {
        match self {
            Value::Array(items) => Shape::List(items),
            Value::Object(map) => {
                if map.len() == 1
                    && let Some(Value::Array(items)) = map.get(TUPLE_KEY)
                {
                    Shape::Tuple(items)
                } else if is_leaf(map) {
                    Shape::Leaf(map)
                } else {
                    Shape::Unsupported(type_name(self).to_string())
                }
            }
            other => Shape::Unsupported(type_name(other).to_string()),
        }
    }
}

/// JSON type name used in diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The `"var"` name of a host leaf.
pub fn leaf_var(leaf: &HostLeaf) -> Option<&str> {
    leaf.get(VAR_KEY).and_then(Value::as_str)
}

/// Read a JSON array of host leaf objects, as handed to the decoder.
pub fn host_leaves(value: &Value) -> Result<Vec<&HostLeaf>, CodecError> {
    let Value::Array(items) = value else {
        return Err(CodecError::UnsupportedStructure {
            type_name: type_name(value).to_string(),
            path: Vec::new(),
        });
    };
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(map) if is_leaf(map) => Ok(map),
            other => Err(CodecError::UnsupportedStructure {
                type_name: type_name(other).to_string(),
                path: vec![idx],
            }),
        })
        .collect()
}

/// Render a decoded tree back into host JSON.
pub fn to_host_json<L: Borrow<HostLeaf>>(node: &StructureNode<L>) -> Value {
    match node {
        StructureNode::Leaf(leaf) => Value::Object(leaf.borrow().clone()),
        StructureNode::Tuple(children) => {
            let mut map = Map::new();
            map.insert(
                TUPLE_KEY.to_string(),
                Value::Array(children.iter().map(to_host_json).collect()),
            );
            Value::Object(map)
        }
        StructureNode::List(children) => Value::Array(children.iter().map(to_host_json).collect()),
    }
}

fn is_leaf(map: &HostLeaf) -> bool {
    map.get(VAR_KEY).is_some_and(Value::is_string)
}

fn flag(map: &HostLeaf, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}
