//! Output model: the density function tree handed to the serializer.

use crate::foundation::error::{DensityError, DensityResult};
use crate::registry::NAMESPACE;

/// A lowered value: a bare number, a string reference, or a function node.
#[derive(Debug, Clone, PartialEq)]
pub enum DensityValue {
    Number(f64),
    Str(String),
    Node(DensityNode),
}

/// A `{"type": "minecraft:<function>", ...fields}` object.
///
/// Fields are kept in parameter-declaration order so equivalent calls serialize
/// byte-for-byte identically regardless of how arguments were spelled.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityNode {
    function: &'static str,
    fields: Vec<(&'static str, DensityValue)>,
}

impl DensityNode {
    pub fn new(function: &'static str) -> Self {
        Self {
            function,
            fields: Vec::new(),
        }
    }

    pub fn with(mut self, field: &'static str, value: impl Into<DensityValue>) -> Self {
        self.fields.push((field, value.into()));
        self
    }

    /// `{type, argument}` node used by single-argument functions.
    pub fn unary(function: &'static str, argument: DensityValue) -> Self {
        Self::new(function).with("argument", argument)
    }

    /// `{type, argument1, argument2}` node used by `add`/`mul`/`min`/`max`.
    pub fn binary(
        function: &'static str,
        argument1: DensityValue,
        argument2: DensityValue,
    ) -> Self {
        Self::new(function)
            .with("argument1", argument1)
            .with("argument2", argument2)
    }

    /// Un-namespaced function name, e.g. `clamp`.
    pub fn function(&self) -> &'static str {
        self.function
    }

    /// Namespaced `type` value, e.g. `minecraft:clamp`.
    pub fn type_name(&self) -> String {
        format!("{NAMESPACE}:{}", self.function)
    }

    pub fn fields(&self) -> &[(&'static str, DensityValue)] {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&DensityValue> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, v)| v)
    }
}

impl DensityValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&DensityNode> {
        match self {
            Self::Node(n) => Some(n),
            _ => None,
        }
    }

    /// Number of function nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Number(_) | Self::Str(_) => 0,
            Self::Node(n) => 1 + n.fields.iter().map(|(_, v)| v.node_count()).sum::<usize>(),
        }
    }

    /// Nesting depth; a leaf is 0, a node without node children is 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Number(_) | Self::Str(_) => 0,
            Self::Node(n) => 1 + n.fields.iter().map(|(_, v)| v.depth()).max().unwrap_or(0),
        }
    }

    pub fn to_json_string(&self, pretty: bool) -> DensityResult<String> {
        let out = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        out.map_err(|e| DensityError::serde(e.to_string()))
    }
}

impl From<f64> for DensityValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for DensityValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for DensityValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<DensityNode> for DensityValue {
    fn from(v: DensityNode) -> Self {
        Self::Node(v)
    }
}

impl serde::Serialize for DensityValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Number(v) => serializer.serialize_f64(*v),
            Self::Str(s) => serializer.serialize_str(s),
            Self::Node(n) => serde::Serialize::serialize(n, serializer),
        }
    }
}

impl serde::Serialize for DensityNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut m = serializer.serialize_map(Some(self.fields.len() + 1))?;
        m.serialize_entry("type", &self.type_name())?;
        for (name, value) in &self.fields {
            m.serialize_entry(name, value)?;
        }
        m.end()
    }
}
