//! Runtime field values stored in node slots.

use std::fmt;

use canopy_schema::Value;
use smallvec::SmallVec;

use crate::refs::{NodeRef, SymbolId};

pub type NodeList = SmallVec<[NodeRef; 4]>;

/// Content of one field slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// A lateinit field that has not been initialised yet.
    Uninit,
    Null,
    Node(NodeRef),
    Nodes(NodeList),
    Symbol(SymbolId),
    Value(Value),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_node(&self) -> Option<NodeRef> {
        match self {
            FieldValue::Node(node) => Some(*node),
            _ => None,
        }
    }

    pub fn as_nodes(&self) -> Option<&[NodeRef]> {
        match self {
            FieldValue::Nodes(nodes) => Some(nodes),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<SymbolId> {
        match self {
            FieldValue::Symbol(symbol) => Some(*symbol),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldValue::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Every node mentioned by this value, single or listed.
    pub fn node_refs(&self) -> &[NodeRef] {
        match self {
            FieldValue::Node(node) => std::slice::from_ref(node),
            FieldValue::Nodes(nodes) => nodes,
            _ => &[],
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Uninit => f.write_str("<uninit>"),
            FieldValue::Null => f.write_str("null"),
            FieldValue::Node(node) => write!(f, "{node}"),
            FieldValue::Nodes(nodes) => {
                f.write_str("[")?;
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{node}")?;
                }
                f.write_str("]")
            }
            FieldValue::Symbol(symbol) => write!(f, "{symbol}"),
            FieldValue::Value(value) => write!(f, "{value}"),
        }
    }
}

impl From<NodeRef> for FieldValue {
    fn from(node: NodeRef) -> Self {
        FieldValue::Node(node)
    }
}

impl From<Option<NodeRef>> for FieldValue {
    fn from(node: Option<NodeRef>) -> Self {
        node.map_or(FieldValue::Null, FieldValue::Node)
    }
}

impl From<Vec<NodeRef>> for FieldValue {
    fn from(nodes: Vec<NodeRef>) -> Self {
        FieldValue::Nodes(NodeList::from_vec(nodes))
    }
}

impl From<&[NodeRef]> for FieldValue {
    fn from(nodes: &[NodeRef]) -> Self {
        FieldValue::Nodes(NodeList::from_slice(nodes))
    }
}

impl From<NodeList> for FieldValue {
    fn from(nodes: NodeList) -> Self {
        FieldValue::Nodes(nodes)
    }
}

impl From<SymbolId> for FieldValue {
    fn from(symbol: SymbolId) -> Self {
        FieldValue::Symbol(symbol)
    }
}

impl From<Option<SymbolId>> for FieldValue {
    fn from(symbol: Option<SymbolId>) -> Self {
        symbol.map_or(FieldValue::Null, FieldValue::Symbol)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Value(value)
    }
}

impl From<Option<Value>> for FieldValue {
    fn from(value: Option<Value>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Value)
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        FieldValue::Value(Value::Bool(flag))
    }
}

impl From<i64> for FieldValue {
    fn from(int: i64) -> Self {
        FieldValue::Value(Value::Int(int))
    }
}
