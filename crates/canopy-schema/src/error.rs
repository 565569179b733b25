//! Errors raised while composing a schema or applying phase windows.

use derive_more::{Display, Error};

use crate::Name;

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[display("field `{field}` of {owner} is declared by both {first} and {second}")]
    DuplicateField {
        owner: Name,
        field: Name,
        first: Name,
        second: Name,
    },

    #[display("{owner} composes unknown capability `{capability}`")]
    UnknownCapability { owner: Name, capability: Name },

    #[display("{owner} refers to unknown kind `{kind}`")]
    UnknownKind { owner: Name, kind: Name },

    #[display("field `{field}` of {owner} is constrained to unknown node type `{constraint}`")]
    UnknownFieldType {
        owner: Name,
        field: Name,
        constraint: Name,
    },

    #[display("field `{field}` of {owner} overrides nothing")]
    InvalidOverride { owner: Name, field: Name },

    #[display("inheritance cycle through {kind}")]
    InheritanceCycle { kind: Name },

    #[display("`{name}` is defined more than once")]
    DuplicateDefinition { name: Name },

    #[display("field `{field}` of {owner} cannot be transformed: {reason}")]
    InvalidTransformField {
        owner: Name,
        field: Name,
        reason: &'static str,
    },

    #[display("phase window targets unknown field `{field}` of `{target}`")]
    UnknownWindowTarget { target: String, field: String },

    #[display("invalid phase window configuration: {message}")]
    InvalidWindowConfig { message: String },
}
