//! Typed API over the IR schema.
//!
//! Generated with the macros in `macros`: the `NodeKind` hierarchy and
//! `Transformer` trait, one trait per capability and one wrapper per node
//! kind. Wrappers are thin `Copy` handles around a `NodeRef`; all state
//! stays in the `TreeContext`.

#[macro_use]
mod macros;
pub mod capabilities;
pub mod nodes;

pub use capabilities::*;
pub use nodes::*;

use crate::builder::NodeBuilder;
use crate::context::TreeContext;
use crate::error::{TreeError, TreeResult};
use crate::refs::NodeRef;

/// Trait for typed node wrappers.
pub trait TreeNode: Sized + Copy {
    /// Schema name of the wrapped kind.
    const KIND: &'static str;

    /// Wrap `node` without checking its kind.
    fn from_raw(node: NodeRef) -> Self;

    fn node(&self) -> NodeRef;

    /// Wrap `node` if it is of this kind or one of its subtypes.
    fn from_node(ctx: &TreeContext, node: NodeRef) -> TreeResult<Self> {
        if Self::matches(ctx, node) {
            Ok(Self::from_raw(node))
        } else {
            Err(TreeError::UnexpectedKind {
                node,
                expected: Self::KIND,
                found: ctx.kind(node),
            })
        }
    }

    fn matches(ctx: &TreeContext, node: NodeRef) -> bool {
        ctx.is_instance_of(node, Self::KIND)
    }

    fn builder() -> NodeBuilder {
        NodeBuilder::new(Self::KIND)
    }
}

/// Accessors emitted by the generators for one kind or capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiSurface {
    pub name: &'static str,
    pub capabilities: Vec<&'static str>,
    pub fields: Vec<FieldSurface>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSurface {
    pub name: &'static str,
    pub shape: &'static str,
    pub replace: bool,
}

node_kinds! {
    root Element;

    Statement: Element;
    Expression: Statement;
    Block: Expression;
    LiteralExpression: Expression;
    QualifiedAccessExpression: Expression;
    PropertyAccessExpression: QualifiedAccessExpression;
    FunctionCall: QualifiedAccessExpression;
    IntegerLiteralOperatorCall: FunctionCall;
    ThisReceiverExpression: QualifiedAccessExpression;
    BinaryLogicExpression: Expression;
    ReturnExpression: Expression;
    ThrowExpression: Expression;
    WhenExpression: Expression;
    WhenBranch: Element;
    TypeOperatorCall: Expression;
    VariableAssignment: Statement;
    ErrorExpression: Expression;
    TryExpression: Expression;
    Catch: Element;
    Annotation: Expression;
    AnnotationCall: Annotation;
    Loop: Statement;
    WhileLoop: Loop;
    DoWhileLoop: Loop;

    Declaration: Element;
    ClassLikeDeclaration: Declaration;
    Class: ClassLikeDeclaration;
    RegularClass: Class;
    AnonymousObject: Class;
    TypeAlias: ClassLikeDeclaration;
    CallableDeclaration: Declaration;
    Function: CallableDeclaration;
    SimpleFunction: Function;
    Constructor: Function;
    PropertyAccessor: Function;
    AnonymousFunction: Function;
    Variable: CallableDeclaration;
    Property: Variable;
    ValueParameter: Variable;
    TypeParameter: Declaration;
    File: Declaration;

    ArgumentList: Element;
    Reference: Element;
    NamedReference: Reference;
    SimpleNamedReference: NamedReference;
    ResolvedNamedReference: NamedReference;
    ErrorNamedReference: NamedReference;
    ThisReference: Reference;
    SuperReference: Reference;
    ControlFlowGraphReference: Reference;

    TypeRef: Element;
    UserTypeRef: TypeRef;
    ImplicitTypeRef: TypeRef;
    ResolvedTypeRef: TypeRef;
    ErrorTypeRef: ResolvedTypeRef;
    TypeProjection: Element;
    StarProjection: TypeProjection;
    TypeProjectionWithVariance: TypeProjection;

    DeclarationStatus: Element;
    ResolvedDeclarationStatus: DeclarationStatus;
    ReceiverParameter: Element;
    Label: Element;
    PackageDirective: Element;
    Import: Element;
    ResolvedImport: Import;
    ContractDescription: Element;
    RawContractDescription: ContractDescription;
    ResolvedContractDescription: ContractDescription;
}
