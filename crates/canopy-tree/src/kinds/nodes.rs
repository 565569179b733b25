//! Typed wrappers, one per node kind.
//!
//! Field lists name every composed field no capability contributes,
//! inherited ones included. Fields a kind overrides from a capability stay
//! reachable through the capability trait.

use super::capabilities::*;

typed_nodes! {
    /// Root of the hierarchy.
    Element [] {}

    Statement [AnnotationContainer] {}

    Expression [AnnotationContainer, TypedExpression] {}

    Block [AnnotationContainer, TypedExpression] {
        statements: nodes,
    }

    LiteralExpression [AnnotationContainer, TypedExpression] {
        const_kind: value,
        value: optional_value,
    }

    QualifiedAccessExpression [
        AnnotationContainer,
        TypedExpression,
        Resolvable,
        QualifiedAccess,
        TypeArgumentsOwner,
    ] {}

    PropertyAccessExpression [
        AnnotationContainer,
        TypedExpression,
        Resolvable,
        QualifiedAccess,
        TypeArgumentsOwner,
    ] {}

    /// A call. The callee is narrowed to a named reference.
    FunctionCall [
        AnnotationContainer,
        TypedExpression,
        Resolvable,
        QualifiedAccess,
        TypeArgumentsOwner,
        Call,
    ] {
        origin: value,
    }

    /// An operator call on an integer literal; its dispatch receiver is an
    /// owned child.
    IntegerLiteralOperatorCall [
        AnnotationContainer,
        TypedExpression,
        Resolvable,
        QualifiedAccess,
        TypeArgumentsOwner,
        Call,
    ] {
        origin: value,
    }

    ThisReceiverExpression [
        AnnotationContainer,
        TypedExpression,
        Resolvable,
        QualifiedAccess,
        TypeArgumentsOwner,
    ] {
        is_implicit: flag,
    }

    BinaryLogicExpression [AnnotationContainer, TypedExpression] {
        #[replace] left_operand: node,
        #[replace] right_operand: node,
        operation_kind: value,
    }

    ReturnExpression [AnnotationContainer, TypedExpression] {
        #[replace] target: optional_node,
        #[replace] result: node,
    }

    ThrowExpression [AnnotationContainer, TypedExpression] {
        #[replace] exception: node,
    }

    WhenExpression [AnnotationContainer, TypedExpression, ControlFlowGraphOwner] {
        #[replace] subject: optional_node,
        branches: nodes,
        #[replace] exhaustiveness: value,
    }

    WhenBranch [] {
        #[replace] condition: node,
        #[replace] result: node,
    }

    TypeOperatorCall [AnnotationContainer, TypedExpression, Call] {
        operation: value,
        #[replace] conversion_type_ref: node,
    }

    VariableAssignment [AnnotationContainer] {
        #[replace] lvalue: node,
        #[replace] rvalue: node,
    }

    ErrorExpression [AnnotationContainer, TypedExpression, DiagnosticHolder] {
        expression: optional_node,
    }

    TryExpression [AnnotationContainer, TypedExpression, ControlFlowGraphOwner] {
        #[replace] try_block: node,
        catches: nodes,
        #[replace] finally_block: optional_node,
    }

    Catch [] {
        #[replace] parameter: node,
        #[replace] block: node,
    }

    Annotation [AnnotationContainer, TypedExpression] {
        use_site_target: optional_value,
        #[replace] annotation_type_ref: node,
    }

    AnnotationCall [AnnotationContainer, TypedExpression, Resolvable, Call] {
        use_site_target: optional_value,
        #[replace] annotation_type_ref: node,
        #[replace] annotation_resolve_phase: value,
    }

    Loop [AnnotationContainer, Labeled] {
        #[replace] block: node,
        #[replace] condition: node,
    }

    WhileLoop [AnnotationContainer, Labeled] {
        #[replace] block: node,
        #[replace] condition: node,
    }

    DoWhileLoop [AnnotationContainer, Labeled] {
        #[replace] block: node,
        #[replace] condition: node,
    }

    Declaration [AnnotationContainer, DeclaredSymbolOwner] {}

    ClassLikeDeclaration [AnnotationContainer, DeclaredSymbolOwner, TypeParametersOwner] {}

    Class [AnnotationContainer, DeclaredSymbolOwner, TypeParametersOwner] {
        class_kind: value,
        #[replace] super_type_refs: nodes,
        declarations: nodes,
    }

    RegularClass [
        AnnotationContainer,
        DeclaredSymbolOwner,
        TypeParametersOwner,
        MemberDeclaration,
        Named,
    ] {
        class_kind: value,
        #[replace] super_type_refs: nodes,
        declarations: nodes,
        #[replace] companion_object: optional_node,
    }

    AnonymousObject [
        AnnotationContainer,
        DeclaredSymbolOwner,
        TypeParametersOwner,
        ControlFlowGraphOwner,
    ] {
        class_kind: value,
        #[replace] super_type_refs: nodes,
        declarations: nodes,
    }

    TypeAlias [
        AnnotationContainer,
        DeclaredSymbolOwner,
        TypeParametersOwner,
        MemberDeclaration,
        Named,
    ] {
        #[replace] expanded_type_ref: node,
    }

    CallableDeclaration [
        AnnotationContainer,
        DeclaredSymbolOwner,
        MemberDeclaration,
        CallableSignature,
    ] {}

    Function [
        AnnotationContainer,
        DeclaredSymbolOwner,
        MemberDeclaration,
        CallableSignature,
        ControlFlowGraphOwner,
        TypeParametersOwner,
    ] {
        value_parameters: nodes,
        #[replace] body: optional_node,
    }

    SimpleFunction [
        AnnotationContainer,
        DeclaredSymbolOwner,
        MemberDeclaration,
        CallableSignature,
        ControlFlowGraphOwner,
        TypeParametersOwner,
        Named,
        ContractDescriptionOwner,
    ] {
        value_parameters: nodes,
        #[replace] body: optional_node,
    }

    Constructor [
        AnnotationContainer,
        DeclaredSymbolOwner,
        MemberDeclaration,
        CallableSignature,
        ControlFlowGraphOwner,
        TypeParametersOwner,
    ] {
        value_parameters: nodes,
        #[replace] body: optional_node,
        is_primary: flag,
    }

    PropertyAccessor [
        AnnotationContainer,
        DeclaredSymbolOwner,
        MemberDeclaration,
        CallableSignature,
        ControlFlowGraphOwner,
        TypeParametersOwner,
        ContractDescriptionOwner,
    ] {
        value_parameters: nodes,
        #[replace] body: optional_node,
        is_getter: flag,
    }

    AnonymousFunction [
        AnnotationContainer,
        DeclaredSymbolOwner,
        MemberDeclaration,
        CallableSignature,
        ControlFlowGraphOwner,
        TypeParametersOwner,
        Labeled,
    ] {
        value_parameters: nodes,
        #[replace] body: optional_node,
        is_lambda: flag,
    }

    Variable [
        AnnotationContainer,
        DeclaredSymbolOwner,
        MemberDeclaration,
        CallableSignature,
        Named,
    ] {
        #[replace] initializer: optional_node,
        is_var: flag,
    }

    Property [
        AnnotationContainer,
        DeclaredSymbolOwner,
        MemberDeclaration,
        CallableSignature,
        Named,
        ControlFlowGraphOwner,
        TypeParametersOwner,
    ] {
        #[replace] initializer: optional_node,
        is_var: flag,
        #[replace] getter: optional_node,
        #[replace] setter: optional_node,
        is_local: flag,
    }

    ValueParameter [
        AnnotationContainer,
        DeclaredSymbolOwner,
        MemberDeclaration,
        CallableSignature,
        Named,
    ] {
        #[replace] initializer: optional_node,
        is_var: flag,
        #[replace] default_value: optional_node,
        is_vararg: flag,
    }

    TypeParameter [AnnotationContainer, DeclaredSymbolOwner, Named] {
        variance: value,
        #[replace] bounds: nodes,
        is_reified: flag,
    }

    File [AnnotationContainer, DeclaredSymbolOwner, Named] {
        #[replace] package_directive: node,
        #[replace] imports: nodes,
        declarations: nodes,
    }

    ArgumentList [] {
        #[replace] arguments: nodes,
    }

    Reference [] {}

    NamedReference [Named] {}

    /// A reference by name, not resolved yet.
    SimpleNamedReference [Named] {}

    ResolvedNamedReference [Named, ResolvedSymbolHolder] {}

    ErrorNamedReference [Named, DiagnosticHolder] {}

    ThisReference [] {
        label_name: optional_value,
        #[replace] bound_symbol: optional_symbol,
    }

    SuperReference [] {
        #[replace] super_type_ref: node,
    }

    ControlFlowGraphReference [] {
        graph_id: lateinit_value,
    }

    TypeRef [AnnotationContainer] {}

    UserTypeRef [AnnotationContainer, TypeArgumentsOwner] {
        qualifier: value,
        is_marked_nullable: flag,
    }

    ImplicitTypeRef [AnnotationContainer] {}

    ResolvedTypeRef [AnnotationContainer, ResolvedSymbolHolder] {
        delegated_type_ref: optional_node,
        is_marked_nullable: flag,
    }

    ErrorTypeRef [AnnotationContainer, ResolvedSymbolHolder, DiagnosticHolder] {
        delegated_type_ref: optional_node,
        is_marked_nullable: flag,
    }

    TypeProjection [] {}

    StarProjection [] {}

    TypeProjectionWithVariance [] {
        #[replace] type_ref: node,
        variance: value,
    }

    DeclarationStatus [] {
        visibility: value,
        modality: optional_value,
        is_expect: flag,
        is_actual: flag,
    }

    ResolvedDeclarationStatus [] {
        visibility: value,
        modality: optional_value,
        is_expect: flag,
        is_actual: flag,
    }

    ReceiverParameter [AnnotationContainer] {
        #[replace] type_ref: node,
    }

    Label [Named] {}

    PackageDirective [] {
        package_name: value,
    }

    Import [] {
        imported_name: optional_value,
        alias_name: optional_value,
        is_all_under: flag,
    }

    ResolvedImport [] {
        imported_name: optional_value,
        alias_name: optional_value,
        is_all_under: flag,
        delegate: node,
        resolved_package: optional_value,
    }

    ContractDescription [] {}

    RawContractDescription [] {
        raw_effects: nodes,
    }

    ResolvedContractDescription [] {
        effects: nodes,
    }
}
