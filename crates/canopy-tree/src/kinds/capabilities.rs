//! Capability traits. A wrapper implements the trait of every capability
//! its kind composes, inherited ones included.

capabilities! {
    AnnotationContainer {
        #[replace] annotations: nodes,
    }

    TypedExpression {
        #[replace] type_ref: node,
    }

    /// Expressions whose meaning depends on a resolved callee.
    Resolvable {
        #[replace] callee_reference: node,
    }

    ControlFlowGraphOwner {
        #[replace] control_flow_graph_reference: optional_node,
    }

    DiagnosticHolder {
        diagnostic_message: value,
    }

    TypeParametersOwner {
        type_parameters: nodes,
    }

    TypeArgumentsOwner {
        #[replace] type_arguments: nodes,
    }

    DeclaredSymbolOwner {
        symbol: symbol,
        origin: value,
    }

    MemberDeclaration {
        #[replace] status: node,
    }

    CallableSignature {
        #[replace] return_type_ref: node,
        #[replace] receiver_parameter: optional_node,
    }

    ContractDescriptionOwner {
        #[replace] contract_description: optional_node,
    }

    Call {
        #[replace] argument_list: node,
    }

    /// Receivers of a member access. Only the explicit receiver is owned;
    /// dispatch and extension receivers point elsewhere in the tree.
    QualifiedAccess {
        #[replace] explicit_receiver: optional_node,
        #[replace] dispatch_receiver: optional_node,
        #[replace] extension_receiver: optional_node,
    }

    Named {
        name: value,
    }

    Labeled {
        label: optional_node,
    }

    ResolvedSymbolHolder {
        resolved_symbol: symbol,
    }
}
