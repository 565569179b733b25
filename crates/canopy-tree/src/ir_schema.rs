//! The built-in IR schema: capabilities, node kinds and enumerations of the
//! resolution tree.
//!
//! The typed API in `kinds` mirrors this schema; `kinds::tests` checks that
//! the two agree.

use std::sync::{Arc, LazyLock};

use canopy_schema::PrimitiveType::{Bool, Int, Name as NameType};
use canopy_schema::ResolvePhase::{
    BodyResolve, Contracts, ImplicitTypesBodyResolve, Status, SuperTypes, Types,
};
use canopy_schema::{
    CapabilityDef, FieldDef, KindDef, PrimitiveType, Schema, SchemaBuilder, SchemaResult, Value,
};

static IR_SCHEMA: LazyLock<Arc<Schema>> = LazyLock::new(|| match build_ir_schema() {
    Ok(schema) => Arc::new(schema),
    Err(err) => panic!("built-in IR schema is inconsistent: {err}"),
});

/// Shared, composed IR schema.
pub fn ir_schema() -> Arc<Schema> {
    Arc::clone(&IR_SCHEMA)
}

fn enum_type(name: &'static str) -> PrimitiveType {
    PrimitiveType::Enum(canopy_schema::Name::new(name))
}

fn flag(name: &'static str) -> FieldDef {
    FieldDef::value(name, Bool).default_value(Value::Bool(false))
}

/// Compose the IR schema from scratch.
pub fn build_ir_schema() -> SchemaResult<Schema> {
    let mut builder = SchemaBuilder::new();
    enumerations(&mut builder);
    capabilities(&mut builder);
    expressions(&mut builder);
    declarations(&mut builder);
    references(&mut builder);
    types(&mut builder);
    miscellaneous(&mut builder);
    builder.build()
}

fn enumerations(builder: &mut SchemaBuilder) {
    builder
        .enumeration(
            "ConstKind",
            &[
                "Null",
                "Boolean",
                "Char",
                "Int",
                "Long",
                "String",
                "Float",
                "Double",
                "IntegerLiteral",
            ],
        )
        .enumeration("FunctionCallOrigin", &["Regular", "Infix", "Operator"])
        .enumeration("LogicOperationKind", &["And", "Or"])
        .enumeration(
            "Operation",
            &[
                "Equals",
                "NotEquals",
                "Identity",
                "NotIdentity",
                "Lt",
                "Gt",
                "LtEq",
                "GtEq",
                "Assign",
                "PlusAssign",
                "MinusAssign",
                "Is",
                "NotIs",
                "As",
                "SafeAs",
            ],
        )
        .enumeration("Exhaustiveness", &["NotComputed", "Exhaustive", "NonExhaustive"])
        .enumeration(
            "ClassKind",
            &[
                "Class",
                "Interface",
                "EnumClass",
                "EnumEntry",
                "AnnotationClass",
                "Object",
            ],
        )
        .enumeration("Variance", &["Invariant", "In", "Out"])
        .enumeration(
            "Visibility",
            &["Public", "Protected", "Internal", "Private", "Local", "Unknown"],
        )
        .enumeration("Modality", &["Final", "Open", "Abstract", "Sealed"])
        .enumeration(
            "DeclarationOrigin",
            &["Source", "Library", "Synthetic", "Enhancement"],
        )
        .enumeration(
            "AnnotationResolvePhase",
            &["Unresolved", "CompilerRequired", "Types"],
        )
        .enumeration(
            "UseSiteTarget",
            &[
                "Field",
                "File",
                "Property",
                "PropertyGetter",
                "PropertySetter",
                "Receiver",
                "ConstructorParameter",
            ],
        );
}

fn capabilities(builder: &mut SchemaBuilder) {
    builder
        .capability(
            CapabilityDef::new("AnnotationContainer").field(
                FieldDef::child_list("annotations", "Annotation")
                    .replace()
                    .transform(),
            ),
        )
        .capability(
            CapabilityDef::new("TypedExpression")
                .field(FieldDef::child("type_ref", "TypeRef").replace().transform()),
        )
        .capability(
            CapabilityDef::new("Resolvable").field(
                FieldDef::child("callee_reference", "Reference")
                    .replace()
                    .transform()
                    .replace_until(BodyResolve),
            ),
        )
        .capability(
            CapabilityDef::new("ControlFlowGraphOwner").field(
                FieldDef::child("control_flow_graph_reference", "ControlFlowGraphReference")
                    .nullable()
                    .replace(),
            ),
        )
        .capability(
            CapabilityDef::new("DiagnosticHolder")
                .field(FieldDef::value("diagnostic_message", PrimitiveType::String)),
        )
        .capability(
            CapabilityDef::new("TypeParametersOwner")
                .field(FieldDef::child_list("type_parameters", "TypeParameter").transform()),
        )
        .capability(
            CapabilityDef::new("TypeArgumentsOwner").field(
                FieldDef::child_list("type_arguments", "TypeProjection")
                    .replace()
                    .transform(),
            ),
        )
        .capability(
            CapabilityDef::new("DeclaredSymbolOwner")
                .field(FieldDef::symbol("symbol"))
                .field(
                    FieldDef::value("origin", enum_type("DeclarationOrigin"))
                        .default_value(Value::enumeration("DeclarationOrigin", "Source")),
                ),
        )
        .capability(
            CapabilityDef::new("MemberDeclaration").field(
                FieldDef::child("status", "DeclarationStatus")
                    .replace()
                    .transform()
                    .replace_until(Status),
            ),
        )
        .capability(
            CapabilityDef::new("CallableSignature")
                .field(
                    FieldDef::child("return_type_ref", "TypeRef")
                        .replace()
                        .transform()
                        .replace_until(ImplicitTypesBodyResolve),
                )
                .field(
                    FieldDef::child("receiver_parameter", "ReceiverParameter")
                        .nullable()
                        .replace()
                        .transform(),
                ),
        )
        .capability(
            CapabilityDef::new("ContractDescriptionOwner").field(
                FieldDef::child("contract_description", "ContractDescription")
                    .nullable()
                    .replace()
                    .transform()
                    .replace_until(Contracts),
            ),
        )
        .capability(
            CapabilityDef::new("Call").field(
                FieldDef::child("argument_list", "ArgumentList")
                    .replace()
                    .transform(),
            ),
        )
        .capability(
            CapabilityDef::new("QualifiedAccess")
                .field(
                    FieldDef::child("explicit_receiver", "Expression")
                        .nullable()
                        .replace()
                        .transform(),
                )
                .field(
                    FieldDef::node_ref("dispatch_receiver", "Expression")
                        .nullable()
                        .replace(),
                )
                .field(
                    FieldDef::node_ref("extension_receiver", "Expression")
                        .nullable()
                        .replace(),
                ),
        )
        .capability(CapabilityDef::new("Named").field(FieldDef::value("name", NameType)))
        .capability(
            CapabilityDef::new("Labeled")
                .field(FieldDef::child("label", "Label").nullable()),
        )
        .capability(
            CapabilityDef::new("ResolvedSymbolHolder").field(FieldDef::symbol("resolved_symbol")),
        );
}

fn expressions(builder: &mut SchemaBuilder) {
    builder
        .kind(KindDef::new("Element").abstract_kind())
        .kind(
            KindDef::new("Statement")
                .parent("Element")
                .abstract_kind()
                .capability("AnnotationContainer"),
        )
        .kind(
            KindDef::new("Expression")
                .parent("Statement")
                .abstract_kind()
                .capability("TypedExpression"),
        )
        .kind(
            KindDef::new("Block")
                .parent("Expression")
                .transform_other_children()
                .field(FieldDef::child_list("statements", "Statement")),
        )
        .kind(
            KindDef::new("LiteralExpression")
                .parent("Expression")
                .field(FieldDef::value("const_kind", enum_type("ConstKind")))
                .field(FieldDef::value("value", PrimitiveType::Any).nullable()),
        )
        .kind(
            KindDef::new("QualifiedAccessExpression")
                .parent("Expression")
                .abstract_kind()
                .capability("Resolvable")
                .capability("QualifiedAccess")
                .capability("TypeArgumentsOwner"),
        )
        .kind(KindDef::new("PropertyAccessExpression").parent("QualifiedAccessExpression"))
        .kind(
            KindDef::new("FunctionCall")
                .parent("QualifiedAccessExpression")
                .capability("Call")
                .field(
                    FieldDef::child("callee_reference", "NamedReference")
                        .replace()
                        .transform()
                        .replace_until(BodyResolve)
                        .overriding(),
                )
                .field(
                    FieldDef::value("origin", enum_type("FunctionCallOrigin"))
                        .default_value(Value::enumeration("FunctionCallOrigin", "Regular")),
                ),
        )
        .kind(
            KindDef::new("IntegerLiteralOperatorCall")
                .parent("FunctionCall")
                .field(
                    FieldDef::child("dispatch_receiver", "Expression")
                        .nullable()
                        .replace()
                        .transform()
                        .overriding(),
                ),
        )
        .kind(
            KindDef::new("ThisReceiverExpression")
                .parent("QualifiedAccessExpression")
                .field(
                    FieldDef::child("callee_reference", "ThisReference")
                        .replace()
                        .transform()
                        .replace_until(BodyResolve)
                        .overriding(),
                )
                .field(flag("is_implicit")),
        )
        .kind(
            KindDef::new("BinaryLogicExpression")
                .parent("Expression")
                .field(
                    FieldDef::child("left_operand", "Expression")
                        .replace()
                        .transform(),
                )
                .field(
                    FieldDef::child("right_operand", "Expression")
                        .replace()
                        .transform(),
                )
                .field(FieldDef::value(
                    "operation_kind",
                    enum_type("LogicOperationKind"),
                )),
        )
        .kind(
            KindDef::new("ReturnExpression")
                .parent("Expression")
                .field(FieldDef::node_ref("target", "Function").nullable().replace())
                .field(FieldDef::child("result", "Expression").replace().transform()),
        )
        .kind(
            KindDef::new("ThrowExpression")
                .parent("Expression")
                .field(FieldDef::child("exception", "Expression").replace().transform()),
        )
        .kind(
            KindDef::new("WhenExpression")
                .parent("Expression")
                .capability("ControlFlowGraphOwner")
                .transform_other_children()
                .field(
                    FieldDef::child("subject", "Expression")
                        .nullable()
                        .replace()
                        .transform(),
                )
                .field(FieldDef::child_list("branches", "WhenBranch"))
                .field(
                    FieldDef::value("exhaustiveness", enum_type("Exhaustiveness"))
                        .default_value(Value::enumeration("Exhaustiveness", "NotComputed"))
                        .replace(),
                ),
        )
        .kind(
            KindDef::new("WhenBranch")
                .parent("Element")
                .field(FieldDef::child("condition", "Expression").replace().transform())
                .field(FieldDef::child("result", "Block").replace().transform()),
        )
        .kind(
            KindDef::new("TypeOperatorCall")
                .parent("Expression")
                .capability("Call")
                .field(FieldDef::value("operation", enum_type("Operation")))
                .field(
                    FieldDef::child("conversion_type_ref", "TypeRef")
                        .replace()
                        .transform(),
                ),
        )
        .kind(
            KindDef::new("VariableAssignment")
                .parent("Statement")
                .field(FieldDef::child("lvalue", "Expression").replace().transform())
                .field(FieldDef::child("rvalue", "Expression").replace().transform()),
        )
        .kind(
            KindDef::new("ErrorExpression")
                .parent("Expression")
                .capability("DiagnosticHolder")
                .field(FieldDef::child("expression", "Expression").nullable()),
        )
        .kind(
            KindDef::new("TryExpression")
                .parent("Expression")
                .capability("ControlFlowGraphOwner")
                .transform_other_children()
                .field(FieldDef::child("try_block", "Block").replace())
                .field(FieldDef::child_list("catches", "Catch"))
                .field(FieldDef::child("finally_block", "Block").nullable().replace()),
        )
        .kind(
            KindDef::new("Catch")
                .parent("Element")
                .field(
                    FieldDef::child("parameter", "ValueParameter")
                        .replace()
                        .transform(),
                )
                .field(FieldDef::child("block", "Block").replace().transform()),
        )
        .kind(
            KindDef::new("Annotation")
                .parent("Expression")
                .field(FieldDef::value("use_site_target", enum_type("UseSiteTarget")).nullable())
                .field(
                    FieldDef::child("annotation_type_ref", "TypeRef")
                        .replace()
                        .transform(),
                ),
        )
        .kind(
            KindDef::new("AnnotationCall")
                .parent("Annotation")
                .capability("Resolvable")
                .capability("Call")
                .field(
                    FieldDef::value(
                        "annotation_resolve_phase",
                        enum_type("AnnotationResolvePhase"),
                    )
                    .default_value(Value::enumeration("AnnotationResolvePhase", "Unresolved"))
                    .replace(),
                ),
        )
        .kind(
            KindDef::new("Loop")
                .parent("Statement")
                .abstract_kind()
                .capability("Labeled")
                .transform_other_children()
                .field(FieldDef::child("block", "Block").replace())
                .field(FieldDef::child("condition", "Expression").replace()),
        )
        .kind(KindDef::new("WhileLoop").parent("Loop"))
        .kind(KindDef::new("DoWhileLoop").parent("Loop"));
}

fn declarations(builder: &mut SchemaBuilder) {
    builder
        .kind(
            KindDef::new("Declaration")
                .parent("Element")
                .abstract_kind()
                .capability("AnnotationContainer")
                .capability("DeclaredSymbolOwner"),
        )
        .kind(
            KindDef::new("ClassLikeDeclaration")
                .parent("Declaration")
                .abstract_kind()
                .capability("TypeParametersOwner"),
        )
        .kind(
            KindDef::new("Class")
                .parent("ClassLikeDeclaration")
                .abstract_kind()
                .field(FieldDef::value("class_kind", enum_type("ClassKind")))
                .field(
                    FieldDef::child_list("super_type_refs", "TypeRef")
                        .replace()
                        .transform(),
                )
                .field(FieldDef::child_list("declarations", "Declaration").transform()),
        )
        .kind(
            KindDef::new("RegularClass")
                .parent("Class")
                .capability("MemberDeclaration")
                .capability("Named")
                .field(
                    FieldDef::child_list("super_type_refs", "TypeRef")
                        .replace()
                        .replace_until(SuperTypes)
                        .overriding(),
                )
                .field(
                    FieldDef::node_ref("companion_object", "RegularClass")
                        .nullable()
                        .replace(),
                ),
        )
        .kind(
            KindDef::new("AnonymousObject")
                .parent("Class")
                .capability("ControlFlowGraphOwner"),
        )
        .kind(
            KindDef::new("TypeAlias")
                .parent("ClassLikeDeclaration")
                .capability("MemberDeclaration")
                .capability("Named")
                .field(
                    FieldDef::child("expanded_type_ref", "TypeRef")
                        .replace()
                        .transform()
                        .replace_until(Types),
                ),
        )
        .kind(
            KindDef::new("CallableDeclaration")
                .parent("Declaration")
                .abstract_kind()
                .capability("MemberDeclaration")
                .capability("CallableSignature"),
        )
        .kind(
            KindDef::new("Function")
                .parent("CallableDeclaration")
                .abstract_kind()
                .capability("ControlFlowGraphOwner")
                .capability("TypeParametersOwner")
                .field(FieldDef::child_list("value_parameters", "ValueParameter").transform())
                .field(FieldDef::child("body", "Block").nullable().replace().transform()),
        )
        .kind(
            KindDef::new("SimpleFunction")
                .parent("Function")
                .capability("Named")
                .capability("ContractDescriptionOwner"),
        )
        .kind(
            KindDef::new("Constructor")
                .parent("Function")
                .field(flag("is_primary")),
        )
        .kind(
            KindDef::new("PropertyAccessor")
                .parent("Function")
                .capability("ContractDescriptionOwner")
                .field(FieldDef::value("is_getter", Bool)),
        )
        .kind(
            KindDef::new("AnonymousFunction")
                .parent("Function")
                .capability("Labeled")
                .field(flag("is_lambda")),
        )
        .kind(
            KindDef::new("Variable")
                .parent("CallableDeclaration")
                .abstract_kind()
                .capability("Named")
                .transform_other_children()
                .field(
                    FieldDef::child("initializer", "Expression")
                        .nullable()
                        .replace(),
                )
                .field(flag("is_var")),
        )
        .kind(
            KindDef::new("Property")
                .parent("Variable")
                .capability("ControlFlowGraphOwner")
                .capability("TypeParametersOwner")
                .field(
                    FieldDef::child("getter", "PropertyAccessor")
                        .nullable()
                        .replace(),
                )
                .field(
                    FieldDef::child("setter", "PropertyAccessor")
                        .nullable()
                        .replace(),
                )
                .field(flag("is_local")),
        )
        .kind(
            KindDef::new("ValueParameter")
                .parent("Variable")
                .field(
                    FieldDef::child("default_value", "Expression")
                        .nullable()
                        .replace(),
                )
                .field(flag("is_vararg")),
        )
        .kind(
            KindDef::new("TypeParameter")
                .parent("Declaration")
                .capability("Named")
                .field(
                    FieldDef::value("variance", enum_type("Variance"))
                        .default_value(Value::enumeration("Variance", "Invariant")),
                )
                .field(
                    FieldDef::child_list("bounds", "TypeRef")
                        .replace()
                        .transform()
                        .replace_until(Types),
                )
                .field(flag("is_reified")),
        )
        .kind(
            KindDef::new("File")
                .parent("Declaration")
                .capability("Named")
                .field(FieldDef::child("package_directive", "PackageDirective").replace())
                .field(FieldDef::child_list("imports", "Import").replace().transform())
                .field(FieldDef::child_list("declarations", "Declaration").transform()),
        );
}

fn references(builder: &mut SchemaBuilder) {
    builder
        .kind(
            KindDef::new("ArgumentList")
                .parent("Element")
                .field(
                    FieldDef::child_list("arguments", "Expression")
                        .replace()
                        .transform(),
                ),
        )
        .kind(KindDef::new("Reference").parent("Element").abstract_kind())
        .kind(
            KindDef::new("NamedReference")
                .parent("Reference")
                .abstract_kind()
                .capability("Named"),
        )
        .kind(KindDef::new("SimpleNamedReference").parent("NamedReference"))
        .kind(
            KindDef::new("ResolvedNamedReference")
                .parent("NamedReference")
                .capability("ResolvedSymbolHolder"),
        )
        .kind(
            KindDef::new("ErrorNamedReference")
                .parent("NamedReference")
                .capability("DiagnosticHolder"),
        )
        .kind(
            KindDef::new("ThisReference")
                .parent("Reference")
                .field(FieldDef::value("label_name", NameType).nullable())
                .field(FieldDef::symbol("bound_symbol").nullable().replace()),
        )
        .kind(
            KindDef::new("SuperReference")
                .parent("Reference")
                .field(FieldDef::child("super_type_ref", "TypeRef").replace().transform()),
        )
        .kind(
            KindDef::new("ControlFlowGraphReference")
                .parent("Reference")
                .field(FieldDef::value("graph_id", Int).lateinit()),
        );
}

fn types(builder: &mut SchemaBuilder) {
    builder
        .kind(
            KindDef::new("TypeRef")
                .parent("Element")
                .abstract_kind()
                .capability("AnnotationContainer"),
        )
        .kind(
            KindDef::new("UserTypeRef")
                .parent("TypeRef")
                .capability("TypeArgumentsOwner")
                .field(FieldDef::value("qualifier", NameType))
                .field(flag("is_marked_nullable")),
        )
        .kind(KindDef::new("ImplicitTypeRef").parent("TypeRef"))
        .kind(
            KindDef::new("ResolvedTypeRef")
                .parent("TypeRef")
                .capability("ResolvedSymbolHolder")
                .field(
                    FieldDef::node_ref("delegated_type_ref", "TypeRef")
                        .nullable(),
                )
                .field(flag("is_marked_nullable")),
        )
        .kind(
            KindDef::new("ErrorTypeRef")
                .parent("ResolvedTypeRef")
                .capability("DiagnosticHolder"),
        )
        .kind(KindDef::new("TypeProjection").parent("Element").abstract_kind())
        .kind(KindDef::new("StarProjection").parent("TypeProjection"))
        .kind(
            KindDef::new("TypeProjectionWithVariance")
                .parent("TypeProjection")
                .field(FieldDef::child("type_ref", "TypeRef").replace().transform())
                .field(
                    FieldDef::value("variance", enum_type("Variance"))
                        .default_value(Value::enumeration("Variance", "Invariant")),
                ),
        );
}

fn miscellaneous(builder: &mut SchemaBuilder) {
    builder
        .kind(
            KindDef::new("DeclarationStatus")
                .parent("Element")
                .field(
                    FieldDef::value("visibility", enum_type("Visibility"))
                        .default_value(Value::enumeration("Visibility", "Unknown")),
                )
                .field(FieldDef::value("modality", enum_type("Modality")).nullable())
                .field(flag("is_expect"))
                .field(flag("is_actual")),
        )
        .kind(KindDef::new("ResolvedDeclarationStatus").parent("DeclarationStatus"))
        .kind(
            KindDef::new("ReceiverParameter")
                .parent("Element")
                .capability("AnnotationContainer")
                .field(FieldDef::child("type_ref", "TypeRef").replace().transform()),
        )
        .kind(
            KindDef::new("Label")
                .parent("Element")
                .capability("Named"),
        )
        .kind(
            KindDef::new("PackageDirective")
                .parent("Element")
                .field(FieldDef::value("package_name", NameType)),
        )
        .kind(
            KindDef::new("Import")
                .parent("Element")
                .field(FieldDef::value("imported_name", NameType).nullable())
                .field(FieldDef::value("alias_name", NameType).nullable())
                .field(flag("is_all_under")),
        )
        .kind(
            KindDef::new("ResolvedImport")
                .parent("Import")
                .field(FieldDef::node_ref("delegate", "Import"))
                .field(FieldDef::value("resolved_package", NameType).nullable()),
        )
        .kind(
            KindDef::new("ContractDescription")
                .parent("Element")
                .abstract_kind(),
        )
        .kind(
            KindDef::new("RawContractDescription")
                .parent("ContractDescription")
                .field(FieldDef::child_list("raw_effects", "Expression").transform()),
        )
        .kind(
            KindDef::new("ResolvedContractDescription")
                .parent("ContractDescription")
                .field(FieldDef::child_list("effects", "Expression").transform()),
        );
}
