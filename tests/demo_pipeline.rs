//! The demo pipeline resolves units independently.

use canopy::demo::{Builtins, ResolveCallees, ResolveTypes, library_unit, source_unit};
use canopy_tree::{
    Name, Pipeline, ResolvePhase, ResolveState, SymbolTable, Value, render, run_units,
};

#[test]
fn units_share_one_symbol_table() {
    let symbols = SymbolTable::new();
    let builtins = Builtins::new();
    let (_library, println) = library_unit(&builtins, &symbols).unwrap();
    let pipeline = Pipeline::new()
        .with_pass(ResolveTypes { builtins })
        .with_pass(ResolveCallees::new(vec![(Name::new("println"), println)]));

    let mut units: Vec<_> = (0..8)
        .map(|i| {
            source_unit(&format!("unit{i}.kt"), &[("println", Some(Value::Int(i)))]).unwrap()
        })
        .collect();
    let results = run_units(&pipeline, &mut units, &symbols);

    for (result, unit) in results.into_iter().zip(&units) {
        let outcome = result.unwrap();
        assert_eq!(outcome.unit, unit.name);
        assert_eq!(outcome.state, ResolveState::Phase(ResolvePhase::BodyResolve));
        assert!(outcome.diagnostics.is_empty());
    }

    insta::assert_snapshot!(render(&units[3].ctx, units[3].root), @r"
    Block [body_resolve]
      annotations: []
      type_ref: ImplicitTypeRef [body_resolve]
        annotations: []
      statements:
        - FunctionCall [body_resolve]
          annotations: []
          type_ref: ImplicitTypeRef [body_resolve]
            annotations: []
          callee_reference: ResolvedNamedReference [body_resolve]
            name: println
            resolved_symbol: sym#0
          explicit_receiver: null
          dispatch_receiver: null
          extension_receiver: null
          type_arguments: []
          argument_list: ArgumentList [body_resolve]
            arguments:
              - LiteralExpression [body_resolve]
                annotations: []
                type_ref: ResolvedTypeRef [body_resolve]
                  annotations: []
                  resolved_symbol: sym#1
                  delegated_type_ref: null
                  is_marked_nullable: false
                const_kind: ConstKind.Int
                value: 3
          origin: FunctionCallOrigin.Regular
    ");
}
