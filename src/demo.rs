//! A two-pass resolution run over a few hand-built units.
//!
//! The library unit declares `println`; the source units call it and
//! something that does not exist. `resolve-types` gives literals a resolved
//! type, `resolve-callees` swaps each simple callee for a resolved or error
//! reference.

use std::fmt;
use std::ops::ControlFlow;

use canopy_tree::kinds::{
    ArgumentList, Block, DeclarationStatus, ErrorNamedReference, FunctionCall, ImplicitTypeRef,
    LiteralExpression, Named, Resolvable, ResolvedNamedReference, ResolvedTypeRef,
    SimpleFunction, SimpleNamedReference, TypedExpression,
};
use canopy_tree::{
    CompilationUnit, Diagnostic, Name, NodeRef, Pass, Pipeline, ResolvePhase, SymbolId,
    SymbolLookup, SymbolTable, TreeContext, TreeNode, TreeResult, Transformer, UnitOutcome,
    Value, WalkAction, ir_schema, render, run_units, transform, transform_children, walk_typed,
};
use tracing::debug;

use crate::error::CliResult;

/// Symbols of the builtin types literals resolve to.
#[derive(Clone, Copy, Debug)]
pub struct Builtins {
    pub int: SymbolId,
    pub string: SymbolId,
    pub unit: SymbolId,
}

impl Builtins {
    pub fn new() -> Self {
        Builtins {
            int: SymbolId::fresh(),
            string: SymbolId::fresh(),
            unit: SymbolId::fresh(),
        }
    }

    fn for_literal(&self, const_kind: Name) -> Option<SymbolId> {
        if const_kind == "Int" {
            Some(self.int)
        } else if const_kind == "String" {
            Some(self.string)
        } else {
            None
        }
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Self::new()
    }
}

/// Replaces the implicit type of every `Int` or `String` literal.
pub struct ResolveTypes {
    pub builtins: Builtins,
}

impl Pass for ResolveTypes {
    fn name(&self) -> &'static str {
        "resolve-types"
    }

    fn phase(&self) -> ResolvePhase {
        ResolvePhase::Types
    }

    fn run(&self, ctx: &mut TreeContext, root: NodeRef, _: &dyn SymbolLookup) -> TreeResult<()> {
        let mut literals = Vec::new();
        let _ = walk_typed::<LiteralExpression, ()>(ctx, root, &mut |literal| {
            literals.push(literal);
            ControlFlow::Continue(WalkAction::Advance)
        });

        for literal in literals {
            if !ImplicitTypeRef::matches(ctx, literal.type_ref(ctx)) {
                continue;
            }
            let Some(symbol) = literal
                .const_kind(ctx)
                .as_variant()
                .and_then(|kind| self.builtins.for_literal(kind))
            else {
                continue;
            };
            let resolved = ResolvedTypeRef::builder()
                .set("resolved_symbol", symbol)
                .build(ctx)?;
            literal.replace_type_ref(ctx, resolved)?;
        }
        Ok(())
    }
}

/// Resolves the callee of every function call against a flat scope.
pub struct ResolveCallees {
    scope: Vec<(Name, SymbolId)>,
}

impl ResolveCallees {
    pub fn new(scope: Vec<(Name, SymbolId)>) -> Self {
        ResolveCallees { scope }
    }
}

impl Pass for ResolveCallees {
    fn name(&self) -> &'static str {
        "resolve-callees"
    }

    fn phase(&self) -> ResolvePhase {
        ResolvePhase::BodyResolve
    }

    fn run(&self, ctx: &mut TreeContext, root: NodeRef, symbols: &dyn SymbolLookup) -> TreeResult<()> {
        let mut resolver = CalleeResolver {
            scope: &self.scope,
            symbols,
        };
        let mut counts = CalleeCounts::default();
        transform(ctx, root, &mut resolver, &mut counts)?;
        debug!(resolved = counts.resolved, unresolved = counts.unresolved, "resolved callees");
        Ok(())
    }
}

#[derive(Default)]
struct CalleeCounts {
    resolved: usize,
    unresolved: usize,
}

struct CalleeResolver<'a> {
    scope: &'a [(Name, SymbolId)],
    symbols: &'a dyn SymbolLookup,
}

impl CalleeResolver<'_> {
    /// Symbol `name` refers to, if it is in scope and bound to a declaration.
    fn lookup(&self, name: Name) -> Option<SymbolId> {
        self.scope
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, symbol)| *symbol)
            .filter(|symbol| self.symbols.resolve(*symbol).is_some())
    }
}

impl Transformer<CalleeCounts> for CalleeResolver<'_> {
    fn transform_function_call(
        &mut self,
        ctx: &mut TreeContext,
        node: NodeRef,
        counts: &mut CalleeCounts,
    ) -> TreeResult<NodeRef> {
        transform_children(ctx, node, self, counts)?;

        let call = FunctionCall::from_node(ctx, node)?;
        let callee = call.callee_reference(ctx);
        let Ok(simple) = SimpleNamedReference::from_node(ctx, callee) else {
            return Ok(node);
        };
        let name = simple.name(ctx).clone();
        let Some(name_id) = name.as_name() else {
            return Ok(node);
        };

        let replacement = match self.lookup(name_id) {
            Some(symbol) => {
                counts.resolved += 1;
                ResolvedNamedReference::builder()
                    .set("name", name)
                    .set("resolved_symbol", symbol)
                    .build(ctx)?
            }
            None => {
                counts.unresolved += 1;
                let message = format!("unresolved reference `{name_id}`");
                let error = ErrorNamedReference::builder()
                    .set("name", name)
                    .set("diagnostic_message", Value::str(message.clone()))
                    .build(ctx)?;
                ctx.attach_diagnostic(
                    error,
                    Diagnostic::error("unresolved_reference", ResolvePhase::BodyResolve, message),
                )?;
                ctx.advance_phase(error, ResolvePhase::BodyResolve)?;
                ctx.mark_error(error);
                error
            }
        };
        call.replace_callee_reference(ctx, replacement)?;
        Ok(node)
    }
}

/// Before and after renderings of one unit.
#[derive(Debug)]
pub struct UnitReport {
    pub before: String,
    pub after: String,
    pub outcome: UnitOutcome,
}

#[derive(Debug)]
pub struct DemoReport {
    pub passes: Vec<&'static str>,
    pub units: Vec<UnitReport>,
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pipeline: {}", self.passes.join(", "))?;
        for unit in &self.units {
            writeln!(f)?;
            writeln!(f, "== {}", unit.outcome.unit)?;
            writeln!(f, "-- before")?;
            write!(f, "{}", unit.before)?;
            writeln!(f, "-- after")?;
            write!(f, "{}", unit.after)?;
            writeln!(
                f,
                "-- {}: {} diagnostic(s)",
                unit.outcome.state,
                unit.outcome.diagnostics.len()
            )?;
            for (_, diagnostic) in &unit.outcome.diagnostics {
                writeln!(f, "   {diagnostic}")?;
            }
        }
        Ok(())
    }
}

/// Build a library unit declaring `println(value)` and bind it in `symbols`.
pub fn library_unit(builtins: &Builtins, symbols: &dyn SymbolLookup) -> CliResult<(CompilationUnit, SymbolId)> {
    let mut ctx = TreeContext::new(ir_schema());
    let status = DeclarationStatus::builder()
        .set("visibility", Value::enumeration("Visibility", "Public"))
        .build(&mut ctx)?;
    let return_type = ResolvedTypeRef::builder()
        .set("resolved_symbol", builtins.unit)
        .build(&mut ctx)?;
    let println = SimpleFunction::builder()
        .set("symbol", SymbolId::fresh())
        .set("origin", Value::enumeration("DeclarationOrigin", "Library"))
        .set("status", status)
        .set("return_type_ref", return_type)
        .set("name", Value::name("println"))
        .build(&mut ctx)?;
    let symbol = ctx.declare_symbol(println, symbols)?;
    Ok((CompilationUnit::new("library", ctx, println), symbol))
}

/// Build a unit whose body is one call per `(callee, literal argument)`.
pub fn source_unit(name: &str, calls: &[(&str, Option<Value>)]) -> CliResult<CompilationUnit> {
    let mut ctx = TreeContext::new(ir_schema());
    let mut statements = Vec::with_capacity(calls.len());
    for (callee, argument) in calls {
        statements.push(call(&mut ctx, callee, argument.clone())?.node());
    }
    let block_type = ImplicitTypeRef::builder().build(&mut ctx)?;
    let block = Block::builder()
        .set("type_ref", block_type)
        .set("statements", statements)
        .build(&mut ctx)?;
    Ok(CompilationUnit::new(name, ctx, block))
}

fn call(ctx: &mut TreeContext, callee: &str, argument: Option<Value>) -> TreeResult<FunctionCall> {
    let mut arguments = Vec::new();
    if let Some(value) = argument {
        let const_kind = match value {
            Value::Int(_) => "Int",
            Value::Str(_) => "String",
            Value::Bool(_) => "Boolean",
            _ => "Null",
        };
        let type_ref = ImplicitTypeRef::builder().build(ctx)?;
        arguments.push(
            LiteralExpression::builder()
                .set("type_ref", type_ref)
                .set("const_kind", Value::enumeration("ConstKind", const_kind))
                .set("value", value)
                .build(ctx)?,
        );
    }
    let argument_list = ArgumentList::builder()
        .set("arguments", arguments)
        .build(ctx)?;
    let reference = SimpleNamedReference::builder()
        .set("name", Value::name(callee))
        .build(ctx)?;
    let type_ref = ImplicitTypeRef::builder().build(ctx)?;
    FunctionCall::builder()
        .set("type_ref", type_ref)
        .set("callee_reference", reference)
        .set("argument_list", argument_list)
        .build_as::<FunctionCall>(ctx)
}

/// Resolve `main.kt` and `other.kt` against the library, in parallel.
pub fn run_demo() -> CliResult<DemoReport> {
    let builtins = Builtins::new();
    let symbols = SymbolTable::new();
    let (_library, println) = library_unit(&builtins, &symbols)?;

    let pipeline = Pipeline::new()
        .with_pass(ResolveTypes { builtins })
        .with_pass(ResolveCallees::new(vec![(Name::new("println"), println)]));

    let mut units = vec![
        source_unit(
            "main.kt",
            &[("println", Some(Value::Int(1))), ("missing", None)],
        )?,
        source_unit("other.kt", &[("println", Some(Value::str("hi")))])?,
    ];
    let before: Vec<String> = units.iter().map(|u| render(&u.ctx, u.root)).collect();

    let results = run_units(&pipeline, &mut units, &symbols);
    let mut reports = Vec::with_capacity(units.len());
    for ((unit, before), result) in units.iter().zip(before).zip(results) {
        reports.push(UnitReport {
            before,
            after: render(&unit.ctx, unit.root),
            outcome: result?,
        });
    }
    Ok(DemoReport {
        passes: pipeline.pass_names().collect(),
        units: reports,
    })
}

#[cfg(test)]
mod tests {
    use canopy_tree::{ResolveState, subtree};

    use super::*;

    #[test]
    fn library_declaration_is_bound() {
        let symbols = SymbolTable::new();
        let (library, println) = library_unit(&Builtins::new(), &symbols).unwrap();
        let declaration = symbols.resolve(println).unwrap();
        assert_eq!(declaration.tree, library.ctx.id());
        assert_eq!(declaration.node, library.root);
        let function = SimpleFunction::from_node(&library.ctx, library.root).unwrap();
        assert_eq!(function.name(&library.ctx), &Value::name("println"));
    }

    #[test]
    fn resolves_known_callees_and_reports_the_rest() {
        let report = run_demo().unwrap();
        assert_eq!(report.passes, ["resolve-types", "resolve-callees"]);
        assert_eq!(report.units.len(), 2);

        let main = &report.units[0];
        assert_eq!(main.outcome.unit, "main.kt");
        assert_eq!(main.outcome.state, ResolveState::Phase(ResolvePhase::BodyResolve));
        assert!(main.outcome.has_errors());
        assert_eq!(main.outcome.diagnostics.len(), 1);
        assert_eq!(
            main.outcome.diagnostics[0].1.message,
            "unresolved reference `missing`"
        );
        assert!(main.before.contains("callee_reference: SimpleNamedReference [raw]"));
        assert!(main.after.contains("callee_reference: ResolvedNamedReference [body_resolve]"));
        assert!(main.after.contains("callee_reference: ErrorNamedReference [error@body_resolve]"));
        assert!(main.after.contains("type_ref: ResolvedTypeRef [body_resolve]"));

        let other = &report.units[1];
        assert_eq!(other.outcome.unit, "other.kt");
        assert!(!other.outcome.has_errors());
        assert!(!other.after.contains("SimpleNamedReference"));
    }

    #[test]
    fn unresolved_callee_without_binding() {
        // `println` is in scope but its symbol was never bound.
        let pass = ResolveCallees::new(vec![(Name::new("println"), SymbolId::fresh())]);
        let mut unit = source_unit("a.kt", &[("println", None)]).unwrap();
        pass.run(&mut unit.ctx, unit.root, &SymbolTable::new()).unwrap();

        let errors: Vec<NodeRef> = subtree(&unit.ctx, unit.root)
            .into_iter()
            .filter(|node| ErrorNamedReference::matches(&unit.ctx, *node))
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(unit.ctx.state(errors[0]).is_error());
    }

    #[test]
    fn report_lists_each_unit() {
        let text = run_demo().unwrap().to_string();
        assert!(text.starts_with("pipeline: resolve-types, resolve-callees\n"));
        assert!(text.contains("== main.kt\n"));
        assert!(text.contains("-- body_resolve: 1 diagnostic(s)\n"));
        assert!(text.contains(
            "   ERROR [body_resolve] unresolved_reference: unresolved reference `missing`\n"
        ));
        assert!(text.contains("== other.kt\n"));
        assert!(text.contains("-- body_resolve: 0 diagnostic(s)\n"));
    }
}
