//! Indented text rendering of a subtree, for tests and debugging.
//!
//! ```text
//! FunctionCall [raw]
//!   annotations: []
//!   type_ref: ImplicitTypeRef [raw]
//!     annotations: []
//!   callee_reference: SimpleNamedReference [raw]
//!     name: foo
//!   dispatch_receiver: null
//!   ...
//! ```
//!
//! Child fields nest. Reference fields print `-> Kind` of the referent.
//! Symbols are numbered `sym#N` by first appearance, so renderings of
//! separately built trees stay comparable.

use std::fmt::{self, Write};

use crate::context::TreeContext;
use crate::refs::{NodeRef, SymbolId};
use crate::values::FieldValue;

/// Render the subtree rooted at `root`.
pub fn render(ctx: &TreeContext, root: NodeRef) -> String {
    let mut printer = Printer {
        ctx,
        symbols: Vec::new(),
        output: String::new(),
    };
    // Writing into a String cannot fail.
    let _ = printer.print_node(root, 0);
    printer.output
}

struct Printer<'a> {
    ctx: &'a TreeContext,
    symbols: Vec<SymbolId>,
    output: String,
}

impl Printer<'_> {
    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.output.push_str("  ");
        }
    }

    fn symbol(&mut self, symbol: SymbolId) -> usize {
        match self.symbols.iter().position(|s| *s == symbol) {
            Some(index) => index,
            None => {
                self.symbols.push(symbol);
                self.symbols.len() - 1
            }
        }
    }

    /// Print the header of `node` on the current line, then its fields.
    fn print_node(&mut self, node: NodeRef, depth: usize) -> fmt::Result {
        let ctx = self.ctx;
        writeln!(self.output, "{} [{}]", ctx.kind(node), ctx.state(node))?;
        if let Some(diagnostic) = ctx.diagnostic(node) {
            self.indent(depth + 1);
            writeln!(self.output, "! {diagnostic}")?;
        }
        for (def, value) in ctx.field_values(node) {
            self.indent(depth + 1);
            write!(self.output, "{}: ", def.name)?;
            match value {
                FieldValue::Node(child) if def.is_child => {
                    self.print_node(*child, depth + 1)?;
                }
                FieldValue::Nodes(children) if def.is_child && !children.is_empty() => {
                    writeln!(self.output)?;
                    for child in children {
                        self.indent(depth + 2);
                        self.output.push_str("- ");
                        self.print_node(*child, depth + 2)?;
                    }
                }
                FieldValue::Node(target) => {
                    writeln!(self.output, "-> {}", ctx.kind(*target))?;
                }
                FieldValue::Nodes(targets) => {
                    let kinds: Vec<String> = targets
                        .iter()
                        .map(|t| format!("-> {}", ctx.kind(*t)))
                        .collect();
                    writeln!(self.output, "[{}]", kinds.join(", "))?;
                }
                FieldValue::Symbol(symbol) => {
                    let index = self.symbol(*symbol);
                    writeln!(self.output, "sym#{index}")?;
                }
                other => writeln!(self.output, "{other}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use canopy_schema::{ResolvePhase, Value};

    use super::*;
    use crate::builder::NodeBuilder;
    use crate::diagnostic::Diagnostic;
    use crate::ir_schema::ir_schema;

    #[test]
    fn renders_nested_children_and_references() {
        let mut ctx = TreeContext::new(ir_schema());
        let delegate = NodeBuilder::new("Import")
            .set("imported_name", Value::name("std.io"))
            .build(&mut ctx)
            .unwrap();
        let resolved = NodeBuilder::new("ResolvedImport")
            .set("imported_name", Value::name("std.io"))
            .set("delegate", delegate)
            .build(&mut ctx)
            .unwrap();
        let literal = NodeBuilder::new("LiteralExpression")
            .set("type_ref", NodeBuilder::new("ImplicitTypeRef").build(&mut ctx).unwrap())
            .set("const_kind", Value::enumeration("ConstKind", "Int"))
            .set("value", Value::Int(1))
            .build(&mut ctx)
            .unwrap();
        let args = NodeBuilder::new("ArgumentList")
            .set("arguments", vec![literal])
            .build(&mut ctx)
            .unwrap();

        insta::assert_snapshot!(render(&ctx, resolved), @r"
        ResolvedImport [raw]
          imported_name: std.io
          alias_name: null
          is_all_under: false
          delegate: -> Import
          resolved_package: null
        ");
        insta::assert_snapshot!(render(&ctx, args), @r"
        ArgumentList [raw]
          arguments:
            - LiteralExpression [raw]
              annotations: []
              type_ref: ImplicitTypeRef [raw]
                annotations: []
              const_kind: ConstKind.Int
              value: 1
        ");
    }

    #[test]
    fn renders_state_symbols_and_diagnostics() {
        let mut ctx = TreeContext::new(ir_schema());
        let reference = NodeBuilder::new("ResolvedNamedReference")
            .set("name", Value::name("println"))
            .set("resolved_symbol", SymbolId::fresh())
            .build(&mut ctx)
            .unwrap();
        ctx.advance_phase(reference, ResolvePhase::BodyResolve).unwrap();
        ctx.attach_diagnostic(
            reference,
            Diagnostic::warning("deprecated", ResolvePhase::BodyResolve, "println is deprecated"),
        )
        .unwrap();
        ctx.mark_error(reference);

        insta::assert_snapshot!(render(&ctx, reference), @r"
        ResolvedNamedReference [error@body_resolve]
          ! WARNING [body_resolve] deprecated: println is deprecated
          name: println
          resolved_symbol: sym#0
        ");
    }
}
