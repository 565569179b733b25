//! Text reports over a composed schema.

use std::fmt::Write;
use std::path::Path;

use canopy_schema::{ComposedKind, FieldDef, FieldInit, PhaseWindows, Schema, WindowTarget};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// One line per kind: `Kind : Parent [caps] (abstract)`.
pub fn schema_summary(schema: &Schema) -> String {
    let mut out = String::new();
    for kind in schema.kinds() {
        let _ = write!(out, "{}", kind.name);
        if let Some(parent) = kind.parent {
            let _ = write!(out, " : {parent}");
        }
        if !kind.capabilities.is_empty() {
            let caps: Vec<String> = kind.capabilities.iter().map(|c| c.to_string()).collect();
            let _ = write!(out, " [{}]", caps.join(", "));
        }
        if kind.is_abstract {
            out.push_str(" (abstract)");
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "{} kinds, {} capabilities, {} enums",
        schema.kinds().len(),
        schema.capabilities().len(),
        schema.enums().len()
    );
    out
}

/// Full composed view of the kind called `name`.
pub fn describe_kind(schema: &Schema, name: &str) -> CliResult<String> {
    let kind = schema
        .kind_named(name)
        .ok_or_else(|| CliError::UnknownKind {
            name: name.to_string(),
        })?;
    Ok(render_kind(kind))
}

fn render_kind(kind: &ComposedKind) -> String {
    let mut out = String::new();
    let supertypes: Vec<String> = kind.supertypes.iter().map(|k| k.to_string()).collect();
    let _ = writeln!(out, "{}", supertypes.join(" <: "));
    let mut flags = Vec::new();
    if kind.is_abstract {
        flags.push("abstract");
    }
    if kind.transform_other_children {
        flags.push("transforms other children");
    }
    if !flags.is_empty() {
        let _ = writeln!(out, "  ({})", flags.join(", "));
    }
    for field in &kind.fields {
        let _ = writeln!(out, "  {}", render_field(field));
    }
    out
}

fn render_field(field: &FieldDef) -> String {
    let nullable = if field.nullable { "?" } else { "" };
    let mut flags = Vec::new();
    if field.is_node_field() {
        flags.push(if field.is_child { "child" } else { "ref" });
    }
    if field.with_replace {
        flags.push("replace");
    }
    if field.with_transform {
        flags.push("transform");
    }
    match field.init {
        FieldInit::Lateinit => flags.push("lateinit"),
        FieldInit::Default(_) => flags.push("default"),
        FieldInit::Required => {}
    }
    if field.is_override {
        flags.push("override");
    }

    let mut line = format!("{}: {}{nullable}", field.name, field.ty);
    if !flags.is_empty() {
        let _ = write!(line, " ({})", flags.join(", "));
    }
    if let Some(until) = field.replace_until {
        let _ = write!(line, " until {until}");
    }
    if let Some(origin) = field.declared_in {
        let _ = write!(line, " from {origin}");
    }
    line
}

/// Load a TOML window file and apply it on top of `schema`.
///
/// Returns the adjusted schema and one report line per entry.
pub fn apply_window_file(schema: &Schema, path: &Path) -> CliResult<(Schema, Vec<String>)> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let windows = PhaseWindows::from_toml_str(&text)?;
    debug!(path = %path.display(), entries = windows.len(), "loaded phase windows");
    let adjusted = schema.with_phase_windows(&windows)?;

    let mut report = Vec::with_capacity(windows.len());
    for entry in &windows.windows {
        let line = match entry.target()? {
            WindowTarget::Kind(kind) => {
                let affected = adjusted
                    .kinds()
                    .iter()
                    .filter(|k| k.supertypes.iter().any(|s| *s == kind))
                    .count();
                format!(
                    "kind {kind}.{} until {} ({affected} kinds)",
                    entry.field, entry.until
                )
            }
            WindowTarget::Capability(capability) => {
                let affected = adjusted
                    .kinds()
                    .iter()
                    .filter(|k| k.capabilities.iter().any(|c| *c == capability))
                    .count();
                format!(
                    "capability {capability}.{} until {} ({affected} kinds)",
                    entry.field, entry.until
                )
            }
        };
        report.push(line);
    }
    Ok((adjusted, report))
}
