//! Per-field replace windows supplied as configuration.
//!
//! A window closes a field for replacement once a node has advanced past
//! the given phase. Windows are loaded from TOML and applied on top of a
//! composed schema with `Schema::with_phase_windows`:
//!
//! ```toml
//! [[window]]
//! capability = "Resolvable"
//! field = "callee_reference"
//! until = "body_resolve"
//!
//! [[window]]
//! kind = "RegularClass"
//! field = "super_type_refs"
//! until = "super_types"
//! ```

use serde::{Deserialize, Serialize};

use crate::{ResolvePhase, SchemaError, SchemaResult};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseWindows {
    #[serde(default, rename = "window")]
    pub windows: Vec<WindowEntry>,
}

/// One `[[window]]` table. Exactly one of `kind` and `capability` is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,
    pub field: String,
    pub until: ResolvePhase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowTarget<'a> {
    Kind(&'a str),
    Capability(&'a str),
}

impl WindowTarget<'_> {
    pub fn name(&self) -> &str {
        match self {
            WindowTarget::Kind(name) | WindowTarget::Capability(name) => name,
        }
    }
}

impl WindowEntry {
    pub fn target(&self) -> SchemaResult<WindowTarget<'_>> {
        match (&self.kind, &self.capability) {
            (Some(kind), None) => Ok(WindowTarget::Kind(kind)),
            (None, Some(capability)) => Ok(WindowTarget::Capability(capability)),
            _ => Err(SchemaError::InvalidWindowConfig {
                message: format!(
                    "window for field `{}` must name exactly one of `kind` or `capability`",
                    self.field
                ),
            }),
        }
    }
}

impl PhaseWindows {
    pub fn from_toml_str(text: &str) -> SchemaResult<Self> {
        let windows: PhaseWindows =
            toml::from_str(text).map_err(|e| SchemaError::InvalidWindowConfig {
                message: e.to_string(),
            })?;
        for entry in &windows.windows {
            entry.target()?;
        }
        Ok(windows)
    }

    pub fn to_toml_string(&self) -> SchemaResult<String> {
        toml::to_string(self).map_err(|e| SchemaError::InvalidWindowConfig {
            message: e.to_string(),
        })
    }

    /// Close `field` of `kind` (and its subtypes) after `until`.
    pub fn kind(mut self, kind: &str, field: &str, until: ResolvePhase) -> Self {
        self.windows.push(WindowEntry {
            kind: Some(kind.to_string()),
            capability: None,
            field: field.to_string(),
            until,
        });
        self
    }

    /// Close `field` on every kind composing `capability` after `until`.
    pub fn capability(mut self, capability: &str, field: &str, until: ResolvePhase) -> Self {
        self.windows.push(WindowEntry {
            kind: None,
            capability: Some(capability.to_string()),
            field: field.to_string(),
            until,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_window_tables() {
        let windows = PhaseWindows::from_toml_str(
            r#"
            [[window]]
            capability = "Resolvable"
            field = "callee_reference"
            until = "body_resolve"

            [[window]]
            kind = "RegularClass"
            field = "super_type_refs"
            until = "super_types"
            "#,
        )
        .unwrap();
        assert_eq!(
            windows,
            PhaseWindows::default()
                .capability("Resolvable", "callee_reference", ResolvePhase::BodyResolve)
                .kind("RegularClass", "super_type_refs", ResolvePhase::SuperTypes)
        );
    }

    #[test]
    fn empty_document_has_no_windows() {
        assert!(PhaseWindows::from_toml_str("").unwrap().is_empty());
    }

    #[test]
    fn rejects_ambiguous_target() {
        let err = PhaseWindows::from_toml_str(
            r#"
            [[window]]
            kind = "Block"
            capability = "Resolvable"
            field = "statements"
            until = "types"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidWindowConfig { .. }));
    }

    #[test]
    fn rejects_unknown_phase() {
        let err = PhaseWindows::from_toml_str(
            r#"
            [[window]]
            kind = "Block"
            field = "statements"
            until = "whenever"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidWindowConfig { .. }));
    }
}
