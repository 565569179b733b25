//! Error types for the command-line tools

use std::path::PathBuf;

use canopy_schema::SchemaError;
use canopy_tree::{PipelineError, TreeError};
use derive_more::{Display, Error, From};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Display, Error, From)]
pub enum CliError {
    #[display("cannot read {}: {source}", path.display())]
    #[from(ignore)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[display("Schema error: {_0}")]
    Schema(SchemaError),

    #[display("Tree error: {_0}")]
    Tree(TreeError),

    #[display("{_0}")]
    Pipeline(PipelineError),

    #[display("unknown node kind `{name}`")]
    #[from(ignore)]
    UnknownKind { name: String },
}

#[cfg(test)]
mod tests {
    use canopy_schema::Name;

    use super::*;

    #[test]
    fn library_errors_convert_into_cli_errors() {
        let err: CliError = TreeError::AbstractKind {
            kind: Name::new("Element"),
        }
        .into();
        assert_eq!(err.to_string(), "Tree error: cannot instantiate abstract kind Element");
    }
}
