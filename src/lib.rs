//! Inspection tools and a demo resolution pipeline over the Canopy IR tree.

pub mod demo;
pub mod error;
pub mod inspect;

pub use error::{CliError, CliResult};
