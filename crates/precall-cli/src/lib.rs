//! Command-line driver for the precall expansion pass: reads sources,
//! expands them and writes the result.

pub mod diagnostics;
pub mod expand;

pub mod error {
    use miette::Diagnostic;
    use thiserror::Error;

    use crate::diagnostics::ExpansionDiagnostic;

    #[derive(Error, Debug, Diagnostic)]
    pub enum CliError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Invalid input: {0}")]
        InvalidInput(String),

        #[error(transparent)]
        #[diagnostic(transparent)]
        Precall(#[from] precall_core::Error),

        #[error(transparent)]
        #[diagnostic(transparent)]
        Expansion(Box<ExpansionDiagnostic>),
    }

    pub type Result<T> = std::result::Result<T, CliError>;
}

pub use error::{CliError, Result};
