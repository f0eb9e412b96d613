//! Error reporting for the command line.

use miette::{Diagnostic, NamedSource, SourceSpan};
use precall_core::SourceLocation;
use thiserror::Error;

use crate::{CliError, Result};

pub fn setup_error_reporting() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .map_err(|e| CliError::InvalidInput(format!("Failed to setup error reporting: {}", e)))?;

    Ok(())
}

/// An expansion failure together with the file it happened in, so the report
/// can point at the offending invocation.
#[derive(Error, Debug, Diagnostic)]
#[error("{error}")]
#[diagnostic(code(precall::expand))]
pub struct ExpansionDiagnostic {
    error: precall_core::Error,
    #[source_code]
    src: NamedSource<String>,
    #[label("while expanding this")]
    span: Option<SourceSpan>,
}

impl ExpansionDiagnostic {
    pub fn new(error: precall_core::Error, name: &str, source: &str) -> Self {
        let span = error
            .location()
            .and_then(|location| offset_of(source, location))
            .map(|offset| SourceSpan::from((offset, 1)));
        Self {
            error,
            src: NamedSource::new(name, source.to_string()),
            span,
        }
    }

    pub fn error(&self) -> &precall_core::Error {
        &self.error
    }
}

/// Attach the file's source to an expansion error.
pub fn with_source(error: precall_core::Error, name: &str, source: &str) -> CliError {
    CliError::Expansion(Box::new(ExpansionDiagnostic::new(error, name, source)))
}

/// Byte offset of a 1-based line/column pair.
fn offset_of(source: &str, location: SourceLocation) -> Option<usize> {
    let line_index = location.line.checked_sub(1)?;
    let mut line_start = 0;
    for (index, line) in source.split_inclusive('\n').enumerate() {
        if index == line_index {
            let column = location.column.saturating_sub(1);
            let within = line
                .char_indices()
                .nth(column)
                .map(|(offset, _)| offset)
                .unwrap_or(line.len());
            return Some(line_start + within);
        }
        line_start += line.len();
    }
    None
}

/// Print `error` through the installed miette handler.
pub fn render_cli_error(error: CliError) {
    eprintln!("{:?}", miette::Report::new(error));
}
