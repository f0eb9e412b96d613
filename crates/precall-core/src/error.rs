use crate::location::SourceLocation;
use miette::Diagnostic;
use std::result;
use thiserror::Error;

/// Every failure of the pass. None of them is recoverable: the first one
/// aborts the file being processed.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    #[diagnostic(
        code(precall::config),
        help("`value` must be an identifier or a non-empty list of identifiers")
    )]
    Config(String),

    #[error("{filename}{}: failed to parse input: {message}", fmt_location(.location))]
    #[diagnostic(code(precall::parse))]
    Parse {
        filename: String,
        message: String,
        location: Option<SourceLocation>,
    },

    #[error("{filename}{}: failed to compile fragment: {message}", fmt_location(.location))]
    #[diagnostic(
        code(precall::compile),
        help("the fragment must be a self-contained script assigning `module.exports`")
    )]
    Compile {
        filename: String,
        message: String,
        location: Option<SourceLocation>,
    },

    #[error("{filename}{}: fragment threw during execution: {message}", fmt_location(.location))]
    #[diagnostic(code(precall::execution))]
    Execution {
        filename: String,
        message: String,
        location: Option<SourceLocation>,
    },

    #[error(
        "{filename}{}: cannot represent exported {type_name} as a literal: {message}",
        fmt_location(.location)
    )]
    #[diagnostic(
        code(precall::serialization),
        help("export undefined, a function, or a JSON-compatible value")
    )]
    Serialization {
        filename: String,
        type_name: String,
        message: String,
        location: Option<SourceLocation>,
    },

    #[error(
        "{filename}{}: module specifier must expand to a string literal, found {found}",
        fmt_location(.location)
    )]
    #[diagnostic(code(precall::specifier))]
    Specifier {
        filename: String,
        found: String,
        location: Option<SourceLocation>,
    },

    #[error("failed to emit code: {0}")]
    #[diagnostic(code(precall::emit))]
    Emit(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(precall::io))]
    Io(#[from] std::io::Error),
}

pub type Result<T> = result::Result<T, Error>;

fn fmt_location(location: &Option<SourceLocation>) -> String {
    location.map(|loc| format!(":{loc}")).unwrap_or_default()
}

impl Error {
    pub fn compile(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Compile {
            filename: filename.into(),
            message: message.into(),
            location: None,
        }
    }

    pub fn execution(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Execution {
            filename: filename.into(),
            message: message.into(),
            location: None,
        }
    }

    pub fn serialization(
        filename: impl Into<String>,
        type_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Serialization {
            filename: filename.into(),
            type_name: type_name.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Attach the location of the invocation that failed. A location that is
    /// already set is kept.
    pub fn at(mut self, loc: Option<SourceLocation>) -> Self {
        match &mut self {
            Error::Parse { location, .. }
            | Error::Compile { location, .. }
            | Error::Execution { location, .. }
            | Error::Serialization { location, .. }
            | Error::Specifier { location, .. } => {
                if location.is_none() {
                    *location = loc;
                }
            }
            Error::Config(_) | Error::Emit(_) | Error::Io(_) => {}
        }
        self
    }

    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Error::Parse { location, .. }
            | Error::Compile { location, .. }
            | Error::Execution { location, .. }
            | Error::Serialization { location, .. }
            | Error::Specifier { location, .. } => *location,
            Error::Config(_) | Error::Emit(_) | Error::Io(_) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
