//! Turning an executed fragment's export back into source syntax.

use precall_core::{Error, Result};
use serde_json::value::RawValue;
use swc_core::common::{Span, SyntaxContext};
use swc_core::ecma::ast::{Expr, Ident, ParenExpr};

use crate::host::Host;

/// The value a fragment left in `module.exports`.
#[derive(Debug, Clone)]
pub enum ExecutionResult {
    /// `undefined`, or nothing was executed at all
    Absent,
    /// A function or class; `source` is its own printable definition
    Callable { source: String },
    /// Anything `JSON.stringify` accepts, as the JSON text the engine wrote.
    /// Kept as text so escapes such as lone surrogates survive unchanged.
    Structural(Box<RawValue>),
}

impl ExecutionResult {
    /// Wrap JSON text, rejecting anything that is not a single JSON value.
    pub fn structural(json: String) -> serde_json::Result<Self> {
        RawValue::from_string(json).map(ExecutionResult::Structural)
    }
}

impl PartialEq for ExecutionResult {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ExecutionResult::Absent, ExecutionResult::Absent) => true,
            (ExecutionResult::Callable { source: a }, ExecutionResult::Callable { source: b }) => a == b,
            (ExecutionResult::Structural(a), ExecutionResult::Structural(b)) => a.get() == b.get(),
            _ => false,
        }
    }
}

/// Build the expression that replaces an invocation.
///
/// JSON text is valid expression syntax, so structural values are parsed
/// rather than rebuilt; string literals keep their escapes as written.
pub fn to_expr(result: ExecutionResult, span: Span, host: &Host, filename: &str) -> Result<Box<Expr>> {
    match result {
        ExecutionResult::Absent => Ok(Box::new(undefined(span))),
        ExecutionResult::Callable { source } => {
            let expr = host.parse_expr(filename, &source).map_err(|err| {
                Error::serialization(filename, "function", format!("source is not re-parsable: {err}"))
            })?;
            Ok(Box::new(Expr::Paren(ParenExpr { span, expr })))
        }
        ExecutionResult::Structural(json) => host.parse_expr(filename, json.get()).map_err(|err| {
            Error::serialization(filename, "value", format!("JSON text is not an expression: {err}"))
        }),
    }
}

pub fn undefined(span: Span) -> Expr {
    Expr::Ident(Ident::new("undefined".into(), span, SyntaxContext::empty()))
}
