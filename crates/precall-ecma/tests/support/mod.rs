#![allow(dead_code)]

use precall_ecma::{Host, Precall, PrecallOptions, Result};
use swc_core::ecma::parser::{EsSyntax, Syntax, TsSyntax};

pub fn expand(source: &str) -> Result<String> {
    expand_with(&PrecallOptions::default(), source, "input.js")
}

pub fn expand_with(options: &PrecallOptions, source: &str, filename: &str) -> Result<String> {
    Precall::new(options)?.transform_source(source, filename)
}

/// Print `source` the way the pass prints its output.
pub fn normalize(source: &str) -> String {
    normalize_as(source, Syntax::Es(EsSyntax::default()))
}

pub fn normalize_ts(source: &str) -> String {
    normalize_as(source, Syntax::Typescript(TsSyntax::default()))
}

fn normalize_as(source: &str, syntax: Syntax) -> String {
    let host = Host::new();
    let program = host.parse_program("expected.js", source, syntax).unwrap();
    host.emit(&program).unwrap()
}
