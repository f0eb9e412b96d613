//! Splicing expansion results into the tree.

use precall_core::{Error, Result, SourceLocation};
use swc_core::ecma::ast::{Expr, ExprOrSpread, ImportDecl, Lit};

/// Put `replacement` where the invocation was.
pub fn replace_expr(target: &mut Expr, replacement: Box<Expr>) {
    *target = *replacement;
}

/// Replace a `require` argument; any expression is acceptable there.
pub fn replace_argument(arg: &mut ExprOrSpread, replacement: Box<Expr>) {
    arg.expr = replacement;
}

/// Replace an import source. The source of an import declaration can only be
/// a string literal, so anything else is rejected.
pub fn replace_import_source(
    import: &mut ImportDecl,
    replacement: Box<Expr>,
    filename: &str,
    location: Option<SourceLocation>,
) -> Result<()> {
    match *replacement {
        Expr::Lit(Lit::Str(mut src)) => {
            src.span = import.src.span;
            *import.src = src;
            Ok(())
        }
        other => Err(Error::Specifier {
            filename: filename.to_string(),
            found: describe(&other).to_string(),
            location,
        }),
    }
}

fn describe(expr: &Expr) -> &'static str {
    match expr {
        Expr::Lit(Lit::Num(_)) => "a number",
        Expr::Lit(Lit::Bool(_)) => "a boolean",
        Expr::Lit(Lit::Null(_)) => "null",
        Expr::Lit(_) => "a literal",
        Expr::Ident(ident) if &*ident.sym == "undefined" => "undefined",
        Expr::Ident(_) => "an identifier",
        Expr::Object(_) => "an object",
        Expr::Array(_) => "an array",
        Expr::Fn(_) | Expr::Arrow(_) => "a function",
        Expr::Paren(paren) => describe(&paren.expr),
        _ => "an expression",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Host;
    use swc_core::ecma::ast::{ModuleDecl, ModuleItem, Program};
    use swc_core::ecma::parser::{EsSyntax, Syntax};

    fn import_decl(host: &Host, source: &str) -> ImportDecl {
        let program = host
            .parse_program("a.js", source, Syntax::Es(EsSyntax::default()))
            .unwrap();
        let Program::Module(module) = program else {
            panic!("expected module")
        };
        match module.body.into_iter().next() {
            Some(ModuleItem::ModuleDecl(ModuleDecl::Import(import))) => import,
            other => panic!("expected import, found {other:?}"),
        }
    }

    #[test]
    fn string_replaces_import_source() {
        let host = Host::new();
        let mut import = import_decl(&host, "import a from 'x';");
        let replacement = host.parse_expr("a.js", "'./real.js'").unwrap();
        replace_import_source(&mut import, replacement, "a.js", None).unwrap();
        assert_eq!(&*import.src.value, "./real.js");
    }

    #[test]
    fn non_string_import_source_is_rejected() {
        let host = Host::new();
        let mut import = import_decl(&host, "import a from 'x';");
        let replacement = host.parse_expr("a.js", "undefined").unwrap();
        let err = replace_import_source(&mut import, replacement, "a.js", None).unwrap_err();
        match err {
            Error::Specifier { found, .. } => assert_eq!(found, "undefined"),
            other => panic!("expected specifier error, found {other:?}"),
        }
        assert_eq!(&*import.src.value, "x");
    }
}
