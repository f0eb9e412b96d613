//! Deciding whether a node is an invocation the pass must expand.

use std::fmt::{Display, Formatter};

use swc_core::common::{Span, Spanned};
use swc_core::ecma::ast::{CallExpr, Callee, Expr, ImportDecl, Lit};

use crate::context::MatchContext;
use crate::extract::{extract_argument, extract_template};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationForm {
    /// `kw(`...`)` or `kw("...")`
    Call,
    /// `` kw`...` ``
    Tag,
}

impl Display for InvocationForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvocationForm::Call => write!(f, "call"),
            InvocationForm::Tag => write!(f, "tagged template"),
        }
    }
}

/// A matched call/tag invocation with its extracted source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub form: InvocationForm,
    pub keyword: String,
    pub literal: String,
    pub span: Span,
}

pub fn match_invocation(expr: &Expr, ctx: &MatchContext) -> Option<Invocation> {
    match expr {
        Expr::Call(call) => {
            let Callee::Expr(callee) = &call.callee else {
                return None;
            };
            let Expr::Ident(ident) = &**callee else {
                return None;
            };
            if !ctx.is_keyword(ident) {
                return None;
            }
            Some(Invocation {
                form: InvocationForm::Call,
                keyword: ident.sym.to_string(),
                literal: extract_argument(call.args.first()),
                span: call.span,
            })
        }
        Expr::TaggedTpl(tagged) => {
            let Expr::Ident(ident) = &*tagged.tag else {
                return None;
            };
            if !ctx.is_keyword(ident) {
                return None;
            }
            Some(Invocation {
                form: InvocationForm::Tag,
                keyword: ident.sym.to_string(),
                literal: extract_template(&tagged.tpl),
                span: tagged.span,
            })
        }
        _ => None,
    }
}

/// A string literal in specifier position whose text starts with a keyword
/// invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub text: String,
    pub span: Span,
}

/// `require("<kw>(...)")`, with `require` itself unbound.
pub fn match_require_specifier(call: &CallExpr, ctx: &MatchContext) -> Option<Specifier> {
    if !ctx.rewrite_specifiers() {
        return None;
    }
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Ident(ident) = &**callee else {
        return None;
    };
    if &*ident.sym != "require" || !ctx.is_unbound(ident) {
        return None;
    }
    let arg = call.args.first().filter(|arg| arg.spread.is_none())?;
    let Expr::Lit(Lit::Str(s)) = &*arg.expr else {
        return None;
    };
    ctx.pattern().is_match(&s.value).then(|| Specifier {
        text: s.value.to_string(),
        span: arg.expr.span(),
    })
}

/// `import ... from "<kw>(...)"`.
pub fn match_import_specifier(import: &ImportDecl, ctx: &MatchContext) -> Option<Specifier> {
    if !ctx.rewrite_specifiers() {
        return None;
    }
    ctx.pattern().is_match(&import.src.value).then(|| Specifier {
        text: import.src.value.to_string(),
        span: import.src.span,
    })
}
