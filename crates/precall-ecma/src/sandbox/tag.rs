//! Remembering the printed definition of every function and class in a
//! fragment.
//!
//! The engine cannot give back the source text of a function it compiled, so
//! each definition is printed before execution and wrapped in a call to
//! [`SOURCE_TAG`], which marks the runtime object with the index of its
//! printed text.

use precall_core::{Error, Result};
use swc_core::common::util::take::Take;
use swc_core::common::{SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::{
    CallExpr, Callee, Decl, Expr, ExprOrSpread, ExprStmt, Ident, Lit, Number, Script, Stmt,
};
use swc_core::ecma::codegen::Node;
use swc_core::ecma::visit::{VisitMut, VisitMutWith};

use crate::host::Host;

/// Name of the wrapper parameter bound to the tagging function.
pub const SOURCE_TAG: &str = "__precall_source";

/// Tag every function and class in `script`. Returns the printed
/// definitions, indexed by tag.
pub fn tag_sources(host: &Host, script: &mut Script) -> Result<Vec<String>> {
    let mut tagger = SourceTagger {
        host,
        sources: Vec::new(),
        error: None,
    };
    script.visit_mut_with(&mut tagger);
    match tagger.error {
        Some(err) => Err(err),
        None => Ok(tagger.sources),
    }
}

struct SourceTagger<'a> {
    host: &'a Host,
    sources: Vec<String>,
    error: Option<Error>,
}

impl SourceTagger<'_> {
    fn record<N: Node>(&mut self, node: &N) -> Option<usize> {
        match self.host.emit_node(node) {
            Ok(source) => {
                self.sources.push(source.trim_end().to_string());
                Some(self.sources.len() - 1)
            }
            Err(err) => {
                self.error.get_or_insert(err);
                None
            }
        }
    }
}

impl VisitMut for SourceTagger<'_> {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if !matches!(expr, Expr::Fn(_) | Expr::Arrow(_) | Expr::Class(_)) {
            expr.visit_mut_children_with(self);
            return;
        }
        // printed before inner definitions get wrapped
        let id = self.record(&*expr);
        expr.visit_mut_children_with(self);
        if let Some(id) = id {
            let definition = expr.take();
            *expr = tag_call(definition, id);
        }
    }

    fn visit_mut_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        let ids: Vec<Option<usize>> = stmts
            .iter()
            .map(|stmt| match stmt {
                Stmt::Decl(Decl::Fn(_) | Decl::Class(_)) => self.record(stmt),
                _ => None,
            })
            .collect();
        stmts.visit_mut_children_with(self);

        let mut hoisted = Vec::new();
        let mut body = Vec::with_capacity(stmts.len());
        for (stmt, id) in stmts.drain(..).zip(ids) {
            let after = match (&stmt, id) {
                // declarations are hoisted, so their tag goes first
                (Stmt::Decl(Decl::Fn(decl)), Some(id)) => {
                    hoisted.push(tag_stmt(decl.ident.clone(), id));
                    None
                }
                (Stmt::Decl(Decl::Class(decl)), Some(id)) => Some(tag_stmt(decl.ident.clone(), id)),
                _ => None,
            };
            body.push(stmt);
            body.extend(after);
        }
        let directives = body.iter().take_while(|stmt| is_directive(stmt)).count();
        let rest = body.split_off(directives);
        body.extend(hoisted);
        body.extend(rest);
        *stmts = body;
    }
}

fn is_directive(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::Expr(ExprStmt { expr, .. }) if matches!(&**expr, Expr::Lit(Lit::Str(_))))
}

fn tag_call(definition: Expr, id: usize) -> Expr {
    Expr::Call(CallExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        callee: Callee::Expr(Box::new(Expr::Ident(Ident::new(
            SOURCE_TAG.into(),
            DUMMY_SP,
            SyntaxContext::empty(),
        )))),
        args: vec![
            ExprOrSpread {
                spread: None,
                expr: Box::new(definition),
            },
            ExprOrSpread {
                spread: None,
                expr: Box::new(Expr::Lit(Lit::Num(Number {
                    span: DUMMY_SP,
                    value: id as f64,
                    raw: None,
                }))),
            },
        ],
        type_args: None,
    })
}

fn tag_stmt(ident: Ident, id: usize) -> Stmt {
    Stmt::Expr(ExprStmt {
        span: DUMMY_SP,
        expr: Box::new(tag_call(Expr::Ident(ident), id)),
    })
}
