use precall_core::{Error, Result};
use swc_core::common::Span;
use swc_core::ecma::ast::{CallExpr, Expr, ImportDecl};
use swc_core::ecma::visit::{VisitMut, VisitMutWith};
use tracing::debug;

use crate::context::MatchContext;
use crate::host::Host;
use crate::matcher::{self, Invocation, Specifier};
use crate::replace;
use crate::sandbox::{self, Sandbox};
use crate::serialize;

/// Expands every invocation in one file.
///
/// `VisitMut` cannot return errors, so the first failure is stored and every
/// later node is skipped; [`PrecallVisitor::finish`] hands it back.
pub struct PrecallVisitor<'a> {
    host: &'a Host,
    ctx: &'a MatchContext,
    sandbox: &'a mut dyn Sandbox,
    error: Option<Error>,
    expanded: usize,
}

impl<'a> PrecallVisitor<'a> {
    pub fn new(host: &'a Host, ctx: &'a MatchContext, sandbox: &'a mut dyn Sandbox) -> Self {
        Self {
            host,
            ctx,
            sandbox,
            error: None,
            expanded: 0,
        }
    }

    /// The first error, or the number of invocations replaced.
    pub fn finish(self) -> Result<usize> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.expanded),
        }
    }

    fn expand(&mut self, invocation: &Invocation) -> Result<Box<Expr>> {
        let location = self.host.location(invocation.span);
        debug!(
            keyword = %invocation.keyword,
            form = %invocation.form,
            location = ?location,
            "expanding invocation"
        );
        let filename = self.ctx.filename();
        let result = sandbox::evaluate(&mut *self.sandbox, &invocation.literal, filename)
            .map_err(|err| err.at(location))?;
        let replacement = serialize::to_expr(result, invocation.span, self.host, filename)
            .map_err(|err| err.at(location))?;
        self.expanded += 1;
        Ok(replacement)
    }

    /// Re-parse specifier text and expand the invocations inside it.
    fn expand_specifier(&mut self, specifier: &Specifier) -> Result<Box<Expr>> {
        let location = self.host.location(specifier.span);
        debug!(text = %specifier.text, location = ?location, "rewriting specifier");
        let mut expr = self
            .host
            .parse_expr(self.ctx.filename(), &specifier.text)
            .map_err(|err| err.at(location))?;
        expr.visit_mut_with(self);
        if let Some(err) = self.error.take() {
            return Err(err.at(location));
        }
        Ok(expr)
    }

    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn location(&self, span: Span) -> Option<precall_core::SourceLocation> {
        self.host.location(span)
    }
}

impl VisitMut for PrecallVisitor<'_> {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if self.error.is_some() {
            return;
        }
        let Some(invocation) = matcher::match_invocation(expr, self.ctx) else {
            expr.visit_mut_children_with(self);
            return;
        };
        // the replacement is not visited again
        match self.expand(&invocation) {
            Ok(replacement) => replace::replace_expr(expr, replacement),
            Err(err) => self.fail(err),
        }
    }

    fn visit_mut_call_expr(&mut self, call: &mut CallExpr) {
        if self.error.is_some() {
            return;
        }
        let Some(specifier) = matcher::match_require_specifier(call, self.ctx) else {
            call.visit_mut_children_with(self);
            return;
        };
        let replacement = match self.expand_specifier(&specifier) {
            Ok(replacement) => replacement,
            Err(err) => {
                self.fail(err);
                return;
            }
        };
        replace::replace_argument(&mut call.args[0], replacement);
        call.callee.visit_mut_with(self);
        for arg in call.args.iter_mut().skip(1) {
            arg.visit_mut_with(self);
        }
    }

    fn visit_mut_import_decl(&mut self, import: &mut ImportDecl) {
        if self.error.is_some() {
            return;
        }
        let Some(specifier) = matcher::match_import_specifier(import, self.ctx) else {
            import.visit_mut_children_with(self);
            return;
        };
        let location = self.location(specifier.span);
        let result = self.expand_specifier(&specifier).and_then(|replacement| {
            replace::replace_import_source(import, replacement, self.ctx.filename(), location)
        });
        if let Err(err) = result {
            self.fail(err);
        }
    }
}
