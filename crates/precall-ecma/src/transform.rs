use std::sync::Arc;

use precall_core::{KeywordSet, PrecallOptions, Result};
use swc_core::common::{Globals, GLOBALS};
use swc_core::ecma::ast::Program;
use swc_core::ecma::parser::Syntax;
use swc_core::ecma::transforms::base::resolver;
use swc_core::ecma::visit::VisitMutWith;
use tracing::debug;

use crate::context::MatchContext;
use crate::host::{self, Host};
use crate::sandbox::{EngineSandbox, Sandbox};
use crate::visitor::PrecallVisitor;

pub type SandboxFactory = Arc<dyn Fn() -> Box<dyn Sandbox> + Send + Sync>;

/// The configured pass. Cheap to clone and safe to share between threads;
/// every file gets its own [`MatchContext`] and sandbox.
#[derive(Clone)]
pub struct Precall {
    keywords: Arc<KeywordSet>,
    options: PrecallOptions,
    sandbox: SandboxFactory,
}

impl Precall {
    pub fn new(options: &PrecallOptions) -> Result<Self> {
        let keywords = Arc::new(KeywordSet::from_option(&options.value)?);
        debug!(keywords = ?keywords.names(), "configured precall keywords");
        Ok(Self {
            keywords,
            options: options.clone(),
            sandbox: Arc::new(|| Box::new(EngineSandbox) as Box<dyn Sandbox>),
        })
    }

    /// Replace the executor used for fragments.
    pub fn with_sandbox<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Sandbox> + Send + Sync + 'static,
    {
        self.sandbox = Arc::new(factory);
        self
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn options(&self) -> &PrecallOptions {
        &self.options
    }

    /// Parse, expand and print one file. On error nothing is returned for the
    /// file.
    pub fn transform_source(&self, source: &str, filename: &str) -> Result<String> {
        GLOBALS.set(&Globals::new(), || {
            let host = Host::new();
            let syntax = host::syntax_for(filename);
            let mut program = host.parse_program(filename, source, syntax)?;
            let ctx = self.context(filename, syntax);
            let expanded = self.transform_program(&mut program, &host, &ctx)?;
            debug!(filename, expanded, "transformed file");
            host.emit(&program)
        })
    }

    /// Build the per-file context. Must run inside `GLOBALS.set`.
    pub fn context(&self, filename: &str, syntax: Syntax) -> MatchContext {
        let fragment_name = self.options.filename.as_deref().unwrap_or(filename);
        MatchContext::new(self.keywords.clone(), fragment_name, syntax)
            .with_specifier_rewrite(self.options.rewrite_specifiers)
    }

    /// Resolve scopes and expand every invocation in `program`. Returns the
    /// number of replacements.
    pub fn transform_program(
        &self,
        program: &mut Program,
        host: &Host,
        ctx: &MatchContext,
    ) -> Result<usize> {
        program.visit_mut_with(&mut resolver(
            ctx.unresolved_mark(),
            ctx.top_level_mark(),
            ctx.is_typescript(),
        ));
        let mut sandbox = (self.sandbox)();
        let mut visitor = PrecallVisitor::new(host, ctx, sandbox.as_mut());
        program.visit_mut_with(&mut visitor);
        visitor.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn pass_can_be_shared_between_threads() {
        assert_send_sync::<Precall>();

        let precall = Precall::new(&PrecallOptions::default()).unwrap();
        let handles: Vec<_> = (0..2)
            .map(|n| {
                let precall = precall.clone();
                std::thread::spawn(move || {
                    precall.transform_source(&format!("x = precall`module.exports = {n}`;"), "a.js")
                })
            })
            .collect();
        for (n, handle) in handles.into_iter().enumerate() {
            let code = handle.join().unwrap().unwrap();
            assert_eq!(code, format!("x = {n};\n"));
        }
    }

}
