use std::sync::Arc;

use precall_core::{KeywordSet, MatchPattern};
use swc_core::common::{Mark, SyntaxContext};
use swc_core::ecma::ast::Ident;
use swc_core::ecma::parser::Syntax;

pub const DEFAULT_FILENAME: &str = "anonymous.js";

/// Per-file matching state. Created before a file is traversed and dropped
/// with it.
#[derive(Debug, Clone)]
pub struct MatchContext {
    keywords: Arc<KeywordSet>,
    filename: String,
    syntax: Syntax,
    rewrite_specifiers: bool,
    unresolved_mark: Mark,
    top_level_mark: Mark,
}

impl MatchContext {
    /// Must be called inside `GLOBALS.set`, since it allocates scope marks.
    pub fn new(keywords: Arc<KeywordSet>, filename: &str, syntax: Syntax) -> Self {
        let filename = if filename.is_empty() {
            DEFAULT_FILENAME.to_string()
        } else {
            filename.to_string()
        };
        Self {
            keywords,
            filename,
            syntax,
            rewrite_specifiers: true,
            unresolved_mark: Mark::new(),
            top_level_mark: Mark::new(),
        }
    }

    pub fn with_specifier_rewrite(mut self, enabled: bool) -> Self {
        self.rewrite_specifiers = enabled;
        self
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn pattern(&self) -> &MatchPattern {
        self.keywords.pattern()
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn is_typescript(&self) -> bool {
        self.syntax.typescript()
    }

    pub fn rewrite_specifiers(&self) -> bool {
        self.rewrite_specifiers
    }

    pub fn unresolved_mark(&self) -> Mark {
        self.unresolved_mark
    }

    pub fn top_level_mark(&self) -> Mark {
        self.top_level_mark
    }

    /// True when no enclosing scope declares `ident`. Identifiers the resolver
    /// never saw (nodes synthesized during the pass) count as unbound.
    pub fn is_unbound(&self, ident: &Ident) -> bool {
        ident.ctxt == SyntaxContext::empty() || ident.ctxt.outer() == self.unresolved_mark
    }

    /// `ident` names a configured keyword and is not shadowed.
    pub fn is_keyword(&self, ident: &Ident) -> bool {
        self.keywords.contains(&ident.sym) && self.is_unbound(ident)
    }
}
