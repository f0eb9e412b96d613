use precall_core::{Error, Result};
use swc_core::common::{Span, SyntaxContext};
use swc_core::ecma::ast::{
    AssignExpr, AssignOp, AssignTarget, DefaultDecl, Expr, ExprStmt, Ident, IdentName,
    MemberExpr, MemberProp, ModuleDecl, ModuleItem, Program, Script, SimpleAssignTarget, Stmt,
};
use swc_core::ecma::parser::{EsSyntax, Syntax};
use tracing::trace;

use crate::host::Host;
use crate::sandbox::tag::tag_sources;

/// Script text ready to be run by a [`Sandbox`](super::Sandbox).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    pub filename: String,
    pub code: String,
    /// Printed function and class definitions, indexed by source tag
    pub sources: Vec<String>,
}

/// Compile fragment source into a standalone CommonJS-style script.
///
/// `export default` is rewritten to an assignment to `module.exports`; any
/// other module declaration is rejected since fragments cannot load modules.
pub fn compile(source: &str, filename: &str) -> Result<CompiledUnit> {
    let host = Host::new();
    let syntax = Syntax::Es(EsSyntax::default());
    let program = host
        .parse_program(filename, source, syntax)
        .map_err(|err| match err {
            Error::Parse {
                filename,
                message,
                location,
            } => Error::compile(
                filename,
                match location {
                    Some(loc) => format!("{message} (fragment {loc})"),
                    None => message,
                },
            ),
            other => other,
        })?;

    let mut script = match program {
        Program::Script(script) => script,
        Program::Module(module) => Script {
            span: module.span,
            body: module
                .body
                .into_iter()
                .map(|item| lower_item(item, filename))
                .collect::<Result<Vec<_>>>()?,
            shebang: module.shebang,
        },
    };

    let sources = tag_sources(&host, &mut script)?;
    let code = host.emit(&Program::Script(script))?;
    trace!(filename, %code, definitions = sources.len(), "compiled fragment");
    Ok(CompiledUnit {
        filename: filename.to_string(),
        code,
        sources,
    })
}

fn lower_item(item: ModuleItem, filename: &str) -> Result<Stmt> {
    let decl = match item {
        ModuleItem::Stmt(stmt) => return Ok(stmt),
        ModuleItem::ModuleDecl(decl) => decl,
    };
    match decl {
        ModuleDecl::ExportDefaultExpr(export) => Ok(assign_exports(export.span, export.expr)),
        ModuleDecl::ExportDefaultDecl(export) => match export.decl {
            DefaultDecl::Fn(function) => Ok(assign_exports(export.span, Box::new(Expr::Fn(function)))),
            DefaultDecl::Class(class) => Ok(assign_exports(export.span, Box::new(Expr::Class(class)))),
            DefaultDecl::TsInterfaceDecl(_) => Err(Error::compile(
                filename,
                "interface declarations are not supported in fragments",
            )),
        },
        ModuleDecl::Import(_) => Err(Error::compile(
            filename,
            "import declarations are not supported in fragments",
        )),
        _ => Err(Error::compile(
            filename,
            "only `export default` is supported in fragments; assign `module.exports` instead",
        )),
    }
}

fn assign_exports(span: Span, value: Box<Expr>) -> Stmt {
    let target = MemberExpr {
        span,
        obj: Box::new(Expr::Ident(Ident::new(
            "module".into(),
            span,
            SyntaxContext::empty(),
        ))),
        prop: MemberProp::Ident(IdentName::new("exports".into(), span)),
    };
    Stmt::Expr(ExprStmt {
        span,
        expr: Box::new(Expr::Assign(AssignExpr {
            span,
            op: AssignOp::Assign,
            left: AssignTarget::Simple(SimpleAssignTarget::Member(target)),
            right: value,
        })),
    })
}
