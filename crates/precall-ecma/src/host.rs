//! Parser, printer and source map the pass runs against.

use std::path::Path;

use precall_core::{Error, Result, SourceLocation};
use swc_core::common::input::StringInput;
use swc_core::common::comments::SingleThreadedComments;
use swc_core::common::{sync::Lrc, FileName, SourceMap, Span, Spanned};
use swc_core::ecma::ast::{EsVersion, Expr, Program, Stmt};
use swc_core::ecma::codegen::text_writer::JsWriter;
use swc_core::ecma::codegen::{Config, Emitter, Node};
use swc_core::ecma::parser::error::Error as SwcError;
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::{EsSyntax, Parser, Syntax, TsSyntax};

/// Pick the parser configuration from the file extension.
pub fn syntax_for(filename: &str) -> Syntax {
    let ext = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "ts" | "mts" | "cts" => Syntax::Typescript(TsSyntax {
            decorators: true,
            ..Default::default()
        }),
        "tsx" => Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        }),
    }
}

/// Owns the source map and comments shared by everything parsed while
/// transforming one file.
#[derive(Clone, Default)]
pub struct Host {
    cm: Lrc<SourceMap>,
    comments: SingleThreadedComments,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_map(&self) -> &Lrc<SourceMap> {
        &self.cm
    }

    /// Parse a whole file. Recovered errors are treated like fatal ones.
    pub fn parse_program(&self, filename: &str, source: &str, syntax: Syntax) -> Result<Program> {
        let (program, errors) = self.parse_program_internal(filename, source, syntax);
        match (program, errors.into_iter().next()) {
            (Some(program), None) => Ok(program),
            (_, Some(err)) => Err(Error::Parse {
                filename: filename.to_string(),
                message: err.kind().msg().to_string(),
                location: self.location(err.span()),
            }),
            (None, None) => Err(Error::Parse {
                filename: filename.to_string(),
                message: "parser produced no program".to_string(),
                location: None,
            }),
        }
    }

    /// Parse `source` as one standalone expression.
    ///
    /// The text is parenthesized before parsing so that declarations such as
    /// `function f() {}` or `class A {}` come back as expressions.
    pub fn parse_expr(&self, filename: &str, source: &str) -> Result<Box<Expr>> {
        let wrapped = format!("(\n{source}\n)");
        let compile_error = |message: String, location| Error::Compile {
            filename: filename.to_string(),
            message,
            location,
        };
        let (program, errors) =
            self.parse_program_internal(filename, &wrapped, Syntax::Es(EsSyntax::default()));
        if let Some(err) = errors.into_iter().next() {
            return Err(compile_error(
                format!("`{}` is not an expression: {}", source.trim(), err.kind().msg()),
                None,
            ));
        }
        let body = match program {
            Some(Program::Script(script)) => script.body,
            Some(Program::Module(_)) | None => {
                return Err(compile_error(
                    format!("`{}` is not an expression", source.trim()),
                    None,
                ))
            }
        };
        match <[Stmt; 1]>::try_from(body) {
            Ok([Stmt::Expr(stmt)]) => match *stmt.expr {
                Expr::Paren(paren) => Ok(paren.expr),
                other => Ok(Box::new(other)),
            },
            _ => Err(compile_error(
                format!("`{}` is not a single expression", source.trim()),
                None,
            )),
        }
    }

    fn parse_program_internal(
        &self,
        filename: &str,
        source: &str,
        syntax: Syntax,
    ) -> (Option<Program>, Vec<SwcError>) {
        let fm = self.cm.new_source_file(
            FileName::Custom(filename.to_string()).into(),
            source.to_string(),
        );
        let lexer = Lexer::new(
            syntax,
            EsVersion::EsNext,
            StringInput::from(&*fm),
            Some(&self.comments),
        );
        let mut parser = Parser::new_from(lexer);

        let program = parser.parse_program();
        let mut parse_errors = parser.take_errors();
        let program = match program {
            Ok(program) => Some(program),
            Err(err) => {
                parse_errors.insert(0, err);
                None
            }
        };
        (program, parse_errors)
    }

    pub fn emit(&self, program: &Program) -> Result<String> {
        self.emit_node(program)
    }

    /// Print any node, with the comments collected while parsing.
    pub fn emit_node<N: Node>(&self, node: &N) -> Result<String> {
        let mut buf = Vec::new();
        {
            let mut emitter = Emitter {
                cfg: Config::default(),
                cm: self.cm.clone(),
                comments: Some(&self.comments),
                wr: JsWriter::new(self.cm.clone(), "\n", &mut buf, None),
            };
            node.emit_with(&mut emitter)
                .map_err(|e| Error::Emit(e.to_string()))?;
        }
        String::from_utf8(buf).map_err(|e| Error::Emit(e.to_string()))
    }

    /// Line/column of the start of `span`, if it points into a parsed file.
    pub fn location(&self, span: Span) -> Option<SourceLocation> {
        if span.is_dummy() {
            return None;
        }
        let loc = self.cm.lookup_char_pos(span.lo());
        Some(SourceLocation::new(loc.line, loc.col_display + 1))
    }
}
