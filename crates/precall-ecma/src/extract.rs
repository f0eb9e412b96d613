use swc_core::ecma::ast::{Expr, ExprOrSpread, Lit, Tpl};

/// Text of a template literal's first static chunk. Anything from the first
/// `${` on is dropped.
pub fn extract_template(tpl: &Tpl) -> String {
    tpl.quasis
        .first()
        .map(|quasi| quasi.raw.to_string())
        .unwrap_or_default()
}

/// Text of a call argument. Absent, spread and non-literal arguments yield an
/// empty string, which the caller expands to `undefined`.
pub fn extract_argument(arg: Option<&ExprOrSpread>) -> String {
    match arg {
        Some(ExprOrSpread { spread: None, expr }) => extract_expr(expr),
        _ => String::new(),
    }
}

fn extract_expr(expr: &Expr) -> String {
    match expr {
        Expr::Tpl(tpl) => extract_template(tpl),
        Expr::Lit(Lit::Str(s)) => s.value.to_string(),
        _ => String::new(),
    }
}
