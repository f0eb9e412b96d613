use pretty_assertions::assert_eq;
use precall_ecma::{Error, PrecallOptions};

mod support;
use support::{expand, expand_with, normalize, normalize_ts};

#[test]
fn call_with_template_expands_to_number() {
    let output = expand("const n = precall(`module.exports=1555`);").unwrap();
    assert_eq!(output, normalize("const n = 1555;"));
}

#[test]
fn tag_expands_to_object_literal() {
    let output = expand("const o = precall`module.exports={a:1}`;").unwrap();
    assert_eq!(output, normalize(r#"const o = {"a": 1};"#));
}

#[test]
fn call_with_string_argument() {
    let output = expand(r#"const list = precall("module.exports=[1, 'two', null]");"#).unwrap();
    assert_eq!(output, normalize(r#"const list = [1, "two", null];"#));
}

#[test]
fn undefined_export_in_both_forms() {
    let output = expand(
        "const a = precall(`module.exports=undefined`);\nconst b = precall`module.exports=undefined`;",
    )
    .unwrap();
    assert_eq!(output, normalize("const a = undefined;\nconst b = undefined;"));
}

#[test]
fn missing_or_unsupported_argument_is_undefined() {
    let output = expand("f(precall(), precall(code), precall``);").unwrap();
    assert_eq!(output, normalize("f(undefined, undefined, undefined);"));
}

#[test]
fn exported_function_is_spliced_as_source() {
    let output =
        expand("const add = precall`module.exports = function add(a, b) { return a + b; }`;")
            .unwrap();
    assert_eq!(
        output,
        normalize("const add = (function add(a, b) { return a + b; });")
    );
}

#[test]
fn exported_arrow_function_is_spliced_as_source() {
    let output = expand("const mul = precall`module.exports = (a, b) => a * b`;").unwrap();
    assert_eq!(output, normalize("const mul = ((a, b) => a * b);"));
}

#[test]
fn exported_class_is_spliced_as_source() {
    let output = expand(
        "const Point = precall`module.exports = class Point { constructor(x) { this.x = x; } }`;",
    )
    .unwrap();
    assert_eq!(
        output,
        normalize("const Point = (class Point { constructor(x) { this.x = x; } });")
    );
}

#[test]
fn exported_declaration_is_spliced_as_source() {
    let output = expand(
        "const twice = precall`function twice(n) { return n * 2; }\nmodule.exports = twice;`;",
    )
    .unwrap();
    assert_eq!(
        output,
        normalize("const twice = (function twice(n) { return n * 2; });")
    );
}

#[test]
fn lone_surrogates_are_kept_as_escapes() {
    let output = expand(r"const s = precall`module.exports = '\uD800'`;").unwrap();
    assert_eq!(output, "const s = \"\\ud800\";\n");
}

#[test]
fn comments_outside_invocations_survive() {
    let output = expand(
        "// license header\n/** doc */\nconst a = precall`module.exports=1`; // trailing\nimport(/* webpackChunkName: \"x\" */ './x');\n",
    )
    .unwrap();
    assert!(output.contains("const a = 1;"), "{output}");
    for comment in ["// license header", "/** doc */", "// trailing", "/* webpackChunkName: \"x\" */"] {
        assert!(output.contains(comment), "{comment} missing from {output}");
    }
}

#[test]
fn export_default_is_accepted() {
    let output = expand("const v = precall`export default [1, 2].map(x => x * 2)`;").unwrap();
    assert_eq!(output, normalize("const v = [2, 4];"));
}

#[test]
fn interpolation_only_keeps_first_static_chunk() {
    let output = expand("const v = precall`module.exports=7;${ignored}`;").unwrap();
    assert_eq!(output, normalize("const v = 7;"));

    // the text before `${` is all the fragment sees
    let err = expand("const v = precall`module.exports=${x}`;").unwrap_err();
    assert!(matches!(err, Error::Compile { .. }), "{err}");
}

#[test]
fn fragments_are_full_programs() {
    let output = expand(
        "const table = precall`
            const squares = [];
            for (let i = 1; i <= 3; i++) squares.push(i * i);
            module.exports = { squares, total: squares.reduce((a, b) => a + b, 0) };
        `;",
    )
    .unwrap();
    assert_eq!(
        output,
        normalize(r#"const table = {"squares": [1, 4, 9], "total": 14};"#)
    );
}

#[test]
fn configured_keywords_replace_the_default() {
    let options = PrecallOptions::default().with_keywords(["gen", "build"]);
    let output = expand_with(
        &options,
        "a(gen`module.exports=1`, build(`module.exports=2`), precall`module.exports=3`);",
        "input.js",
    )
    .unwrap();
    assert_eq!(output, normalize("a(1, 2, precall`module.exports=3`);"));
}

#[test]
fn typescript_sources_are_supported() {
    let output = expand_with(
        &PrecallOptions::default(),
        "const limit: number = precall`module.exports = 2 ** 10`;",
        "input.ts",
    )
    .unwrap();
    assert_eq!(output, normalize_ts("const limit: number = 1024;"));
}

#[test]
fn second_pass_changes_nothing() {
    let source = "const a = precall`module.exports={x:[1,2]}`;\nconst b = precall(`module.exports=undefined`);\nfunction f(precall) { return precall`y`; }";
    let once = expand(source).unwrap();
    let twice = expand(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn syntax_error_in_fragment_is_fatal() {
    let err = expand("const ok = precall`module.exports=1`;\nconst bad = precall(`module.exports=(`);")
        .unwrap_err();
    match err {
        Error::Compile {
            filename, location, ..
        } => {
            assert_eq!(filename, "input.js");
            assert_eq!(location.map(|loc| loc.line), Some(2));
        }
        other => panic!("expected compile error, found {other:?}"),
    }
}

#[test]
fn runtime_error_in_fragment_is_fatal() {
    let err = expand("const v = precall`throw new RangeError('out of range')`;").unwrap_err();
    match err {
        Error::Execution { message, location, .. } => {
            assert!(message.contains("out of range"), "{message}");
            assert_eq!(location.map(|loc| (loc.line, loc.column)), Some((1, 11)));
        }
        other => panic!("expected execution error, found {other:?}"),
    }
}

#[test]
fn unserializable_export_is_fatal() {
    let err = expand("const v = precall`module.exports = 10n`;").unwrap_err();
    match err {
        Error::Serialization { type_name, .. } => assert_eq!(type_name, "bigint"),
        other => panic!("expected serialization error, found {other:?}"),
    }
}

#[test]
fn fragments_do_not_share_state() {
    let output = expand(
        "const a = precall`globalThis.count = (globalThis.count || 0) + 1; module.exports = globalThis.count`;\n\
         const b = precall`globalThis.count = (globalThis.count || 0) + 1; module.exports = globalThis.count`;",
    )
    .unwrap();
    assert_eq!(output, normalize("const a = 1;\nconst b = 1;"));
}

#[test]
fn fragment_filename_can_be_overridden() {
    let options = PrecallOptions {
        filename: Some("virtual/fragment.js".into()),
        ..PrecallOptions::default()
    };
    let output = expand_with(
        &options,
        "const f = precall`module.exports = __filename`;",
        "src/input.js",
    )
    .unwrap();
    assert_eq!(output, normalize(r#"const f = "virtual/fragment.js";"#));
}

#[test]
fn non_ascii_keyword_is_a_config_error() {
    let options = PrecallOptions::default().with_keywords(["précall"]);
    let err = expand_with(&options, "x;", "input.js").unwrap_err();
    assert!(matches!(err, Error::Config(_)), "{err:?}");
}

#[test]
fn empty_keyword_list_is_a_config_error() {
    let options = PrecallOptions::default().with_keywords(Vec::<String>::new());
    let err = expand_with(&options, "precall`x`", "input.js").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
