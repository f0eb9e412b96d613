use std::fs;

use pretty_assertions::assert_eq;
use precall_cli::expand::{expand_command, ExpandArgs};
use precall_cli::CliError;
use precall_core::{Error, PrecallOptions};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn expands_into_out_dir() {
    let temp = TempDir::new().unwrap();
    let a = write(&temp, "a.js", "const a = precall`module.exports = 1 + 2`;\n");
    let b = write(&temp, "b.ts", "const b: number[] = precall(`module.exports = [1, 2]`);\n");
    let out = temp.path().join("build");

    let written = expand_command(
        ExpandArgs {
            inputs: vec![a, b],
            out_dir: Some(out.clone()),
            ..Default::default()
        },
        &PrecallOptions::default(),
    )
    .unwrap();

    assert_eq!(written, 2);
    let a = fs::read_to_string(out.join("a.js")).unwrap();
    assert!(a.contains("const a = 3;"), "{a}");
    let b = fs::read_to_string(out.join("b.ts")).unwrap();
    assert!(b.contains("const b: number[] = ["), "{b}");
    assert!(!b.contains("precall"), "{b}");
}

#[test]
fn output_file_receives_a_single_input() {
    let temp = TempDir::new().unwrap();
    let input = write(&temp, "in.js", "x = precall`module.exports = 'hi'`;\n");
    let output = temp.path().join("nested").join("out.js");

    expand_command(
        ExpandArgs {
            inputs: vec![input],
            output: Some(output.clone()),
            ..Default::default()
        },
        &PrecallOptions::default(),
    )
    .unwrap();

    let code = fs::read_to_string(output).unwrap();
    assert!(code.contains(r#"x = "hi";"#), "{code}");
}

#[test]
fn output_rejects_several_inputs() {
    let temp = TempDir::new().unwrap();
    let a = write(&temp, "a.js", "1;\n");
    let b = write(&temp, "b.js", "2;\n");

    let err = expand_command(
        ExpandArgs {
            inputs: vec![a, b],
            output: Some(temp.path().join("out.js")),
            ..Default::default()
        },
        &PrecallOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, CliError::InvalidInput(_)), "{err:?}");
}

#[test]
fn value_flags_replace_configured_keywords() {
    let temp = TempDir::new().unwrap();
    let input = write(
        &temp,
        "a.js",
        "a = gen`module.exports = 1`;\nb = precall`module.exports = 2`;\n",
    );
    let out = temp.path().join("out");

    expand_command(
        ExpandArgs {
            inputs: vec![input],
            out_dir: Some(out.clone()),
            values: vec!["gen".to_string()],
            ..Default::default()
        },
        &PrecallOptions::default(),
    )
    .unwrap();

    let code = fs::read_to_string(out.join("a.js")).unwrap();
    assert!(code.contains("a = 1;"), "{code}");
    assert!(code.contains("precall`module.exports = 2`"), "{code}");
}

#[test]
fn config_file_selects_keywords() {
    let temp = TempDir::new().unwrap();
    let config = write(&temp, "precall.toml", "value = [\"gen\"]\nrewrite_specifiers = false\n");
    let input = write(
        &temp,
        "a.js",
        "const m = require(\"gen`module.exports = './m.js'`\");\nconst v = gen`module.exports = true`;\n",
    );
    let out = temp.path().join("out");

    let options = PrecallOptions::load(Some(&config)).unwrap();
    expand_command(
        ExpandArgs {
            inputs: vec![input],
            out_dir: Some(out.clone()),
            ..Default::default()
        },
        &options,
    )
    .unwrap();

    let code = fs::read_to_string(out.join("a.js")).unwrap();
    assert!(code.contains("const v = true;"), "{code}");
    assert!(code.contains("require(\"gen`module.exports = './m.js'`\")"), "{code}");
}

#[test]
fn failures_carry_the_location_and_write_nothing() {
    let temp = TempDir::new().unwrap();
    let input = write(
        &temp,
        "bad.js",
        "const ok = 1;\nconst bad = precall`throw new Error('nope')`;\n",
    );
    let out = temp.path().join("out");

    let err = expand_command(
        ExpandArgs {
            inputs: vec![input],
            out_dir: Some(out.clone()),
            ..Default::default()
        },
        &PrecallOptions::default(),
    )
    .unwrap_err();

    let diagnostic = match err {
        CliError::Expansion(diagnostic) => diagnostic,
        other => panic!("expected an expansion error, found {other:?}"),
    };
    assert!(matches!(diagnostic.error(), Error::Execution { .. }));
    let location = diagnostic.error().location().unwrap();
    assert_eq!((location.line, location.column), (2, 13));
    assert!(!out.join("bad.js").exists());
}

#[test]
fn missing_input_is_an_io_error() {
    let temp = TempDir::new().unwrap();
    let err = expand_command(
        ExpandArgs {
            inputs: vec![temp.path().join("missing.js")],
            out_dir: Some(temp.path().join("out")),
            ..Default::default()
        },
        &PrecallOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CliError::Io(_)), "{err:?}");
}
