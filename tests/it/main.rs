mod subcommands;

use std::fmt::Write;

use argtree::{ArgumentParser, Outcome};
use expect_test::{expect, Expect};

/// Root `app` with `upload` -> `file` and `download` below it.
fn app() -> ArgumentParser {
    let mut p = ArgumentParser::new("app", "Sample tool");
    let root = p.root();
    p.add_option(root, "mode", "testing mode").short('m').long("mode").default("test");
    p.add_option(root, "force", "force do something").short('f').boolean(true);

    let upload = p.add_subcommand(root, "upload", "Upload file to cloud");
    p.add_option(upload, "name", "file name").short('n').long("name");
    p.add_option(upload, "type", "file type").short('t').default("text");

    let file = p.add_subcommand(upload, "file", "Upload a single file");
    p.add_option(file, "len", "length");

    let download = p.add_subcommand(root, "download", "Download file from cloud");
    p.add_option(download, "out", "output file").short('o').default("a.out");
    p
}

fn render(outcome: &Outcome<'_>) -> String {
    let mut buf = String::new();
    writeln!(buf, "{}", outcome.title()).unwrap();
    for (destination, flag) in outcome.context().iter() {
        if flag.is_bool() {
            writeln!(buf, "{destination}: {}", flag.read_bool().unwrap()).unwrap();
        } else {
            writeln!(buf, "{destination}: {:?}", flag.read_string().unwrap()).unwrap();
        }
    }
    buf
}

fn check(build: fn() -> ArgumentParser, args: &str, expect: Expect) {
    let mut parser = build();
    let outcome = parser.parse_args(args.split_ascii_whitespace());
    let actual = match outcome.error() {
        Some(err) => err.to_string(),
        None => render(&outcome),
    };
    expect.assert_eq(&actual);
}

#[test]
fn defaults() {
    check(
        app,
        "",
        expect![[r#"
            root
            force: false
            mode: "test"
        "#]],
    );
}

#[test]
fn long_value_forms_agree() {
    check(
        app,
        "--mode=debug",
        expect![[r#"
            root
            force: false
            mode: "debug"
        "#]],
    );
    check(
        app,
        "--mode debug",
        expect![[r#"
            root
            force: false
            mode: "debug"
        "#]],
    );
    check(
        app,
        "--mode=a=b",
        expect![[r#"
            root
            force: false
            mode: "a=b"
        "#]],
    );
}

#[test]
fn short_value_forms() {
    check(
        app,
        "-m debug",
        expect![[r#"
            root
            force: false
            mode: "debug"
        "#]],
    );
    check(
        app,
        "-mdebug",
        expect![[r#"
            root
            force: false
            mode: "debug"
        "#]],
    );
    check(
        app,
        "-m=debug",
        expect![[r#"
            root
            force: false
            mode: "debug"
        "#]],
    );
}

#[test]
fn value_may_look_like_a_flag() {
    check(
        app,
        "--mode -f",
        expect![[r#"
            root
            force: false
            mode: "-f"
        "#]],
    );
}

#[test]
fn last_occurrence_wins() {
    check(
        app,
        "-m one --mode two",
        expect![[r#"
            root
            force: false
            mode: "two"
        "#]],
    );
}

#[test]
fn errors() {
    check(app, "--bogus", expect!["Unrecognized arguments: --bogus"]);
    check(app, "--bogus=1", expect!["Unrecognized arguments: --bogus"]);
    check(app, "--mode", expect!["Flag needs an argument: --mode"]);
    check(app, "-m", expect!["Flag needs an argument: 'm' in -m"]);
    check(app, "-x", expect!["Unknown short flag: 'x' in -x"]);
    check(app, "-fx", expect!["Unknown short flag: 'x' in -x"]);
    check(app, "---mode", expect!["bad flag syntax: ---mode"]);
    check(app, "--=debug", expect!["bad flag syntax: --=debug"]);
    check(app, "--", expect!["Unsupported argument: `--`"]);
    check(app, "-m debug extra", expect!["Unexpected argument: `extra`"]);
    check(app, "-m debug --bogus -f", expect!["Unrecognized arguments: --bogus"]);
}

fn required() -> ArgumentParser {
    let mut p = ArgumentParser::new("app", "");
    let root = p.root();
    p.add_option(root, "mode", "mode type").short('m').long("mymode").required();
    p
}

#[test]
fn required_option() {
    check(required, "", expect!["Missing required option: '-m/--mymode'"]);
    check(
        required,
        "--mymode debug",
        expect![[r#"
            root
            mode: "debug"
        "#]],
    );
}

#[test]
fn required_with_default_is_satisfied() {
    fn build() -> ArgumentParser {
        let mut p = ArgumentParser::new("app", "");
        let root = p.root();
        p.add_option(root, "file", "file name").required().default("test");
        p
    }
    check(
        build,
        "",
        expect![[r#"
            root
            file: "test"
        "#]],
    );
}

#[test]
fn default_long_form_is_destination() {
    fn build() -> ArgumentParser {
        let mut p = ArgumentParser::new("app", "");
        let root = p.root();
        p.add_option(root, "config", "config file").default("/tmp/config.json");
        p.add_option(root, "level", "level").short('l');
        p
    }
    check(
        build,
        "--config /etc/app.json",
        expect![[r#"
            root
            config: "/etc/app.json"
            level: ""
        "#]],
    );
    check(build, "--level 3", expect!["Unrecognized arguments: --level"]);
}

#[test]
fn reset_allows_reuse() {
    let mut p = app();

    let force = p.parse_args(Vec::<String>::new()).context().get_bool("force").unwrap();
    assert!(!force);

    // The tree remembers the previous run: unset bools flip again.
    let force = p.parse_args(Vec::<String>::new()).context().get_bool("force").unwrap();
    assert!(force);

    p.reset();
    let force = p.parse_args(Vec::<String>::new()).context().get_bool("force").unwrap();
    assert!(!force);

    p.reset();
    let mode = p.parse_args(["-m", "debug"]).context().get_string("mode").unwrap().to_string();
    assert_eq!(mode, "debug");
    p.reset();
    let mode = p.parse_args(Vec::<String>::new()).context().get_string("mode").unwrap().to_string();
    assert_eq!(mode, "test");
}

#[test]
fn context_accessors() {
    let mut p = app();
    let outcome = p.parse_args(["upload", "-n", "readme.md"]);
    let cx = outcome.context();
    assert!(cx.contains("mode"));
    assert!(!cx.contains("out"));
    assert_eq!(cx.get_string("name").unwrap(), "readme.md");
    assert_eq!(cx.get_string("out").unwrap_err().to_string(), "Unknown option: `out`");
    assert_eq!(
        cx.get_bool("name").unwrap_err().to_string(),
        "Option `name` does not hold a bool value"
    );
}

#[test]
fn os_args() {
    let mut p = app();
    let args = ["upload", "--name", "readme.md"].map(std::ffi::OsString::from);
    let outcome = p.parse_args_os(args);
    assert!(outcome.error().is_none());
    assert_eq!(outcome.context().get_string("name").unwrap(), "readme.md");
}

#[cfg(unix)]
#[test]
fn non_utf8_argument_is_rejected() {
    use std::{ffi::OsString, os::unix::ffi::OsStringExt};

    let mut p = app();
    let args = vec![
        OsString::from("download"),
        OsString::from("--out"),
        OsString::from_vec(vec![b'a', 0xff, b'b']),
    ];
    let outcome = p.parse_args_os(args);
    assert_eq!(outcome.command(), None);
    assert!(matches!(outcome.error(), Some(argtree::Error::NonUtf8Argument(_))));
    assert!(outcome
        .error()
        .unwrap()
        .to_string()
        .starts_with("Can't parse argument, invalid utf8: "));
}
