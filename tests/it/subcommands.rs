use argtree::ArgumentParser;
use expect_test::expect;

use crate::{app, check};

#[test]
fn resolves_nested_command() {
    check(
        app,
        "upload file --len=178",
        expect![[r#"
            file
            force: false
            len: "178"
            mode: "test"
            name: ""
            type: "text"
        "#]],
    );
}

#[test]
fn ancestor_flags_bind_from_descendant() {
    check(
        app,
        "upload file -m debug --name readme.md -t bin --len 178 -f",
        expect![[r#"
            file
            force: true
            len: "178"
            mode: "debug"
            name: "readme.md"
            type: "bin"
        "#]],
    );
    check(
        app,
        "upload file --mode=debug -fn readme.md",
        expect![[r#"
            file
            force: true
            len: ""
            mode: "debug"
            name: "readme.md"
            type: "text"
        "#]],
    );
}

#[test]
fn sibling_flags_are_not_visible() {
    check(app, "download -n readme.md", expect!["Unknown short flag: 'n' in -n"]);
    check(app, "upload --out x", expect!["Unrecognized arguments: --out"]);
    check(app, "-o x", expect!["Unknown short flag: 'o' in -o"]);
    check(
        app,
        "download -o b.out",
        expect![[r#"
            download
            force: false
            mode: "test"
            out: "b.out"
        "#]],
    );
}

#[test]
fn unknown_commands() {
    check(app, "uploadx", expect!["Unknown command: `uploadx`"]);
    check(app, "upload file extra", expect!["Unknown command: `extra`"]);
    check(app, "upload uploadx --len=1", expect!["Unknown command: `uploadx`"]);
    check(app, "-", expect!["Unknown command: `-`"]);
}

#[test]
fn flags_before_command_are_not_commands() {
    check(app, "-m debug upload", expect!["Unexpected argument: `upload`"]);
}

#[test]
fn descendant_option_shadows_ancestor_destination() {
    fn build() -> ArgumentParser {
        let mut p = ArgumentParser::new("app", "");
        let root = p.root();
        p.add_option(root, "path", "root path").long("root-path").default("/");
        let sub = p.add_subcommand(root, "sub", "");
        p.add_option(sub, "path", "sub path").long("sub-path").default("/sub");
        p
    }
    check(
        build,
        "sub --root-path /r",
        expect![[r#"
            sub
            path: "/sub"
        "#]],
    );
    check(
        build,
        "sub --sub-path /s",
        expect![[r#"
            sub
            path: "/s"
        "#]],
    );
}

#[test]
fn unrelated_required_option_fails_validation() {
    fn build() -> ArgumentParser {
        let mut p = ArgumentParser::new("app", "");
        let root = p.root();
        let upload = p.add_subcommand(root, "upload", "");
        p.add_option(upload, "file", "file name").default("test");
        let download = p.add_subcommand(root, "download", "");
        p.add_option(download, "out", "file name").required();
        p
    }
    check(build, "upload --file a.txt", expect!["Missing required option: '--out'"]);
    check(
        build,
        "download --out b.txt",
        expect![[r#"
            download
            out: "b.txt"
        "#]],
    );
}
