use esmfix::config::{Config, Settings};
use esmfix::errors::RewriteError;
use esmfix::runner::{Runner, run};
use std::fs;
use std::path::{Path, PathBuf};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("esmfix_run_{}_{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create dir");
    dir
}

fn write(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, text).expect("write file");
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}

#[test]
fn rewrites_a_whole_tree() {
    let dir = scratch("tree");
    write(&dir.join("a.ts"), "import { x } from './b';\n");
    write(&dir.join("b.ts"), "export { y } from './lib';\n");
    write(&dir.join("lib/index.ts"), "export const y = 1;\n");
    write(&dir.join("lib/c.js"), "import { b } from '../b';\n");
    write(&dir.join("notes.md"), "import { x } from './b';\n");

    let summary = run(&dir, &Config::default()).expect("run should succeed");

    assert_eq!(read(&dir.join("a.ts")), "import { x } from './b.js';\n");
    assert_eq!(read(&dir.join("b.ts")), "export { y } from './lib/index.js';\n");
    assert_eq!(read(&dir.join("lib/c.js")), "import { b } from '../b.js';\n");
    assert_eq!(read(&dir.join("notes.md")), "import { x } from './b';\n");

    assert_eq!(summary.files_visited, 5);
    assert_eq!(summary.files_accepted, 4);
    assert_eq!(summary.files_changed(), 3);
    assert_eq!(summary.specifiers_rewritten, 3);
}

#[test]
fn node_modules_are_left_alone() {
    let dir = scratch("node_modules");
    let vendored = dir.join("node_modules/pkg/index.js");
    write(&vendored, "export { a } from './a';\n");
    write(&dir.join("node_modules/pkg/a.js"), "");

    let summary = run(&dir, &Config::default()).expect("run should succeed");

    assert_eq!(read(&vendored), "export { a } from './a';\n");
    assert_eq!(summary.files_accepted, 0);
}

#[test]
fn second_run_changes_nothing() {
    let dir = scratch("twice");
    write(&dir.join("a.ts"), "import { x } from './b';\nimport { y } from './sub';\n");
    write(&dir.join("b.ts"), "");
    write(&dir.join("sub/index.js"), "");

    let first = run(&dir, &Config::default()).expect("first run");
    let second = run(&dir, &Config::default()).expect("second run");

    assert_eq!(first.specifiers_rewritten, 2);
    assert_eq!(second.files_changed(), 0);
    assert_eq!(
        read(&dir.join("a.ts")),
        "import { x } from './b.js';\nimport { y } from './sub/index.js';\n"
    );
}

#[test]
fn dry_run_reports_without_writing() {
    let dir = scratch("dry_run");
    let a = dir.join("a.ts");
    write(&a, "import { x } from './b';\n");
    write(&dir.join("b.ts"), "");

    let summary = Runner::new(Config::default())
        .dry_run(true)
        .run(&dir)
        .expect("dry run should succeed");

    assert_eq!(summary.changed, vec![a.clone()]);
    assert_eq!(read(&a), "import { x } from './b';\n");
}

#[test]
fn custom_source_filter_limits_files() {
    let dir = scratch("source_filter");
    write(&dir.join("a.ts"), "import { x } from './b';\n");
    write(&dir.join("c.js"), "import { x } from './b';\n");
    write(&dir.join("b.ts"), "");

    let config = Config::default().with_source_file_filter(|path| path.ends_with(".js"));
    run(&dir, &config).expect("run should succeed");

    assert_eq!(read(&dir.join("a.ts")), "import { x } from './b';\n");
    assert_eq!(read(&dir.join("c.js")), "import { x } from './b.js';\n");
}

#[test]
fn settings_drive_the_run() {
    let dir = scratch("settings");
    write(&dir.join("a.mjs"), "import { x } from '~/b';\nimport { y } from './b';\n");
    write(&dir.join("vendor/v.mjs"), "import { y } from '../b';\n");
    write(&dir.join("b.ts"), "");

    let settings_path = dir.join("esmfix.json");
    write(
        &settings_path,
        r#"{ "sourceExtensions": ["mjs"], "excludeDirs": ["vendor"], "ignorePrefixes": ["~"] }"#,
    );
    let config = Settings::load(&settings_path)
        .expect("settings should load")
        .into_config();

    run(&dir, &config).expect("run should succeed");

    assert_eq!(
        read(&dir.join("a.mjs")),
        "import { x } from '~/b';\nimport { y } from './b.js';\n"
    );
    assert_eq!(read(&dir.join("vendor/v.mjs")), "import { y } from '../b';\n");
}

#[test]
fn bad_settings_are_reported() {
    let dir = scratch("bad_settings");
    let settings_path = dir.join("esmfix.json");
    write(&settings_path, r#"{ "excludeDirs": "vendor" }"#);

    let err = Settings::load(&settings_path).expect_err("settings should not parse");
    assert!(matches!(err, esmfix::errors::ConfigError::Parse { .. }));

    let missing = Settings::load(dir.join("absent.json")).expect_err("missing settings");
    assert!(matches!(missing, esmfix::errors::ConfigError::Read { .. }));
}

#[test]
fn missing_root_aborts_before_work() {
    let dir = scratch("missing_root").join("nope");
    let err = run(&dir, &Config::default()).expect_err("run should fail");
    assert!(matches!(err, RewriteError::RootNotFound { .. }));
}

#[cfg(unix)]
#[test]
fn unreadable_file_aborts_the_run() {
    use std::os::unix::fs::PermissionsExt;

    let dir = scratch("unreadable");
    let bad = dir.join("bad.ts");
    write(&bad, "import { x } from './b';\n");
    fs::set_permissions(&bad, fs::Permissions::from_mode(0o000)).expect("chmod");

    // Root can read anything, so only assert when the permission bit bites.
    if fs::read_to_string(&bad).is_err() {
        let err = run(&dir, &Config::default()).expect_err("run should fail");
        assert!(matches!(err, RewriteError::Read { .. }));
    }
    fs::set_permissions(&bad, fs::Permissions::from_mode(0o644)).expect("chmod back");
}
