use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::config::Config;

/// Resolves `import_path`, as written inside `source_file`, to an explicit
/// relative specifier ending in `.js`.
///
/// Candidates are probed in this order and the first one that exists wins:
/// `<path>/index.ts`, `<path>/index.js`, `<path>.ts`, `<path>.js`. A `.ts`
/// hit is emitted as `.js`. Returns `None` when the module filter rejects
/// the specifier or nothing exists on disk.
pub fn resolve_import_path(source_file: &Path, import_path: &str, config: &Config) -> Option<String> {
    if !config.accepts_module(import_path) {
        return None;
    }

    let source_abs = match std::path::absolute(source_file) {
        Ok(path) => normalize(&path),
        Err(err) => {
            tracing::debug!(file = %source_file.display(), %err, "cannot make source path absolute");
            return None;
        }
    };
    let root = source_abs.parent()?;
    let target = normalize(&root.join(import_path));

    let Some(found) = first_existing(candidates(&target)) else {
        tracing::debug!(specifier = import_path, file = %source_file.display(), "no candidate on disk");
        return None;
    };

    let resolved = relative_specifier(root, &coerce_extension(found));
    tracing::debug!(specifier = import_path, resolved = %resolved, "resolved import");
    Some(resolved)
}

pub fn candidates(target: &Path) -> [PathBuf; 4] {
    [
        target.join("index.ts"),
        target.join("index.js"),
        with_suffix(target, ".ts"),
        with_suffix(target, ".js"),
    ]
}

pub fn first_existing<I>(paths: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    paths.into_iter().find(|path| path.exists())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = OsString::from(path.as_os_str());
    raw.push(suffix);
    PathBuf::from(raw)
}

fn coerce_extension(mut path: PathBuf) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "ts") {
        path.set_extension("js");
    }
    path
}

/// Lexically folds `.` and `..` without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::ParentDir) | None => out.push(".."),
                _ => {}
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `/`-separated path from `base` to `target`, prefixed with `./` unless it
/// already starts with a dot.
pub fn relative_specifier(base: &Path, target: &Path) -> String {
    let relative = relative_path(base, target);
    if relative.starts_with('.') {
        relative
    } else {
        format!("./{relative}")
    }
}

fn relative_path(base: &Path, target: &Path) -> String {
    let base: Vec<Component<'_>> = base.components().collect();
    let target: Vec<Component<'_>> = target.components().collect();
    let common = base
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = std::iter::repeat_n("..".to_string(), base.len() - common);
    let downs = target
        .iter()
        .skip(common)
        .map(|part| part.as_os_str().to_string_lossy().into_owned());

    ups.chain(downs).collect::<Vec<_>>().join("/")
}
