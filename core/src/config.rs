use std::fmt;
use std::fs;
use std::path::{Component, Path};
use std::sync::Arc;

use serde::Deserialize;

use crate::errors::ConfigError;

pub type PathFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Policy injected into a run: which files get rewritten and which
/// specifiers are eligible for resolution.
///
/// Both predicates must be pure; they are called once per file or specifier
/// and their answers are not cached.
#[derive(Clone)]
pub struct Config {
    pub source_file_filter: PathFilter,
    pub module_filter: PathFilter,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_file_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.source_file_filter = Arc::new(filter);
        self
    }

    pub fn with_module_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.module_filter = Arc::new(filter);
        self
    }

    pub fn accepts_file(&self, path: &str) -> bool {
        (self.source_file_filter)(path)
    }

    pub fn accepts_module(&self, specifier: &str) -> bool {
        (self.module_filter)(specifier)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_file_filter: Arc::new(default_source_file_filter),
            module_filter: Arc::new(default_module_filter),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config").finish_non_exhaustive()
    }
}

/// `*.js` / `*.ts` files that do not live under a `node_modules` directory.
pub fn default_source_file_filter(path: &str) -> bool {
    has_suffix(path, &["js", "ts"]) && !in_excluded_dir(path, &["node_modules"])
}

/// Relative, unscoped specifiers that do not already end in `.js`.
pub fn default_module_filter(specifier: &str) -> bool {
    is_unresolved_relative(specifier) && !specifier.starts_with('@')
}

fn is_unresolved_relative(specifier: &str) -> bool {
    !Path::new(specifier).is_absolute() && !specifier.ends_with(".js")
}

fn has_suffix<S: AsRef<str>>(path: &str, extensions: &[S]) -> bool {
    extensions.iter().any(|ext| {
        path.strip_suffix(ext.as_ref())
            .is_some_and(|rest| rest.ends_with('.'))
    })
}

fn in_excluded_dir<S: AsRef<str>>(path: &str, dirs: &[S]) -> bool {
    Path::new(path).components().any(|part| match part {
        Component::Normal(name) => dirs.iter().any(|dir| name == dir.as_ref()),
        _ => false,
    })
}

/// On-disk settings document, deserialized from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    pub source_extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub ignore_prefixes: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_extensions: vec!["js".to_string(), "ts".to_string()],
            exclude_dirs: vec!["node_modules".to_string()],
            ignore_prefixes: vec!["@".to_string()],
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn into_config(self) -> Config {
        let Settings {
            source_extensions,
            exclude_dirs,
            ignore_prefixes,
        } = self;
        let source_extensions: Vec<String> = source_extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();

        Config::new()
            .with_source_file_filter(move |path| {
                has_suffix(path, &source_extensions) && !in_excluded_dir(path, &exclude_dirs)
            })
            .with_module_filter(move |specifier| {
                is_unresolved_relative(specifier)
                    && !ignore_prefixes
                        .iter()
                        .any(|prefix| specifier.starts_with(prefix.as_str()))
            })
    }
}
