mod config_error;

pub use config_error::ConfigError;

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for a rewrite run.
#[derive(Debug, Error, Diagnostic)]
pub enum RewriteError {
    #[error("root directory '{}' does not exist", path.display())]
    #[diagnostic(code(esmfix::walk::missing_root))]
    RootNotFound { path: PathBuf },

    #[error("'{}' is not a directory", path.display())]
    #[diagnostic(
        code(esmfix::walk::not_a_directory),
        help("pass the directory that contains your sources")
    )]
    NotADirectory { path: PathBuf },

    #[error("failed to list '{}'", path.display())]
    #[diagnostic(code(esmfix::walk::io))]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("could not read '{}'", path.display())]
    #[diagnostic(code(esmfix::rewrite::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write '{}'", path.display())]
    #[diagnostic(code(esmfix::rewrite::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = RewriteError> = std::result::Result<T, E>;
