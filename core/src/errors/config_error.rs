use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("could not read settings file '{}'", path.display())]
    #[diagnostic(code(esmfix::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in '{}'", path.display())]
    #[diagnostic(
        code(esmfix::config::parse),
        help("expected a JSON object with optional sourceExtensions (e.g. [\"js\", \"ts\"]), excludeDirs and ignorePrefixes arrays")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
