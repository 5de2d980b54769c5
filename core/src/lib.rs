pub mod config;
pub mod errors;
pub mod resolver;
pub mod rewrite;
pub mod runner;
pub mod walker;

pub use config::{Config, Settings};
pub use errors::RewriteError;
pub use resolver::resolve_import_path;
pub use rewrite::{FileOutcome, rewrite_file};
pub use runner::{RunSummary, Runner, run};
