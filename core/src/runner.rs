use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::errors::Result;
use crate::rewrite::{FileOutcome, plan_file, rewrite_file};
use crate::walker::walk;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_visited: usize,
    pub files_accepted: usize,
    pub specifiers_rewritten: usize,
    /// Files that were rewritten, or would be in dry-run mode, in walk order.
    pub changed: Vec<PathBuf>,
}

impl RunSummary {
    pub fn files_changed(&self) -> usize {
        self.changed.len()
    }

    fn record(&mut self, path: PathBuf, outcome: &FileOutcome) {
        if outcome.is_changed() {
            self.specifiers_rewritten += outcome.rewrite_count();
            self.changed.push(path);
        }
    }
}

/// Drives the walker and the rewrite pass over a source tree, one file at a
/// time in walk order.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: Config,
    dry_run: bool,
}

impl Runner {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stops at the first error. Files handled before it keep their changes.
    pub fn run(&self, root: &Path) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for entry in walk(root)? {
            let path = entry?;
            summary.files_visited += 1;

            if !self.config.accepts_file(&path.to_string_lossy()) {
                tracing::debug!(file = %path.display(), "skipped by source filter");
                continue;
            }
            summary.files_accepted += 1;

            let outcome = if self.dry_run {
                plan_file(&path, &self.config)?
            } else {
                rewrite_file(&path, &path, &self.config)?
            };

            if outcome.is_changed() {
                tracing::info!(
                    file = %path.display(),
                    rewrites = outcome.rewrite_count(),
                    dry_run = self.dry_run,
                    "rewrote imports"
                );
            }
            summary.record(path, &outcome);
        }

        Ok(summary)
    }
}

/// Rewrites every accepted file under `root` in place.
pub fn run(root: impl AsRef<Path>, config: &Config) -> Result<RunSummary> {
    Runner::new(config.clone()).run(root.as_ref())
}
