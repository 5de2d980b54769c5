use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::config::Config;
use crate::errors::{Result, RewriteError};
use crate::resolver::resolve_import_path;

static CLAUSE_PATTERN: OnceLock<Regex> = OnceLock::new();

// The imported segment may span lines; the quoted specifier may not.
fn clause_pattern() -> &'static Regex {
    CLAUSE_PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)(import|export) (.+?) from ('[^\n']+'|"[^\n"]+");"#)
            .expect("clause pattern is a valid regex")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecifierRewrite {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub text: String,
    pub rewrites: Vec<SpecifierRewrite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Unchanged,
    Rewritten { rewrites: Vec<SpecifierRewrite> },
}

impl FileOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, FileOutcome::Rewritten { .. })
    }

    pub fn rewrite_count(&self) -> usize {
        match self {
            FileOutcome::Unchanged => 0,
            FileOutcome::Rewritten { rewrites } => rewrites.len(),
        }
    }
}

/// Substitutes every resolvable specifier in `text`, left to right.
///
/// Text outside the matched clauses is copied through untouched, and a
/// clause whose specifier does not resolve is kept verbatim.
pub fn rewrite_source(file_path: &Path, text: &str, config: &Config) -> Rewritten {
    let mut out = String::with_capacity(text.len());
    let mut rewrites = Vec::new();
    let mut last = 0;

    for caps in clause_pattern().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&text[last..whole.start()]);
        last = whole.end();

        match rewrite_clause(file_path, &caps, config) {
            Some((clause, rewrite)) if clause != whole.as_str() => {
                out.push_str(&clause);
                rewrites.push(rewrite);
            }
            _ => out.push_str(whole.as_str()),
        }
    }
    out.push_str(&text[last..]);

    Rewritten {
        text: out,
        rewrites,
    }
}

fn rewrite_clause(
    file_path: &Path,
    caps: &Captures<'_>,
    config: &Config,
) -> Option<(String, SpecifierRewrite)> {
    let keyword = caps.get(1)?.as_str();
    let imported = caps.get(2)?.as_str();
    let quoted = caps.get(3)?.as_str();
    let specifier = &quoted[1..quoted.len() - 1];

    let resolved = resolve_import_path(file_path, specifier, config)?;
    let clause = format!("{keyword} {imported} from '{resolved}';");
    Some((
        clause,
        SpecifierRewrite {
            from: specifier.to_string(),
            to: resolved,
        },
    ))
}

/// Runs the pass over `file_path` without writing anything.
pub fn plan_file(file_path: &Path, config: &Config) -> Result<FileOutcome> {
    let (_, outcome) = process(file_path, config)?;
    Ok(outcome)
}

/// Runs the pass over `file_path` and writes the result to `output_path`
/// only when the text changed.
pub fn rewrite_file(file_path: &Path, output_path: &Path, config: &Config) -> Result<FileOutcome> {
    let (text, outcome) = process(file_path, config)?;
    if let Some(text) = text {
        fs::write(output_path, text).map_err(|source| RewriteError::Write {
            path: output_path.to_path_buf(),
            source,
        })?;
    }
    Ok(outcome)
}

fn process(file_path: &Path, config: &Config) -> Result<(Option<String>, FileOutcome)> {
    let original = fs::read_to_string(file_path).map_err(|source| RewriteError::Read {
        path: file_path.to_path_buf(),
        source,
    })?;

    let rewritten = rewrite_source(file_path, &original, config);
    if rewritten.text == original {
        tracing::trace!(file = %file_path.display(), "no rewritable imports");
        return Ok((None, FileOutcome::Unchanged));
    }

    Ok((
        Some(rewritten.text),
        FileOutcome::Rewritten {
            rewrites: rewritten.rewrites,
        },
    ))
}
