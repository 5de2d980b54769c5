use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::{Result, RewriteError};

/// Lazy depth-first walk over every regular file under a root directory.
///
/// Entries come out in directory-listing order at each level. Directories
/// and symbolic links are never yielded. Each call to [`walk`] starts a
/// fresh traversal.
pub struct Walk {
    inner: walkdir::IntoIter,
}

pub fn walk(root: impl AsRef<Path>) -> Result<Walk> {
    let root = root.as_ref();
    let meta = fs::metadata(root).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => RewriteError::RootNotFound {
            path: root.to_path_buf(),
        },
        _ => RewriteError::Read {
            path: root.to_path_buf(),
            source,
        },
    })?;
    if !meta.is_dir() {
        return Err(RewriteError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    Ok(Walk {
        inner: WalkDir::new(root).min_depth(1).into_iter(),
    })
}

impl Iterator for Walk {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(entry) if entry.file_type().is_file() => return Some(Ok(entry.into_path())),
                Ok(_) => continue,
                Err(source) => {
                    let path = source.path().map(Path::to_path_buf).unwrap_or_default();
                    return Some(Err(RewriteError::Walk { path, source }));
                }
            }
        }
    }
}
