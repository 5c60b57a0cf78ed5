//! Cache directory for generated export files.
//!
//! Every export writes to a path allocated here and hands it to the caller;
//! the caller releases the path once the response has been served. A cache
//! id (normally a fresh UUID) keeps concurrent requests from colliding on
//! the same base name.

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_CACHE_DIR;
use crate::error::{CourseCalError, CourseCalResult};

/// Root directory that generated files are written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDir {
    root: PathBuf,
}

impl Default for CacheDir {
    fn default() -> Self {
        CacheDir {
            root: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}

impl CacheDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CacheDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writable path for `base_name` with `cache_id` spliced between stem
    /// and extension (`calendar.ics` + `abc` -> `calendarabc.ics`). Creates
    /// the cache directory if needed.
    pub fn allocate(&self, base_name: &str, cache_id: &str) -> CourseCalResult<PathBuf> {
        fs::create_dir_all(&self.root)?;

        let (stem, extension) = match base_name.rfind('.') {
            Some(idx) => (&base_name[..idx], &base_name[idx..]),
            None => (base_name, ""),
        };
        Ok(self.root.join(format!("{stem}{cache_id}{extension}")))
    }

    /// Remove a previously allocated file. Fails loudly if the path does
    /// not exist.
    pub fn release(&self, path: &Path) -> CourseCalResult<()> {
        if path.exists() {
            fs::remove_file(path)?;
            Ok(())
        } else {
            Err(CourseCalError::CacheFileMissing(
                path.display().to_string(),
            ))
        }
    }
}
