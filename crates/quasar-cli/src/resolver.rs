//! Filesystem include resolution.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use quasar_qasm2::IncludeResolver;

/// Resolves include paths against an ordered list of directories.
///
/// Absolute paths are used as given. The first directory containing the
/// file wins.
#[derive(Debug, Clone, Default)]
pub struct SearchPathResolver {
    dirs: Vec<PathBuf>,
}

impl SearchPathResolver {
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            dirs: dirs.into_iter().collect(),
        }
    }

    /// Locate `path` on the search path.
    pub fn find(&self, path: &str) -> Option<PathBuf> {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }
        self.dirs
            .iter()
            .map(|dir| dir.join(candidate))
            .find(|file| file.is_file())
    }
}

impl IncludeResolver for SearchPathResolver {
    fn resolve(&self, path: &str) -> Option<String> {
        let file = self.find(path)?;
        match fs::read_to_string(&file) {
            Ok(content) => {
                debug!(include = path, file = %file.display(), "resolved include");
                Some(content)
            }
            Err(e) => {
                warn!(file = %file.display(), error = %e, "failed to read include");
                None
            }
        }
    }
}
