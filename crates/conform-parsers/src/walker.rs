use std::path::{Path, PathBuf};

use conform_core::error::{ConformError, Result};
use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;

/// Recursive file discovery under a repository root.
///
/// A glob without `/` matches file names at any depth (`*.csproj`). A glob
/// containing `/` matches the whole root-relative path (`.github/workflows/*.yml`).
pub struct FileWalker {
    root: PathBuf,
}

impl FileWalker {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All files matching `glob`, sorted by path.
    pub fn find(&self, glob: &str) -> Result<Vec<PathBuf>> {
        let matcher = compile(glob)?;
        let by_path = glob.contains('/');

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .ignore(false)
            .parents(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        let mut paths = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().map_or(false, |ft| ft.is_file()) {
                continue;
            }

            let path = entry.into_path();
            let matched = if by_path {
                path.strip_prefix(&self.root)
                    .map(|rel| matcher.is_match(rel))
                    .unwrap_or(false)
            } else {
                path.file_name().map_or(false, |name| matcher.is_match(name))
            };
            if matched {
                paths.push(path);
            }
        }

        paths.sort();
        tracing::debug!(glob, count = paths.len(), "discovered files");
        Ok(paths)
    }
}

fn compile(glob: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(glob)
        .literal_separator(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|e| ConformError::InvalidFileGlob {
            glob: glob.to_string(),
            reason: e.to_string(),
        })
}
