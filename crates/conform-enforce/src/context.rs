use std::path::Path;
use std::sync::Arc;

use conform_core::config::ConformConfig;
use conform_core::error::Result;
use conform_parsers::project::ProjectDocument;

use crate::report::WarningReporter;
use crate::suppress::IgnoreSet;

/// Repository-wide build properties shared by every project.
pub const CUSTOM_BUILD_PROPS: &str = "src/Custom.Build.props";

/// Everything rules read that is loaded once per process: configuration,
/// ignore rules, repository-wide build defaults, and the warning report.
/// Read-only once constructed.
#[derive(Debug)]
pub struct RepoContext {
    pub config: ConformConfig,
    pub ignores: IgnoreSet,
    /// `IsPackable` from the repository-wide build properties, if set.
    pub repo_packable: Option<bool>,
    pub reporter: WarningReporter,
}

impl RepoContext {
    /// Load the ignore rules and shared build properties for `config.root`.
    pub fn load(config: ConformConfig) -> Result<Arc<Self>> {
        let ignores = IgnoreSet::from_entries(&config.load_ignore_entries()?)?;
        let repo_packable = load_repo_packable(&config.root);
        Ok(Arc::new(Self::with_ignores(config, ignores, repo_packable)))
    }

    pub fn with_ignores(config: ConformConfig, ignores: IgnoreSet, repo_packable: Option<bool>) -> Self {
        let reporter = WarningReporter::new(&config);
        Self {
            config,
            ignores,
            repo_packable,
            reporter,
        }
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }
}

fn load_repo_packable(root: &Path) -> Option<bool> {
    let path = root.join(CUSTOM_BUILD_PROPS);
    if !path.is_file() {
        return None;
    }
    match ProjectDocument::load(&path) {
        Ok(doc) => doc.boolean("Project/PropertyGroup/IsPackable"),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable build properties");
            None
        }
    }
}
