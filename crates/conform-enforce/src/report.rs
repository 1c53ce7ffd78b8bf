//! Persisted warning summary.
//!
//! Warnings never fail a run. Under CI (with a step summary configured) they
//! are appended to a markdown file at the repository root so they stay
//! visible after the run. The file is created on the first warning only.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use conform_core::config::ConformConfig;
use conform_core::error::{ConformError, Result};

#[derive(Debug)]
pub struct WarningReporter {
    enabled: bool,
    path: PathBuf,
    github_output: Option<PathBuf>,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl WarningReporter {
    pub fn new(config: &ConformConfig) -> Self {
        Self {
            enabled: config.writes_reports(),
            path: config.warnings_report_path(),
            github_output: config.github_output.clone(),
            writer: Mutex::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Append one rule's warnings.
    pub fn add(&self, rule: &str, warnings: &[String]) -> Result<()> {
        if !self.enabled || warnings.is_empty() {
            return Ok(());
        }

        let mut guard = match self.writer.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.is_none() {
            tracing::info!(path = %self.path.display(), "creating warnings report");
            let file = File::create(&self.path).map_err(|source| self.io_error(source))?;
            *guard = Some(BufWriter::new(file));
        }
        if let Some(writer) = guard.as_mut() {
            let mut block = format!("**🟡 {rule}**\n");
            for warning in warnings {
                block.push_str("* ");
                block.push_str(warning);
                block.push('\n');
            }
            writer
                .write_all(block.as_bytes())
                .map_err(|source| self.io_error(source))?;
        }
        Ok(())
    }

    /// Flush the report and flag `has-warnings=true` in the step output.
    /// Returns whether any warning was written.
    pub fn save(&self) -> Result<bool> {
        let mut guard = match self.writer.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(mut writer) = guard.take() else {
            return Ok(false);
        };
        writer.flush().map_err(|source| self.io_error(source))?;

        if let Some(output) = &self.github_output {
            tracing::info!(path = %output.display(), "flagging warnings in step output");
            std::fs::write(output, "has-warnings=true").map_err(|source| ConformError::Io {
                path: output.clone(),
                source,
            })?;
        }
        Ok(true)
    }

    fn io_error(&self, source: std::io::Error) -> ConformError {
        ConformError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
