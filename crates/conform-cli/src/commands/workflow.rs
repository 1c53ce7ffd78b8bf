use std::path::Path;

use conform_core::config::ConformConfig;
use conform_parsers::workflow::WorkflowDocument;

use super::print_json;

/// Run `conform workflow <file>`: parse one workflow and print it as JSON.
/// A relative path is tried against the working directory, then the root.
pub fn run(config: &ConformConfig, file: &Path) -> i32 {
    let path = if file.is_relative() && !file.exists() {
        config.root.join(file)
    } else {
        file.to_path_buf()
    };

    match WorkflowDocument::from_path(&path) {
        Ok(doc) => {
            tracing::debug!(
                path = %path.display(),
                triggers = doc.on.len(),
                jobs = doc.jobs.len(),
                "parsed workflow"
            );
            print_json("workflow", &doc)
        }
        Err(e) => {
            eprintln!("conform workflow: {}", e);
            2
        }
    }
}
