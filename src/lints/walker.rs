use crate::utils::error::RspecError;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Recursively collect every `.rs` file below `root`, sorted by path.
pub fn collect_lint_files(root: &Path) -> Result<Vec<PathBuf>, RspecError> {
    if !root.is_dir() {
        return Err(RspecError::Config(format!(
            "Clippy lints directory does not exist: {}",
            root.display()
        )));
    }

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .follow_links(false)
        .build();

    let mut files = Vec::new();

    for result in walker {
        match result {
            Ok(entry) => {
                if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                    continue;
                }

                let path = entry.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
                    continue;
                }

                files.push(path.to_path_buf());
            }
            Err(e) => {
                tracing::warn!("Error walking directory: {}", e);
                continue;
            }
        }
    }

    files.sort();
    tracing::debug!("Found {} Rust files in {}", files.len(), root.display());
    Ok(files)
}
