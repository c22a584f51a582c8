//! Corpus loading from a file or directory tree

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::{Document, LoadWarning};

/// Loads a corpus from a path, dispatching each file by extension.
///
/// Directory traversal is deterministic (sorted by file name at every level)
/// so chunk ordering, and therefore retrieval tie-breaking, is reproducible.
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load every document under `path`.
    ///
    /// Per-file failures are absorbed into warnings; the load only fails
    /// outright when the path is missing or nothing at all could be loaded.
    pub fn load(path: &Path) -> Result<(Vec<Document>, Vec<LoadWarning>)> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let files = Self::collect_files(path);

        let mut documents = Vec::new();
        let mut warnings = Vec::new();

        for file in &files {
            match super::extract(file) {
                Ok(docs) => {
                    tracing::debug!(file = %file.display(), documents = docs.len(), "loaded file");
                    documents.extend(docs);
                }
                Err(e) => {
                    tracing::warn!(file = %file.display(), error = %e, "skipping file");
                    warnings.push(LoadWarning {
                        source: file.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if documents.is_empty() {
            return Err(Error::EmptyCorpus(path.to_path_buf()));
        }

        Ok((documents, warnings))
    }

    /// Enumerate regular files under `path` in sorted traversal order
    fn collect_files(path: &Path) -> Vec<PathBuf> {
        if path.is_file() {
            return vec![path.to_path_buf()];
        }

        WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect()
    }
}
