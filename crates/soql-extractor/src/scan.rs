//! Folder scanning.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::error::{Error, ErrorKind, Result};
use crate::extractor::{normalize_newlines, Extractor};
use crate::record::QueryRecord;

/// File-name suffix of Apex classes.
pub const APEX_CLASS_EXTENSION: &str = ".cls";

/// Recursively list `.cls` files under `root`, sorted by path.
///
/// Directories that cannot be listed, a missing `root` included, are
/// skipped with a warning and contribute no files.
pub fn discover_class_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "Skipping unreadable directory entry");
                continue;
            }
        };
        let is_class = entry
            .file_name()
            .to_string_lossy()
            .ends_with(APEX_CLASS_EXTENSION);

        if is_class && entry.path().is_file() {
            files.push(entry.into_path());
        }
    }

    files
}

/// Read a source file as UTF-8 text with newlines normalized to `\n`.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let text = String::from_utf8(bytes).map_err(|e| {
        Error::with_source(
            ErrorKind::Decode {
                path: path.to_path_buf(),
            },
            e,
        )
    })?;
    Ok(normalize_newlines(&text))
}

/// Scan every `.cls` file under `root`.
///
/// The first unreadable or undecodable file aborts the scan.
#[instrument(skip(extractor), fields(root = %root.display()))]
pub fn scan_folder(extractor: &Extractor, root: &Path) -> Result<Vec<QueryRecord>> {
    let files = discover_class_files(root);
    let mut records = Vec::new();

    for path in &files {
        let content = read_source(path)?;
        let class_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let found = extractor.extract(&class_name, &content);
        debug!(file = %path.display(), queries = found.len(), "Scanned class");
        records.extend(found);
    }

    info!(files = files.len(), queries = records.len(), "Scan complete");
    Ok(records)
}
