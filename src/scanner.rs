use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Discover form text files under a data root.
///
/// The PDF-to-text collaborator drops one `.txt` per form guide; we
/// take every text file below `root`, sorted so batch output is
/// deterministic regardless of directory iteration order.
pub fn scan_forms(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
        })
        .collect();
    files.sort();
    files
}
