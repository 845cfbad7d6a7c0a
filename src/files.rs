//! Directory walking shared by the job and log indexes.

use std::io;
use std::path::{Path, PathBuf};

/// Recursively collect files under `dir` whose extension matches `extension`
///
/// The comparison ignores ASCII case. Results are sorted so callers see a
/// stable order regardless of the filesystem's directory ordering.
///
/// Symlinked directories are not entered, so a link back to a parent cannot
/// loop. Symlinked files are still collected.
pub(crate) fn find_files(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in current.read_dir()? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                pending.push(path);
            } else if has_extension(&path, extension) && path.is_file() {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

/// True when `path` ends in `.extension` (ASCII case-insensitive)
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// File name without its extension, lossily converted
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_files_recurses_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("2017/march")).unwrap();
        fs::write(dir.path().join("b.dlg"), "").unwrap();
        fs::write(dir.path().join("2017/march/a.DLG"), "").unwrap();
        fs::write(dir.path().join("2017/notes.txt"), "").unwrap();

        let files = find_files(dir.path(), "dlg").unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));
        assert!(files.iter().all(|f| has_extension(f, "dlg")));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_files_skips_directory_links() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.dlg"), "").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("dir.dlg")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("a.dlg"), dir.path().join("b.dlg")).unwrap();

        let files = find_files(dir.path(), "dlg").unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.dlg"), dir.path().join("b.dlg")]
        );
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("/jobs/AuTi_stack.ajp")), "AuTi_stack");
        assert_eq!(file_stem(Path::new("")), "");
    }
}
