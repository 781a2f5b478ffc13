use std::path::{Component, Path, PathBuf};

/// Lexically normalizes a path: resolves `.` and `..` segments without
/// touching the file system. Relative paths are joined onto `base` first.
pub fn normalize_path(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` above the root stays at the root
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Converts backslash separators so declarations written on Windows resolve
/// on every platform.
pub fn portable(path: &str) -> PathBuf {
    PathBuf::from(path.replace('\\', "/"))
}
