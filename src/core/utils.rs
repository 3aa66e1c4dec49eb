use std::path::{Component, Path, PathBuf};

/// Lexically resolves `.` and `..` components and drops trailing separators.
/// `..` never climbs above the first component.
pub fn normalize<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(parent) = result.parent() {
                    result = parent.to_path_buf();
                }
            }
            _ => result.push(component),
        }
    }
    result
}

/// `true` for the `.` and `..` pseudo-entries of a raw listing.
pub fn is_dot_entry(name: &str) -> bool {
    name == "." || name == ".."
}

/// Joins a browser-relative directory and a child name with `/`.
/// An empty `dir` stands for the root, so the child name is returned as is.
pub fn join_relative(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Directory part of a browser-relative path, `""` when there is none.
pub fn parent_relative(path: &str) -> &str {
    match path.trim_end_matches('/').rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "",
    }
}
