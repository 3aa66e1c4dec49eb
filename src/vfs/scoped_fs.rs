//! A file operator confined to a real directory on the host system.
//!
//! ### Key Features:
//! - **Containment**: Every target is canonicalized (symlinks resolved) and must lie inside the
//!   canonical root; anything else fails with `FileError::OutOfScope`.
//! - **Stateless**: Paths are never cached. Each call resolves and validates from scratch, so the
//!   operator only holds its immutable configuration and can be shared between threads.
//! - **Raw targets**: Operations that create something (`create_file`, `make_directory`, the
//!   destination of `rename_file`) cannot canonicalize a path that does not exist yet. Their
//!   target is normalized lexically and its deepest existing ancestor is canonicalized instead.
//! - **No locking**: Two callers working on the same path race; the last syscall wins.

use std::fs::{DirBuilder, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{OperatorConfig, RenamePolicy};
use crate::core::{FileError, FileOperator, Result, utils};
use crate::Entry;

/// A root-scoped view of a host directory.
///
/// Paths starting with `/` are host absolute paths; all others are joined to the root. Either
/// form is accepted as long as the final target stays inside the root.
///
/// ### Usage notes:
/// - `resolve()` follows symlinks, so `read_file`, `update_file` and `delete_file` act on the
///   link target. The target still has to be inside the root.
/// - `delete_file()` removes directories only when they are empty.
/// - `rename_file()` replaces an existing destination unless the rename policy forbids it.
///
/// ### Example:
/// ```no_run
/// use fidama::{FileOperator, OperatorConfig, ScopedFs};
///
/// let fs = ScopedFs::new(OperatorConfig::new("/srv/www")).unwrap();
/// fs.make_directory("docs").unwrap();
/// fs.create_file("docs/note.txt", b"Hello").unwrap();
/// assert_eq!(fs.read_file("docs/note.txt").unwrap(), b"Hello");
///
/// // Escaping the root is refused.
/// assert!(fs.read_file("../../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ScopedFs {
    root: PathBuf, // host-related canonical path
    rename_policy: RenamePolicy,
    dir_mode: u32,
}

impl ScopedFs {
    /// Creates an operator over `config.root`.
    /// The root must be an absolute path to an existing directory; it is stored canonicalized.
    pub fn new(config: OperatorConfig) -> Result<Self> {
        let root = config.root;

        if root.as_os_str().is_empty() {
            return Err(FileError::InvalidPath("empty root path".to_string()));
        }
        if root.is_relative() {
            return Err(FileError::InvalidPath(format!(
                "the root path must be absolute: {}",
                root.display()
            )));
        }
        let metadata = std::fs::metadata(&root).map_err(|e| FileError::from_io(&root, e))?;
        if !metadata.is_dir() {
            return Err(FileError::NotADirectory(root));
        }
        let root = root
            .canonicalize()
            .map_err(|e| FileError::from_io(&root, e))?;

        Ok(Self {
            root,
            rename_policy: config.rename_policy,
            dir_mode: config.dir_mode,
        })
    }

    pub fn rename_policy(&self) -> RenamePolicy {
        self.rename_policy
    }

    /// Host path for a caller path, before any resolution.
    fn host_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn is_contained(&self, canonical: &Path) -> bool {
        canonical.starts_with(&self.root)
    }

    /// Host path for a target that may not exist yet.
    ///
    /// The deepest existing ancestor is canonicalized and checked against the root; the rest of
    /// the lexically normalized path is appended to it unchanged.
    fn contain_raw<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        let raw = utils::normalize(self.host_path(path));
        if raw == self.root {
            return Ok(raw);
        }

        for ancestor in raw.ancestors().skip(1) {
            match ancestor.canonicalize() {
                Ok(canonical) => {
                    if !self.is_contained(&canonical) {
                        return Err(FileError::OutOfScope(path.to_path_buf()));
                    }
                    // `raw` is normalized, so the remainder holds plain names only
                    let rest = raw
                        .strip_prefix(ancestor)
                        .map_err(|_| FileError::InvalidPath(path.display().to_string()))?;
                    return Ok(canonical.join(rest));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(FileError::from_io(path, e)),
            }
        }

        Err(FileError::OutOfScope(path.to_path_buf()))
    }

    fn ensure_not_root(&self, target: &Path, what: &str) -> Result<()> {
        if target == self.root {
            return Err(FileError::InvalidPath(format!("the root cannot be {}", what)));
        }
        Ok(())
    }

    fn check_not_empty<P: AsRef<Path>>(path: P) -> Result<()> {
        if path.as_ref().as_os_str().is_empty() {
            return Err(FileError::InvalidPath("empty".to_string()));
        }
        Ok(())
    }

    /// `true` if anything, including a dangling symlink, sits at `host`.
    fn occupied(host: &Path) -> bool {
        std::fs::symlink_metadata(host).is_ok()
    }
}

/// Whether the current process may write `path`, as the OS decides it.
#[cfg(unix)]
fn is_writable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
fn is_writable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

impl FileOperator for ScopedFs {
    /// Returns the canonical root on the host file system.
    fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Canonicalizes `path` and checks that it lies inside the root.
    /// Fails with `NotFound` if the target does not exist.
    fn resolve<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        let canonical = self
            .host_path(path)
            .canonicalize()
            .map_err(|e| FileError::from_io(path, e))?;
        if !self.is_contained(&canonical) {
            return Err(FileError::OutOfScope(path.to_path_buf()));
        }
        Ok(canonical)
    }

    /// Checks if something exists at `path` inside the root. Does not follow a trailing symlink.
    fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.contain_raw(path)
            .map(|host| Self::occupied(&host))
            .unwrap_or(false)
    }

    /// Returns the raw names in `dir`, sorted, including `.` and `..`.
    fn list<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<String>> {
        let dir = dir.as_ref();
        let host = self.resolve(dir)?;
        if !host.is_dir() {
            return Err(FileError::NotADirectory(dir.to_path_buf()));
        }

        let mut names = vec![".".to_string(), "..".to_string()];
        for entry in std::fs::read_dir(&host).map_err(|e| FileError::from_io(dir, e))? {
            let entry = entry.map_err(|e| FileError::from_io(dir, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();

        debug!(dir = %host.display(), count = names.len(), "listed directory");
        Ok(names)
    }

    /// Lists `dir` without `.` and `..`, with type and permissions of each entry.
    /// Names that are not valid UTF-8 are shown lossily but still described from the real path.
    fn entries<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<Entry>> {
        let dir = dir.as_ref();
        let host = self.resolve(dir)?;
        if !host.is_dir() {
            return Err(FileError::NotADirectory(dir.to_path_buf()));
        }

        let mut children = Vec::new();
        for entry in std::fs::read_dir(&host).map_err(|e| FileError::from_io(dir, e))? {
            let entry = entry.map_err(|e| FileError::from_io(dir, e))?;
            children.push((entry.file_name(), entry.path()));
        }
        children.sort();

        let mut entries = Vec::with_capacity(children.len());
        for (name, child) in children {
            // dangling symlinks are described by the link itself
            let metadata = std::fs::metadata(&child)
                .or_else(|_| std::fs::symlink_metadata(&child))
                .map_err(|e| FileError::from_io(&child, e))?;
            entries.push(Entry::from_metadata(
                name.to_string_lossy(),
                &metadata,
                is_writable(&child),
            ));
        }
        Ok(entries)
    }

    /// Reads the entire contents of a regular file.
    fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let host = self.resolve(path)?;
        if !host.is_file() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        let content = std::fs::read(&host).map_err(|e| FileError::from_io(path, e))?;

        debug!(file = %host.display(), bytes = content.len(), "read file");
        Ok(content)
    }

    /// Creates a new file with `content` as its whole body.
    /// Fails if anything already exists at `path`. Parent directories are not created.
    fn create_file<P: AsRef<Path>>(&self, path: P, content: &[u8]) -> Result<()> {
        let path = path.as_ref();
        Self::check_not_empty(path)?;

        let host = self.contain_raw(path)?;
        if Self::occupied(&host) {
            return Err(FileError::AlreadyExists(path.to_path_buf()));
        }
        let mut fd = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&host)
            .map_err(|e| FileError::from_io(path, e))?;
        fd.write_all(content)
            .map_err(|e| FileError::from_io(path, e))?;

        debug!(file = %host.display(), bytes = content.len(), "created file");
        Ok(())
    }

    /// Replaces the entire contents of an existing regular file.
    fn update_file<P: AsRef<Path>>(&self, path: P, content: &[u8]) -> Result<()> {
        let path = path.as_ref();
        let host = self.resolve(path)?;
        if !host.is_file() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        std::fs::write(&host, content).map_err(|e| FileError::from_io(path, e))?;

        debug!(file = %host.display(), bytes = content.len(), "updated file");
        Ok(())
    }

    /// Removes a file, or a directory if it is empty.
    fn delete_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        Self::check_not_empty(path)?;

        let host = self.resolve(path)?;
        self.ensure_not_root(&host, "removed")?;

        if host.is_dir() {
            let mut children = std::fs::read_dir(&host).map_err(|e| FileError::from_io(path, e))?;
            if children.next().is_some() {
                return Err(FileError::DirectoryNotEmpty(path.to_path_buf()));
            }
            std::fs::remove_dir(&host).map_err(|e| FileError::from_io(path, e))?;
        } else {
            std::fs::remove_file(&host).map_err(|e| FileError::from_io(path, e))?;
        }

        debug!(path = %host.display(), "deleted");
        Ok(())
    }

    /// Creates a directory and all its missing parents.
    /// Fails if anything already exists at `path`.
    fn make_directory<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        Self::check_not_empty(path)?;

        let host = self.contain_raw(path)?;
        if Self::occupied(&host) {
            return Err(FileError::AlreadyExists(path.to_path_buf()));
        }

        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.dir_mode);
        }
        builder
            .create(&host)
            .map_err(|e| FileError::from_io(path, e))?;

        debug!(dir = %host.display(), mode = %format!("{:o}", self.dir_mode), "created directory");
        Ok(())
    }

    /// Moves `old` to `new`. `new` is not resolved; an existing object there is replaced only
    /// when the rename policy allows overwriting.
    fn rename_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, old: P, new: Q) -> Result<()> {
        let (old, new) = (old.as_ref(), new.as_ref());
        Self::check_not_empty(old)?;
        Self::check_not_empty(new)?;

        let from = self.resolve(old)?;
        self.ensure_not_root(&from, "renamed")?;

        let to = self.contain_raw(new)?;
        self.ensure_not_root(&to, "replaced")?;
        if !self.rename_policy.overwrite && Self::occupied(&to) {
            return Err(FileError::AlreadyExists(new.to_path_buf()));
        }
        std::fs::rename(&from, &to).map_err(|e| FileError::from_io(old, e))?;

        debug!(from = %from.display(), to = %to.display(), "renamed");
        Ok(())
    }
}
