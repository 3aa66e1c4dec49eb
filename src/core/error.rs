use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure of a single file operation. Each variant carries the path the caller supplied.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("{0} does not exist")]
    NotFound(PathBuf),

    #[error("{0} already exists")]
    AlreadyExists(PathBuf),

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("{0} is not a regular file")]
    NotAFile(PathBuf),

    #[error("directory {0} is not empty")]
    DirectoryNotEmpty(PathBuf),

    #[error("access denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("{0} is outside of the root directory")]
    OutOfScope(PathBuf),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Maps an OS error raised while operating on `path` to its error kind.
    pub fn from_io<P: AsRef<Path>>(path: P, err: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => FileError::NotFound(path),
            io::ErrorKind::AlreadyExists => FileError::AlreadyExists(path),
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied(path),
            io::ErrorKind::NotADirectory => FileError::NotADirectory(path),
            io::ErrorKind::IsADirectory => FileError::NotAFile(path),
            io::ErrorKind::DirectoryNotEmpty => FileError::DirectoryNotEmpty(path),
            _ => FileError::Io { path, source: err },
        }
    }

    /// Short stable name of the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FileError::NotFound(_) => "not_found",
            FileError::AlreadyExists(_) => "already_exists",
            FileError::NotADirectory(_) => "not_a_directory",
            FileError::NotAFile(_) => "not_a_file",
            FileError::DirectoryNotEmpty(_) => "directory_not_empty",
            FileError::PermissionDenied(_) => "permission_denied",
            FileError::OutOfScope(_) => "out_of_scope",
            FileError::InvalidPath(_) => "invalid_path",
            FileError::Io { .. } => "io",
        }
    }
}
