mod error;
pub mod utils;

use std::path::{Path, PathBuf};

use crate::Entry;

pub use error::FileError;

pub type Result<T> = std::result::Result<T, FileError>;

/// Operations over a directory tree confined to a single root.
///
/// Paths starting with `/` are host absolute, everything else is taken relative
/// to the root. Either way the target must stay inside the root.
pub trait FileOperator {
    fn root(&self) -> &Path;
    fn resolve<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf>;
    fn exists<P: AsRef<Path>>(&self, path: P) -> bool;
    fn list<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<String>>;
    fn entries<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<Entry>>;
    fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>>;
    fn create_file<P: AsRef<Path>>(&self, path: P, content: &[u8]) -> Result<()>;
    fn update_file<P: AsRef<Path>>(&self, path: P, content: &[u8]) -> Result<()>;
    fn delete_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;
    fn make_directory<P: AsRef<Path>>(&self, path: P) -> Result<()>;
    fn rename_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, old: P, new: Q) -> Result<()>;
}
