use std::fs::Metadata;

use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Directory,
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    name: String,
    entry_type: EntryType,
    mode: u32,
    writable: bool,
}

impl Entry {
    pub fn new(name: impl Into<String>, entry_type: EntryType, mode: u32, writable: bool) -> Self {
        Self {
            name: name.into(),
            entry_type,
            mode: mode & 0o777,
            writable,
        }
    }

    /// Builds an entry from host metadata.
    /// Anything that is not a directory is listed as a file. `writable` is the caller's own
    /// access check, since mode bits alone do not say who may write.
    pub fn from_metadata(name: impl Into<String>, metadata: &Metadata, writable: bool) -> Self {
        let entry_type = if metadata.is_dir() {
            EntryType::Directory
        } else {
            EntryType::File
        };
        Self::new(
            name,
            entry_type,
            permission_bits(metadata),
            writable,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    /// Permission bits, `mode & 0o777`.
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Permission bits in octal, e.g. `755`.
    pub fn permissions(&self) -> String {
        format!("{:o}", self.mode)
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() { 0o555 } else { 0o755 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions_are_octal_and_masked() {
        let entry = Entry::new("run.sh", EntryType::File, 0o100755, true);
        assert_eq!(entry.mode(), 0o755);
        assert_eq!(entry.permissions(), "755");

        let entry = Entry::new("secret", EntryType::File, 0o600, false);
        assert_eq!(entry.permissions(), "600");
        assert!(!entry.is_writable());
    }

    #[test]
    fn test_kind_predicates() {
        let dir = Entry::new("docs", EntryType::Directory, 0o755, true);
        assert!(dir.is_dir());
        assert!(!dir.is_file());
        assert_eq!(dir.entry_type(), EntryType::Directory);
    }
}
