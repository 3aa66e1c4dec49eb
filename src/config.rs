use std::path::PathBuf;

use serde::Deserialize;

/// What `rename_file` does when something already exists at the destination.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub struct RenamePolicy {
    pub overwrite: bool,
}

impl RenamePolicy {
    pub const OVERWRITE: RenamePolicy = RenamePolicy { overwrite: true };
    pub const KEEP_EXISTING: RenamePolicy = RenamePolicy { overwrite: false };
}

impl Default for RenamePolicy {
    fn default() -> Self {
        Self::OVERWRITE
    }
}

/// Settings for a [`ScopedFs`](crate::ScopedFs).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    /// Host directory every operation is confined to.
    pub root: PathBuf,
    pub rename_policy: RenamePolicy,
    /// Mode for directories created by `make_directory`.
    pub dir_mode: u32,
}

impl OperatorConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_rename_policy(mut self, policy: RenamePolicy) -> Self {
        self.rename_policy = policy;
        self
    }
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            rename_policy: RenamePolicy::default(),
            dir_mode: 0o755,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OperatorConfig::default();
        assert_eq!(config.root, PathBuf::from("/"));
        assert!(config.rename_policy.overwrite);
        assert_eq!(config.dir_mode, 0o755);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: OperatorConfig = serde_json::from_str(
            r#"{"root": "/srv/www", "rename_policy": {"overwrite": false}}"#,
        )
        .unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/www"));
        assert_eq!(config.rename_policy, RenamePolicy::KEEP_EXISTING);
        assert_eq!(config.dir_mode, 0o755);
    }
}
