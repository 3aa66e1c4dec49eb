use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use super::PanelError;

/// The file-browser verbs, named as they appear in the `action` parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Mkdir,
    CreateFile,
    UpdateFile,
    Delete,
    Rename,
    Edit,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Mkdir => "mkdir",
            Action::CreateFile => "createFile",
            Action::UpdateFile => "updateFile",
            Action::Delete => "delete",
            Action::Rename => "rename",
            Action::Edit => "edit",
        }
    }

    /// Banner shown when the action succeeds. `edit` only reads and has none.
    pub fn success_banner(&self) -> Option<&'static str> {
        match self {
            Action::Mkdir => Some("Directory created successfully."),
            Action::CreateFile => Some("File created successfully."),
            Action::UpdateFile => Some("File updated successfully."),
            Action::Delete => Some("Deleted successfully."),
            Action::Rename => Some("Renamed successfully."),
            Action::Edit => None,
        }
    }

    /// Banner shown for any failure, whatever its cause.
    pub fn failure_banner(&self) -> Option<&'static str> {
        match self {
            Action::Mkdir => Some("Failed to create directory or it already exists."),
            Action::CreateFile => Some("Failed to create file or it already exists."),
            Action::UpdateFile => Some("Failed to update file."),
            Action::Delete => Some("Failed to delete."),
            Action::Rename => Some("Failed to rename."),
            Action::Edit => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file-browser request: the verb and the fields it needs.
///
/// Field names follow the browser's query and form parameters, so a request can be
/// deserialized straight from them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    /// Creates `dirname` inside the browsed directory `dir`.
    Mkdir {
        #[serde(default)]
        dir: String,
        dirname: String,
    },
    CreateFile {
        #[serde(default)]
        dir: String,
        filename: String,
        #[serde(default)]
        content: String,
    },
    /// `filename` is the full browser path of the edited file.
    UpdateFile {
        filename: String,
        #[serde(default)]
        content: String,
    },
    Delete { target: String },
    /// Renames `old_name` in place: `new_name` replaces only its last component.
    Rename { old_name: String, new_name: String },
    Edit { target: String },
}

impl Request {
    /// Builds a request from raw browser parameters, `action` included.
    pub fn from_params(params: &BTreeMap<String, String>) -> Result<Self, PanelError> {
        let value = serde_json::to_value(params)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn action(&self) -> Action {
        match self {
            Request::Mkdir { .. } => Action::Mkdir,
            Request::CreateFile { .. } => Action::CreateFile,
            Request::UpdateFile { .. } => Action::UpdateFile,
            Request::Delete { .. } => Action::Delete,
            Request::Rename { .. } => Action::Rename,
            Request::Edit { .. } => Action::Edit,
        }
    }
}
