//! The file browser on top of a [`FileOperator`].
//!
//! A [`Request`] names one browser action and its fields. [`Panel::handle`] turns it into a
//! single operator call and an [`Outcome`] with the banner to show; [`Panel::browse`] builds the
//! directory view. Nothing here renders markup.

mod action;
mod context;

use std::borrow::Cow;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::{FileError, FileOperator, utils};
use crate::EntryType;

pub use action::{Action, Request};
pub use context::{ConnectionConfig, Identity, RequestContext};

/// Errors that stop a request before it reaches the file operator.
#[derive(Error, Debug)]
pub enum PanelError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("bad request: {0}")]
    BadRequest(#[from] serde_json::Error),
}

/// Result of a dispatched action.
#[derive(Debug)]
pub struct Outcome {
    action: Action,
    error: Option<FileError>,
    editor: Option<Editor>,
}

impl Outcome {
    fn done(action: Action) -> Self {
        Self {
            action,
            error: None,
            editor: None,
        }
    }

    fn failed(action: Action, error: FileError) -> Self {
        Self {
            action,
            error: Some(error),
            editor: None,
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The operator error behind a failure. Never shown to the user.
    pub fn error(&self) -> Option<&FileError> {
        self.error.as_ref()
    }

    /// The single informational message for the user.
    pub fn banner(&self) -> Option<&'static str> {
        match self.error {
            None => self.action.success_banner(),
            Some(_) => self.action.failure_banner(),
        }
    }

    /// Editor form contents, present for `edit`.
    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }
}

/// Data for the file editor form. `content` holds the file bytes unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Editor {
    pub target: String,
    pub name: String,
    pub content: Vec<u8>,
}

impl Editor {
    fn new(target: String, content: Vec<u8>) -> Self {
        Self {
            name: base_name(&target).to_string(),
            target,
            content,
        }
    }

    /// Content as text for a textarea; invalid UTF-8 is replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// Data for the rename form: the new-name field starts as the current name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameForm {
    pub target: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    pub dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub name: String,
    /// Browser path of the entry, usable as `dir` or `target`.
    pub path: String,
    pub kind: EntryType,
    pub permissions: String,
    pub writable: bool,
}

/// What the browser shows for one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryView {
    pub dir: String,
    pub breadcrumbs: Vec<Crumb>,
    /// `None` when the directory cannot be read.
    pub rows: Option<Vec<Row>>,
}

impl DirectoryView {
    pub const UNREADABLE: &'static str = "Unable to read directory.";
}

pub struct Panel<F: FileOperator> {
    fs: F,
}

impl<F: FileOperator> Panel<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    pub fn operator(&self) -> &F {
        &self.fs
    }

    /// Runs one browser action for an authenticated caller.
    ///
    /// Operator failures do not make this return `Err`: they are reported through the
    /// outcome's failure banner, with the cause kept in [`Outcome::error`].
    pub fn handle(&self, ctx: &RequestContext, request: Request) -> Result<Outcome, PanelError> {
        let identity = ctx.require_identity()?;
        let action = request.action();

        let result = match request {
            Request::Mkdir { dir, dirname } => self
                .fs
                .make_directory(utils::join_relative(&dir, &dirname))
                .map(|_| Outcome::done(action)),
            Request::CreateFile {
                dir,
                filename,
                content,
            } => self
                .fs
                .create_file(utils::join_relative(&dir, &filename), content.as_bytes())
                .map(|_| Outcome::done(action)),
            Request::UpdateFile { filename, content } => self
                .fs
                .update_file(&filename, content.as_bytes())
                .map(|_| Outcome::done(action)),
            Request::Delete { target } => {
                self.fs.delete_file(&target).map(|_| Outcome::done(action))
            }
            Request::Rename { old_name, new_name } => {
                let new_path = utils::join_relative(utils::parent_relative(&old_name), &new_name);
                self.fs
                    .rename_file(&old_name, new_path)
                    .map(|_| Outcome::done(action))
            }
            Request::Edit { target } => match self.fs.read_file(&target) {
                Ok(content) => Ok(Outcome {
                    editor: Some(Editor::new(target, content)),
                    ..Outcome::done(action)
                }),
                // the form is still shown, just empty
                Err(err) => {
                    warn!(user = %identity, %action, kind = err.kind(), error = %err, "file action failed");
                    return Ok(Outcome {
                        editor: Some(Editor::new(target, Vec::new())),
                        ..Outcome::failed(action, err)
                    });
                }
            },
        };

        match result {
            Ok(outcome) => {
                info!(user = %identity, %action, "file action succeeded");
                Ok(outcome)
            }
            Err(err) => {
                warn!(user = %identity, %action, kind = err.kind(), error = %err, "file action failed");
                Ok(Outcome::failed(action, err))
            }
        }
    }

    /// Prefills the rename form for `target`. Nothing on disk is touched or checked.
    pub fn rename_form(&self, ctx: &RequestContext, target: &str) -> Result<RenameForm, PanelError> {
        ctx.require_identity()?;
        Ok(RenameForm {
            target: target.to_string(),
            name: base_name(target).to_string(),
        })
    }

    /// Builds the listing of `dir` for an authenticated caller.
    pub fn browse(&self, ctx: &RequestContext, dir: &str) -> Result<DirectoryView, PanelError> {
        let identity = ctx.require_identity()?;

        let rows = match self.fs.entries(dir) {
            Ok(entries) => Some(
                entries
                    .into_iter()
                    .map(|entry| Row {
                        path: utils::join_relative(dir, entry.name()),
                        name: entry.name().to_string(),
                        kind: entry.entry_type(),
                        permissions: entry.permissions(),
                        writable: entry.is_writable(),
                    })
                    .collect(),
            ),
            Err(err) => {
                warn!(user = %identity, dir, kind = err.kind(), error = %err, "directory not readable");
                None
            }
        };

        Ok(DirectoryView {
            dir: dir.to_string(),
            breadcrumbs: breadcrumbs(dir),
            rows,
        })
    }
}

/// `Root` followed by one crumb per non-empty component of `dir`.
pub fn breadcrumbs(dir: &str) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb {
        label: "Root".to_string(),
        dir: String::new(),
    }];
    let mut accumulated = String::new();
    for part in dir.split('/').filter(|part| !part.is_empty()) {
        accumulated = utils::join_relative(&accumulated, part);
        crumbs.push(Crumb {
            label: part.to_string(),
            dir: accumulated.clone(),
        });
    }
    crumbs
}

fn base_name(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}
