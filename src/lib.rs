//! A root-scoped file operator and the file browser built on it.
//!
//! ### Overview
//!
//! `fidama` gives an administration front end a small, safe set of file operations over one
//! host directory. The `FileOperator` trait describes them and `ScopedFs` implements them on the
//! real filesystem. The `panel` module maps browser actions (`mkdir`, `createFile`,
//! `updateFile`, `delete`, `rename`, `edit`) onto those operations and produces the banner and
//! directory view a front end displays.
//!
//! **Key ideas**:
//! - **Containment**: every target is canonicalized and must stay inside the configured root;
//!   `../` sequences, absolute paths and symlinks that lead out are refused with `OutOfScope`.
//! - **Statelessness**: nothing is cached between calls; each one re-resolves its paths.
//! - **Explicit context**: callers pass a `RequestContext` with the authenticated identity
//!   instead of relying on ambient session state.
//! - **Plain failures**: each operation either succeeds or returns one `FileError`; the browser
//!   collapses any failure into a single banner.

mod config;
mod core;
pub mod panel;
mod vfs;

pub use crate::config::{OperatorConfig, RenamePolicy};
pub use crate::core::{FileError, FileOperator, Result, utils};
pub use crate::vfs::{Entry, EntryType, ScopedFs};
