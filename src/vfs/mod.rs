mod entry;
mod scoped_fs;

pub use entry::{Entry, EntryType};
pub use scoped_fs::ScopedFs;
