//! Workspace filesystem module
//!
//! Provides the lazily expanded view of the workspace directory:
//! - Directory entries and their presentation fields
//! - On-demand child listing
//! - Refresh observers

mod entry;
mod provider;

pub use entry::{DirectoryEntry, EntryKind, OpenAction};
pub use provider::{Subscription, TreeProvider, WorkspaceError};
