//! Directory entries
//!
//! A plain description of one filesystem child, rebuilt on every listing.

use std::path::{Path, PathBuf};

/// Kind of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    Directory,
    File,
}

/// Action performed when a file entry is activated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenAction {
    /// Open the file in the configured editor
    Open(PathBuf),
}

/// One child of a workspace directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Absolute path to the entry
    pub path: PathBuf,
    /// File name shown in the tree
    pub name: String,
    /// File or directory, as reported by stat
    pub kind: EntryKind,
}

impl DirectoryEntry {
    pub fn new(path: PathBuf, kind: EntryKind) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Self { path, name, kind }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Directories expand, files are leaves
    pub fn is_expandable(&self) -> bool {
        self.is_dir()
    }

    /// Files carry an open action, directories carry none
    pub fn open_action(&self) -> Option<OpenAction> {
        match self.kind {
            EntryKind::File => Some(OpenAction::Open(self.path.clone())),
            EntryKind::Directory => None,
        }
    }

    /// Dotfiles and dot-directories
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presentation_follows_kind() {
        let dir = DirectoryEntry::new(PathBuf::from("/ws/src"), EntryKind::Directory);
        assert_eq!(dir.name, "src");
        assert!(dir.is_expandable());
        assert_eq!(dir.open_action(), None);

        let file = DirectoryEntry::new(PathBuf::from("/ws/a.txt"), EntryKind::File);
        assert!(!file.is_expandable());
        assert_eq!(
            file.open_action(),
            Some(OpenAction::Open(PathBuf::from("/ws/a.txt")))
        );
    }

    #[test]
    fn test_hidden_entries() {
        let entry = DirectoryEntry::new(PathBuf::from("/ws/.cit"), EntryKind::Directory);
        assert!(entry.is_hidden());
    }
}
