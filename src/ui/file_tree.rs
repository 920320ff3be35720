//! File tree structure
//!
//! Keeps the rows of the workspace tree: the root listing plus the children of
//! every expanded directory. Children are fetched through the provider when a
//! directory is expanded and re-fetched on reload; nothing else is cached.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::workspace::{DirectoryEntry, TreeProvider, WorkspaceError};

/// A row in the file tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub entry: DirectoryEntry,
    /// Depth in the tree (for indentation)
    pub depth: usize,
    /// Whether this folder is expanded
    pub expanded: bool,
}

/// Expanded-directory state of the workspace tree
#[derive(Debug, Default)]
pub struct TreeView {
    nodes: Vec<TreeNode>,
}

impl TreeView {
    /// Build the tree from the workspace root listing
    pub fn load(provider: &TreeProvider) -> Result<Self, WorkspaceError> {
        let mut view = Self::default();
        view.reload(provider)?;
        Ok(view)
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    /// Indices of the rows to display
    ///
    /// With `show_hidden` off, dotfiles and everything below a dot-directory
    /// are skipped.
    pub fn visible_indices(&self, show_hidden: bool) -> Vec<usize> {
        let mut result = Vec::with_capacity(self.nodes.len());
        let mut hidden_depth: Option<usize> = None;

        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(depth) = hidden_depth {
                if node.depth > depth {
                    continue;
                }
                hidden_depth = None;
            }

            if !show_hidden && node.entry.is_hidden() {
                hidden_depth = Some(node.depth);
                continue;
            }

            result.push(i);
        }

        result
    }

    /// Expand the directory at `index`, listing its children now
    pub fn expand(&mut self, index: usize, provider: &TreeProvider) -> Result<(), WorkspaceError> {
        let Some(node) = self.nodes.get(index) else {
            return Ok(());
        };
        if node.expanded || !node.entry.is_expandable() {
            return Ok(());
        }

        let depth = node.depth + 1;
        let children = provider.list_children(Some(&node.entry))?;

        self.nodes[index].expanded = true;
        let rows = children.into_iter().map(|entry| TreeNode {
            entry,
            depth,
            expanded: false,
        });
        self.nodes.splice(index + 1..index + 1, rows);

        Ok(())
    }

    /// Collapse the directory at `index`, dropping its descendant rows
    pub fn collapse(&mut self, index: usize) {
        let Some(node) = self.nodes.get_mut(index) else {
            return;
        };
        if !node.expanded {
            return;
        }
        node.expanded = false;

        let depth = node.depth;
        let end = self.nodes[index + 1..]
            .iter()
            .position(|n| n.depth <= depth)
            .map_or(self.nodes.len(), |offset| index + 1 + offset);
        self.nodes.drain(index + 1..end);
    }

    /// Expand or collapse the directory at `index`; files are left alone
    pub fn toggle(&mut self, index: usize, provider: &TreeProvider) -> Result<(), WorkspaceError> {
        match self.nodes.get(index) {
            Some(node) if node.expanded => {
                self.collapse(index);
                Ok(())
            }
            Some(_) => self.expand(index, provider),
            None => Ok(()),
        }
    }

    /// Index of the closest expanded ancestor row of `index`
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        let depth = self.nodes.get(index)?.depth;
        if depth == 0 {
            return None;
        }
        self.nodes[..index].iter().rposition(|n| n.depth < depth)
    }

    /// Re-read every listing, keeping directories expanded where they still exist
    pub fn reload(&mut self, provider: &TreeProvider) -> Result<(), WorkspaceError> {
        let expanded: HashSet<PathBuf> = self
            .nodes
            .iter()
            .filter(|n| n.expanded)
            .map(|n| n.entry.path.clone())
            .collect();

        let mut nodes = Vec::new();
        append_children(&mut nodes, provider, None, 0, &expanded)?;
        self.nodes = nodes;

        Ok(())
    }

    /// Row index of `path`, if currently listed
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.nodes.iter().position(|n| n.entry.path == path)
    }
}

fn append_children(
    nodes: &mut Vec<TreeNode>,
    provider: &TreeProvider,
    parent: Option<&DirectoryEntry>,
    depth: usize,
    expanded: &HashSet<PathBuf>,
) -> Result<(), WorkspaceError> {
    for entry in provider.list_children(parent)? {
        let is_expanded = entry.is_expandable() && expanded.contains(&entry.path);
        nodes.push(TreeNode {
            entry: entry.clone(),
            depth,
            expanded: is_expanded,
        });

        if is_expanded {
            append_children(nodes, provider, Some(&entry), depth + 1, expanded)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, TreeProvider) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs/drafts")).unwrap();
        fs::write(dir.path().join("docs/drafts/plan.md"), "").unwrap();
        fs::write(dir.path().join("docs/notes.md"), "").unwrap();
        fs::create_dir(dir.path().join(".cit")).unwrap();
        fs::write(dir.path().join(".cit/store"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        let provider = TreeProvider::new(dir.path().to_path_buf());
        (dir, provider)
    }

    fn names(view: &TreeView) -> Vec<(usize, String)> {
        view.nodes()
            .iter()
            .map(|n| (n.depth, n.entry.name.clone()))
            .collect()
    }

    fn row(view: &TreeView, name: &str) -> usize {
        view.nodes().iter().position(|n| n.entry.name == name).unwrap()
    }

    #[test]
    fn test_load_lists_root_only() {
        let (_dir, provider) = workspace();
        let view = TreeView::load(&provider).unwrap();

        assert_eq!(
            names(&view),
            vec![
                (0, ".cit".to_string()),
                (0, "docs".to_string()),
                (0, "a.txt".to_string()),
            ]
        );
    }

    #[test]
    fn test_expand_and_collapse() {
        let (_dir, provider) = workspace();
        let mut view = TreeView::load(&provider).unwrap();

        view.expand(row(&view, "docs"), &provider).unwrap();
        view.expand(row(&view, "drafts"), &provider).unwrap();
        assert_eq!(
            names(&view),
            vec![
                (0, ".cit".to_string()),
                (0, "docs".to_string()),
                (1, "drafts".to_string()),
                (2, "plan.md".to_string()),
                (1, "notes.md".to_string()),
                (0, "a.txt".to_string()),
            ]
        );
        assert_eq!(view.parent_of(row(&view, "plan.md")), Some(row(&view, "drafts")));

        view.collapse(row(&view, "docs"));
        assert_eq!(names(&view).len(), 3);
        assert!(!view.nodes()[row(&view, "docs")].expanded);
    }

    #[test]
    fn test_toggle_file_is_noop() {
        let (_dir, provider) = workspace();
        let mut view = TreeView::load(&provider).unwrap();

        view.toggle(row(&view, "a.txt"), &provider).unwrap();
        assert_eq!(names(&view).len(), 3);
    }

    #[test]
    fn test_hidden_entries_and_descendants_are_filtered() {
        let (_dir, provider) = workspace();
        let mut view = TreeView::load(&provider).unwrap();
        view.expand(row(&view, ".cit"), &provider).unwrap();

        assert_eq!(view.visible_indices(true).len(), 4);

        let visible: Vec<&str> = view
            .visible_indices(false)
            .into_iter()
            .map(|i| view.nodes()[i].entry.name.as_str())
            .collect();
        assert_eq!(visible, vec!["docs", "a.txt"]);
    }

    #[test]
    fn test_reload_keeps_expansion_and_sees_new_files() {
        let (dir, provider) = workspace();
        let mut view = TreeView::load(&provider).unwrap();
        view.expand(row(&view, "docs"), &provider).unwrap();

        fs::write(dir.path().join("docs/new.md"), "").unwrap();
        view.reload(&provider).unwrap();

        assert!(view.nodes()[row(&view, "docs")].expanded);
        assert!(view.position(&dir.path().join("docs/new.md")).is_some());
    }

    #[test]
    fn test_reload_drops_removed_directories() {
        let (dir, provider) = workspace();
        let mut view = TreeView::load(&provider).unwrap();
        view.expand(row(&view, "docs"), &provider).unwrap();

        fs::remove_dir_all(dir.path().join("docs")).unwrap();
        view.reload(&provider).unwrap();

        assert_eq!(
            names(&view),
            vec![(0, ".cit".to_string()), (0, "a.txt".to_string())]
        );
    }
}
