//! UI module
//!
//! Contains all terminal UI components:
//! - Styles for consistent theming
//! - Workspace tree state and sidebar rendering
//! - Output pane for notifications and tool output
//! - Header and footer
//! - Prompt popups and help overlay

mod styles;
mod file_tree;
pub mod sidebar;
pub mod output_view;
mod header;
mod footer;
mod popup;

pub use styles::Styles;
pub use file_tree::{TreeNode, TreeView};
pub use sidebar::render_sidebar;
pub use output_view::render_output;
pub use header::render_header;
pub use footer::render_footer;
pub use popup::{filter_items, render_help_popup, render_input_popup, render_pick_popup};
