//! Main application struct and event loop
//!
//! Contains the App struct with all application state,
//! and the main event loop for handling input and rendering.

use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::cit::{Notification, Operation, Orchestrator, ProcessRunner};
use crate::config::{Config, MAX_SIDEBAR_WIDTH, MIN_SIDEBAR_WIDTH};
use crate::prompt::{HostRequest, Prompt, PromptKind, TuiHost};
use crate::ui::{
    Styles, TreeNode, TreeView, output_view::calculate_total_lines, render_footer,
    render_header, render_help_popup, render_input_popup, render_output, render_pick_popup,
    render_sidebar,
};
use crate::workspace::{DirectoryEntry, OpenAction, Subscription, TreeProvider};

/// View mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Workspace tree and output
    Tree,
    /// Help overlay
    Help,
}

/// What the event loop should do after a key press
enum KeyAction {
    None,
    Quit,
    Open(PathBuf),
}

const MOUSE_SCROLL_LINES: i32 = 3;
const SIDEBAR_RESIZE_STEP: u16 = 5;
const OUTPUT_SCROLL_LINES: i32 = 3;
/// Oldest notifications are dropped beyond this many
const MAX_NOTIFICATIONS: usize = 500;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Main application state
pub struct App {
    // Window dimensions
    width: u16,
    height: u16,
    output_area: Rect,

    config: Config,

    // Workspace tree
    provider: TreeProvider,
    tree: TreeView,
    tree_dirty: Arc<AtomicBool>,
    _refresh_subscription: Subscription,

    // View state
    view_mode: ViewMode,
    show_hidden: bool,
    sidebar_width: u16,
    cursor: usize,
    sidebar_scroll: usize,
    output_scroll: usize,

    // Notifications and open prompts
    notifications: VecDeque<Notification>,
    prompts: VecDeque<Prompt>,

    // Orchestration
    runtime: Runtime,
    orchestrator: Arc<Orchestrator<ProcessRunner>>,
    host: TuiHost,
    host_rx: mpsc::UnboundedReceiver<HostRequest>,
    running: usize,

    styles: Styles,
}

impl App {
    /// Create a new App instance
    pub fn new(workspace_root: PathBuf, config: Config) -> Result<Self> {
        let provider = TreeProvider::new(workspace_root.clone());
        let tree = TreeView::load(&provider).with_context(|| {
            format!("Failed to read workspace {}", workspace_root.display())
        })?;

        // Command completion and manual refresh both go through the provider
        let tree_dirty = Arc::new(AtomicBool::new(false));
        let dirty = Arc::clone(&tree_dirty);
        let refresh_subscription = provider.subscribe(move || dirty.store(true, Ordering::SeqCst));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("citview-worker")
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;

        let orchestrator = Arc::new(Orchestrator::new(
            config.tool.clone(),
            workspace_root,
            ProcessRunner,
        ));
        let (host, host_rx) = TuiHost::channel();

        Ok(Self {
            width: 0,
            height: 0,
            output_area: Rect::default(),
            show_hidden: config.show_hidden,
            sidebar_width: config.sidebar_width,
            config,
            provider,
            tree,
            tree_dirty,
            _refresh_subscription: refresh_subscription,
            view_mode: ViewMode::Tree,
            cursor: 0,
            sidebar_scroll: 0,
            output_scroll: 0,
            notifications: VecDeque::new(),
            prompts: VecDeque::new(),
            runtime,
            orchestrator,
            host,
            host_rx,
            running: 0,
            styles: Styles::new(),
        })
    }

    /// Run the application
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(&mut self, terminal: &mut Term) -> Result<()> {
        loop {
            self.drain_host_requests();
            self.reload_tree_if_dirty();

            // Draw
            terminal.draw(|frame| {
                self.width = frame.area().width;
                self.height = frame.area().height;
                self.render(frame);
            })?;

            // Handle events
            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) => match self.handle_key(key) {
                        KeyAction::Quit => break,
                        KeyAction::Open(path) => self.open_in_editor(terminal, &path)?,
                        KeyAction::None => {}
                    },
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse);
                    }
                    Event::Resize(w, h) => {
                        self.width = w;
                        self.height = h;
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Apply everything orchestration tasks sent since the last frame
    fn drain_host_requests(&mut self) {
        while let Ok(request) = self.host_rx.try_recv() {
            match request {
                HostRequest::Notify(notification) => self.push_notification(notification),
                HostRequest::Prompt(prompt) => self.prompts.push_back(prompt),
                HostRequest::Finished => {
                    self.running = self.running.saturating_sub(1);
                    self.provider.refresh();
                }
            }
        }
    }

    fn push_notification(&mut self, notification: Notification) {
        if self.notifications.len() >= MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(notification);
        // Follow the newest entry
        self.output_scroll = 0;
    }

    fn reload_tree_if_dirty(&mut self) {
        if !self.tree_dirty.swap(false, Ordering::SeqCst) {
            return;
        }

        let selected = self.selected_entry().map(|e| e.path.clone());
        if let Err(err) = self.tree.reload(&self.provider) {
            error!(%err, "tree reload failed");
            self.push_notification(Notification::error(err.to_string()));
        }
        self.restore_cursor(selected.as_deref());
    }

    /// Render the application
    fn render(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        // Layout: header (1) + content + footer (1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let header_area = chunks[0];
        let content_area = chunks[1];
        let footer_area = chunks[2];

        // Split content into sidebar + output
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(self.sidebar_width),
                Constraint::Min(0),
            ])
            .split(content_area);

        let sidebar_area = content_chunks[0];
        let output_area = content_chunks[1];
        self.output_area = output_area;

        let workspace = self.provider.root().display().to_string();
        let root = self.provider.root();
        let selected = self
            .selected_entry()
            .filter(|e| self.provider.contains(e.path()))
            .and_then(|e| e.path().strip_prefix(root).ok())
            .map(|relative| relative.display().to_string());

        render_header(
            frame.buffer_mut(),
            header_area,
            &workspace,
            self.orchestrator.tool(),
            self.running,
            selected.as_deref(),
            &self.styles,
        );

        let visible = self.tree.visible_indices(self.show_hidden);
        let hidden_count = self.tree.nodes().len() - visible.len();
        let rows: Vec<&TreeNode> = visible
            .iter()
            .filter_map(|&i| self.tree.get(i))
            .collect();
        let root_name = self
            .provider
            .root()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| workspace.clone());

        render_sidebar(
            frame.buffer_mut(),
            sidebar_area,
            &rows,
            self.cursor,
            self.sidebar_scroll,
            &root_name,
            hidden_count,
            &self.styles,
        );

        self.output_scroll = self.output_scroll.min(self.max_output_scroll());
        render_output(
            frame.buffer_mut(),
            output_area,
            &self.notifications,
            self.output_scroll,
            &self.styles,
        );

        render_footer(
            frame.buffer_mut(),
            footer_area,
            self.show_hidden,
            !self.prompts.is_empty(),
            &self.styles,
        );

        if let Some(prompt) = self.prompts.front() {
            match &prompt.kind {
                PromptKind::Input {
                    title,
                    placeholder,
                    value,
                } => render_input_popup(frame.buffer_mut(), area, title, placeholder, value, &self.styles),
                PromptKind::Pick {
                    title,
                    items,
                    filter,
                    cursor,
                } => render_pick_popup(frame.buffer_mut(), area, title, items, *cursor, filter, &self.styles),
            }
        } else if self.view_mode == ViewMode::Help {
            render_help_popup(frame.buffer_mut(), area, &self.styles);
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        // An open prompt owns the keyboard
        if let Some(prompt) = self.prompts.front_mut() {
            if let Some(answer) = prompt.handle_key(key) {
                if let Some(prompt) = self.prompts.pop_front() {
                    prompt.resolve(answer);
                }
            }
            return KeyAction::None;
        }

        match self.view_mode {
            ViewMode::Tree => self.handle_tree_key(key),
            ViewMode::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                    self.view_mode = ViewMode::Tree;
                }
                KeyAction::None
            }
        }
    }

    /// Handle keys in the tree view
    fn handle_tree_key(&mut self, key: KeyEvent) -> KeyAction {
        match (key.code, key.modifiers) {
            // Quit
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => return KeyAction::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return KeyAction::Quit,

            // Navigation
            (KeyCode::Char('j') | KeyCode::Down, _) => self.move_cursor(1),
            (KeyCode::Char('k') | KeyCode::Up, _) => self.move_cursor(-1),
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                self.move_cursor(self.sidebar_visible_height() as i32 / 2);
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.move_cursor(-(self.sidebar_visible_height() as i32 / 2));
            }
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => self.set_cursor(0),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => {
                self.set_cursor(self.visible_len().saturating_sub(1));
            }
            (KeyCode::Enter, _) => return self.activate_selection(),
            (KeyCode::Char('l') | KeyCode::Right, _) => {
                if self.selected_entry().is_some_and(DirectoryEntry::is_dir) {
                    self.expand_selection();
                } else {
                    return self.activate_selection();
                }
            }
            (KeyCode::Char('h') | KeyCode::Left, _) => self.collapse_selection(),
            (KeyCode::Char(' '), _) => self.toggle_selection(),

            // Output pane
            (KeyCode::Char('J'), _) => self.scroll_output(-OUTPUT_SCROLL_LINES),
            (KeyCode::Char('K'), _) => self.scroll_output(OUTPUT_SCROLL_LINES),

            // External tool
            (KeyCode::Char('i'), KeyModifiers::NONE) => self.spawn_operation(Operation::Init),
            (KeyCode::Char('a'), KeyModifiers::NONE) => self.spawn_operation(Operation::Add),
            (KeyCode::Char('c'), KeyModifiers::NONE) => self.spawn_operation(Operation::Commit),
            (KeyCode::Char('s'), KeyModifiers::NONE) => self.spawn_operation(Operation::Switch),

            // View
            (KeyCode::Char('r'), _) => self.provider.refresh(),
            (KeyCode::Char('.'), _) => {
                let selected = self.selected_entry().map(|e| e.path.clone());
                self.show_hidden = !self.show_hidden;
                self.restore_cursor(selected.as_deref());
            }
            (KeyCode::Char('['), _) => {
                self.sidebar_width = self
                    .sidebar_width
                    .saturating_sub(SIDEBAR_RESIZE_STEP)
                    .max(MIN_SIDEBAR_WIDTH);
            }
            (KeyCode::Char(']'), _) => {
                self.sidebar_width = (self.sidebar_width + SIDEBAR_RESIZE_STEP).min(MAX_SIDEBAR_WIDTH);
            }
            (KeyCode::Char('?'), _) => self.view_mode = ViewMode::Help,

            _ => {}
        }

        KeyAction::None
    }

    /// Start an orchestration for the selected entry on the runtime
    fn spawn_operation(&mut self, operation: Operation) {
        let target = self.selected_entry().cloned();
        let orchestrator = Arc::clone(&self.orchestrator);
        let host = self.host.clone();

        info!(%operation, target = ?target.as_ref().map(|e| &e.path), "starting operation");
        self.running += 1;

        self.runtime.spawn(async move {
            orchestrator.execute(&host, operation, target.as_ref()).await;
            host.finished();
        });
    }

    /// Enter on a row: toggle folders, open files
    fn activate_selection(&mut self) -> KeyAction {
        let Some(entry) = self.selected_entry() else {
            return KeyAction::None;
        };

        match entry.open_action() {
            Some(OpenAction::Open(path)) => KeyAction::Open(path),
            None => {
                self.toggle_selection();
                KeyAction::None
            }
        }
    }

    fn expand_selection(&mut self) {
        if let Some(index) = self.selected_index() {
            if let Err(err) = self.tree.expand(index, &self.provider) {
                self.push_notification(Notification::error(err.to_string()));
            }
        }
    }

    fn toggle_selection(&mut self) {
        if let Some(index) = self.selected_index() {
            if let Err(err) = self.tree.toggle(index, &self.provider) {
                self.push_notification(Notification::error(err.to_string()));
            }
        }
    }

    /// Collapse the selected folder, or jump to the parent folder
    fn collapse_selection(&mut self) {
        let Some(index) = self.selected_index() else {
            return;
        };

        if self.tree.get(index).is_some_and(|n| n.expanded) {
            self.tree.collapse(index);
            return;
        }

        if let Some(parent) = self.tree.parent_of(index) {
            let path = self.tree.get(parent).map(|n| n.entry.path.clone());
            self.restore_cursor(path.as_deref());
        }
    }

    /// Suspend the UI and open `path` in the configured editor
    fn open_in_editor(&mut self, terminal: &mut Term, path: &Path) -> Result<()> {
        let command = self.config.editor_command();
        let Some((program, args)) = command.split_first() else {
            return Ok(());
        };
        info!(editor = %program, path = %path.display(), "opening file");

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

        let status = Command::new(program)
            .args(args)
            .arg(path)
            .current_dir(self.provider.root())
            .status();

        enable_raw_mode()?;
        execute!(terminal.backend_mut(), EnterAlternateScreen, EnableMouseCapture)?;
        terminal.clear()?;

        match status {
            Ok(status) if status.success() => {}
            Ok(status) => self.push_notification(Notification::error(format!(
                "Editor `{program}` exited with {status}"
            ))),
            Err(err) => self.push_notification(Notification::error(format!(
                "Failed to open {}: {err}",
                path.display()
            ))),
        }

        // The file may have been edited or renamed
        self.provider.refresh();
        Ok(())
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !self.prompts.is_empty() {
            return;
        }

        let in_sidebar = mouse.column < self.sidebar_width;
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                if in_sidebar {
                    self.scroll_sidebar(MOUSE_SCROLL_LINES);
                } else {
                    self.scroll_output(-MOUSE_SCROLL_LINES);
                }
            }
            MouseEventKind::ScrollUp => {
                if in_sidebar {
                    self.scroll_sidebar(-MOUSE_SCROLL_LINES);
                } else {
                    self.scroll_output(MOUSE_SCROLL_LINES);
                }
            }
            MouseEventKind::Down(MouseButton::Left) if in_sidebar => {
                self.handle_sidebar_click(mouse.row);
            }
            _ => {}
        }
    }

    fn handle_sidebar_click(&mut self, row: u16) {
        // Header line plus the sidebar's top border
        let inner_top = 2u16;
        let inner_height = self.height.saturating_sub(2).saturating_sub(2);

        if row < inner_top || row >= inner_top.saturating_add(inner_height) {
            return;
        }

        let index = self.sidebar_scroll + (row - inner_top) as usize;
        if index >= self.visible_len() {
            return;
        }

        self.set_cursor(index);
        self.toggle_selection();
    }

    /// Node index of the row under the cursor
    fn selected_index(&self) -> Option<usize> {
        self.tree.visible_indices(self.show_hidden).get(self.cursor).copied()
    }

    fn selected_entry(&self) -> Option<&DirectoryEntry> {
        self.selected_index()
            .and_then(|i| self.tree.get(i))
            .map(|n| &n.entry)
    }

    fn visible_len(&self) -> usize {
        self.tree.visible_indices(self.show_hidden).len()
    }

    fn sidebar_visible_height(&self) -> usize {
        let content_height = self.height.saturating_sub(2);
        content_height.saturating_sub(2) as usize
    }

    /// Put the cursor back on `path`, or keep it in range
    fn restore_cursor(&mut self, path: Option<&Path>) {
        let visible = self.tree.visible_indices(self.show_hidden);
        let position = path
            .and_then(|path| self.tree.position(path))
            .and_then(|node| visible.iter().position(|&i| i == node));

        self.set_cursor(position.unwrap_or(self.cursor));
    }

    fn set_cursor(&mut self, index: usize) {
        let total = self.visible_len();
        if total == 0 {
            self.cursor = 0;
            self.sidebar_scroll = 0;
            return;
        }

        self.cursor = index.min(total.saturating_sub(1));
        self.ensure_cursor_visible(total);
    }

    fn move_cursor(&mut self, delta: i32) {
        let new_cursor = if delta >= 0 {
            self.cursor.saturating_add(delta as usize)
        } else {
            self.cursor.saturating_sub((-delta) as usize)
        };
        self.set_cursor(new_cursor);
    }

    fn scroll_sidebar(&mut self, delta: i32) {
        let total = self.visible_len();
        let visible = self.sidebar_visible_height();
        if total <= visible || visible == 0 {
            self.sidebar_scroll = 0;
            return;
        }

        let max_scroll = total.saturating_sub(visible);
        let new_scroll = if delta >= 0 {
            self.sidebar_scroll.saturating_add(delta as usize)
        } else {
            self.sidebar_scroll.saturating_sub((-delta) as usize)
        };

        self.sidebar_scroll = new_scroll.min(max_scroll);
    }

    fn ensure_cursor_visible(&mut self, total: usize) {
        let visible = self.sidebar_visible_height();
        if visible == 0 {
            return;
        }

        if self.cursor < self.sidebar_scroll {
            self.sidebar_scroll = self.cursor;
        } else if self.cursor >= self.sidebar_scroll + visible {
            self.sidebar_scroll = self.cursor + 1 - visible;
        }

        let max_scroll = total.saturating_sub(visible);
        self.sidebar_scroll = self.sidebar_scroll.min(max_scroll);
    }

    /// Positive deltas scroll back into older output
    fn scroll_output(&mut self, delta: i32) {
        let new_scroll = if delta >= 0 {
            self.output_scroll.saturating_add(delta as usize)
        } else {
            self.output_scroll.saturating_sub((-delta) as usize)
        };
        self.output_scroll = new_scroll.min(self.max_output_scroll());
    }

    fn max_output_scroll(&self) -> usize {
        let inner_width = self.output_area.width.saturating_sub(2) as usize;
        let inner_height = self.output_area.height.saturating_sub(2) as usize;
        let total = calculate_total_lines(&self.notifications, inner_width, &self.styles);
        total.saturating_sub(inner_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_notification_history_keeps_newest() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(dir.path().to_path_buf(), Config::default()).unwrap();

        for i in 0..MAX_NOTIFICATIONS + 25 {
            app.push_notification(Notification::info(format!("Success: {i}")));
        }

        assert_eq!(app.notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(app.notifications.front().unwrap().text, "Success: 25");
        assert_eq!(
            app.notifications.back().unwrap().text,
            format!("Success: {}", MAX_NOTIFICATIONS + 24)
        );
    }
}
