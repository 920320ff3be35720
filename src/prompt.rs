//! Terminal implementation of the orchestrator's host
//!
//! Orchestrations run as tokio tasks. Each prompt travels to the UI thread as
//! a [`HostRequest`] carrying a oneshot reply; the task waits on that reply
//! while the event loop keeps drawing. A reply dropped unanswered reads as a
//! cancellation.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::cit::{Host, Notification};
use crate::ui::filter_items;

/// What an open prompt is asking for
#[derive(Debug)]
pub enum PromptKind {
    /// Free-text entry
    Input {
        title: String,
        placeholder: String,
        value: String,
    },
    /// Choice from a list, narrowed by typing
    Pick {
        title: String,
        items: Vec<String>,
        filter: String,
        cursor: usize,
    },
}

/// A modal prompt waiting for the user
#[derive(Debug)]
pub struct Prompt {
    pub kind: PromptKind,
    reply: oneshot::Sender<Option<String>>,
}

impl Prompt {
    pub fn input(title: &str, placeholder: &str) -> (Self, oneshot::Receiver<Option<String>>) {
        let (reply, rx) = oneshot::channel();
        let prompt = Self {
            kind: PromptKind::Input {
                title: title.to_string(),
                placeholder: placeholder.to_string(),
                value: String::new(),
            },
            reply,
        };
        (prompt, rx)
    }

    pub fn pick(title: &str, items: Vec<String>) -> (Self, oneshot::Receiver<Option<String>>) {
        let (reply, rx) = oneshot::channel();
        let prompt = Self {
            kind: PromptKind::Pick {
                title: title.to_string(),
                items,
                filter: String::new(),
                cursor: 0,
            },
            reply,
        };
        (prompt, rx)
    }

    /// Feed a key to the prompt
    ///
    /// Returns `Some(answer)` once the prompt is finished: `Some(Some(text))`
    /// on confirm, `Some(None)` on cancel. `None` means still open.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Option<String>> {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return Some(None);
        }

        match &mut self.kind {
            PromptKind::Input { value, .. } => match (key.code, key.modifiers) {
                (KeyCode::Enter, _) => return Some(Some(value.clone())),
                (KeyCode::Backspace, _) => {
                    value.pop();
                }
                (KeyCode::Char('u'), KeyModifiers::CONTROL) => value.clear(),
                (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
                    value.push(c);
                }
                _ => {}
            },
            PromptKind::Pick {
                items,
                filter,
                cursor,
                ..
            } => {
                let matches = filter_items(items, filter);
                match (key.code, key.modifiers) {
                    (KeyCode::Enter, _) => {
                        if let Some(&index) = matches.get(*cursor) {
                            return Some(Some(items[index].clone()));
                        }
                    }
                    (KeyCode::Down, _) | (KeyCode::Char('n'), KeyModifiers::CONTROL) => {
                        if *cursor + 1 < matches.len() {
                            *cursor += 1;
                        }
                    }
                    (KeyCode::Up, _) | (KeyCode::Char('p'), KeyModifiers::CONTROL) => {
                        *cursor = cursor.saturating_sub(1);
                    }
                    (KeyCode::Backspace, _) => {
                        filter.pop();
                        *cursor = 0;
                    }
                    (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
                        filter.push(c);
                        *cursor = 0;
                    }
                    _ => {}
                }
            }
        }

        None
    }

    /// Send the answer back to the waiting orchestration
    pub fn resolve(self, answer: Option<String>) {
        debug!(answered = answer.is_some(), "prompt closed");
        // The task may have gone away; nothing is waiting then
        let _ = self.reply.send(answer);
    }
}

/// Messages from orchestration tasks to the UI thread
#[derive(Debug)]
pub enum HostRequest {
    Notify(Notification),
    Prompt(Prompt),
    /// An orchestration finished; the workspace may have changed
    Finished,
}

/// `Host` backed by the terminal event loop
#[derive(Debug, Clone)]
pub struct TuiHost {
    tx: mpsc::UnboundedSender<HostRequest>,
}

impl TuiHost {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<HostRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Tell the UI an orchestration is done
    pub fn finished(&self) {
        let _ = self.tx.send(HostRequest::Finished);
    }

    async fn ask(&self, prompt: Prompt, rx: oneshot::Receiver<Option<String>>) -> Option<String> {
        self.tx.send(HostRequest::Prompt(prompt)).ok()?;
        rx.await.ok().flatten()
    }
}

impl Host for TuiHost {
    async fn input_box(&self, prompt: &str, placeholder: &str) -> Option<String> {
        let (prompt, rx) = Prompt::input(prompt, placeholder);
        self.ask(prompt, rx).await
    }

    async fn quick_pick(&self, items: Vec<String>, placeholder: &str) -> Option<String> {
        let (prompt, rx) = Prompt::pick(placeholder, items);
        self.ask(prompt, rx).await
    }

    fn notify(&self, notification: Notification) {
        let _ = self.tx.send(HostRequest::Notify(notification));
    }
}
