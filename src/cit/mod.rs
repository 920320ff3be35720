//! External `cit` tool integration
//!
//! Provides the workflow that drives the external version tool:
//! - Command requests and their command lines
//! - Parsing of the `--list` output
//! - Subprocess execution and outcome classification
//! - The prompt/notify host abstraction and the orchestrator tying it together

mod error;
mod host;
mod listing;
mod orchestrator;
mod request;
mod runner;

pub use error::CitError;
pub use host::{Host, Notification, NotificationKind};
pub use listing::parse_version_listing;
pub use orchestrator::{AbortReason, Orchestrator, Outcome};
pub use request::{CommandRequest, Invocation, Operation};
pub use runner::{ProcessRunner, ToolOutput, ToolRunner, classify};
