//! Command orchestration
//!
//! Turns one user-triggered operation on a tree entry into at most one
//! invocation of the external tool. Missing input, a cancelled prompt or an
//! empty version listing aborts the operation before anything is spawned.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::{
    CitError, CommandRequest, Host, Invocation, Notification, Operation, ToolRunner, classify,
    parse_version_listing,
};
use crate::workspace::DirectoryEntry;

/// Why an operation stopped before running the tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    NoSelection,
    NotAFile,
    OutsideWorkspace,
    MissingVersionName,
    ListingFailed,
    NoVersions,
    NoVersionSelected,
}

/// Terminal result of one orchestration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Stopped before the final invocation
    Aborted(AbortReason),
    /// Launch failure, non-zero exit or non-empty error stream
    Failed(String),
    /// Captured standard output
    Succeeded(String),
}

/// Drives the external tool for one workspace
pub struct Orchestrator<R> {
    tool: String,
    workspace_root: PathBuf,
    runner: R,
}

impl<R: ToolRunner> Orchestrator<R> {
    pub fn new(tool: impl Into<String>, workspace_root: PathBuf, runner: R) -> Self {
        Self {
            tool: tool.into(),
            workspace_root,
            runner,
        }
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Run `operation` on `target`, prompting through `host` as needed
    ///
    /// Every path reports to the user through `host` exactly once with the
    /// final result (or the reason it was aborted).
    pub async fn execute<H: Host>(
        &self,
        host: &H,
        operation: Operation,
        target: Option<&DirectoryEntry>,
    ) -> Outcome {
        let outcome = self.drive(host, operation, target).await;
        match &outcome {
            Outcome::Aborted(reason) => warn!(%operation, ?reason, "operation aborted"),
            Outcome::Failed(message) => warn!(%operation, %message, "operation failed"),
            Outcome::Succeeded(_) => info!(%operation, "operation succeeded"),
        }
        outcome
    }

    async fn drive<H: Host>(
        &self,
        host: &H,
        operation: Operation,
        target: Option<&DirectoryEntry>,
    ) -> Outcome {
        let Some(target) = target else {
            host.notify(Notification::error("No file selected"));
            return Outcome::Aborted(AbortReason::NoSelection);
        };

        if target.is_dir() && !operation.accepts_directory() {
            host.notify(Notification::error(format!("Select a file to {operation}")));
            return Outcome::Aborted(AbortReason::NotAFile);
        }

        if !target.path.starts_with(&self.workspace_root) {
            host.notify(Notification::error("No workspace folder found"));
            return Outcome::Aborted(AbortReason::OutsideWorkspace);
        }

        host.notify(Notification::info(operation.start_notice(&target.path)));

        let mut request = CommandRequest::new(target.path.clone(), operation);
        match operation {
            Operation::Add => {
                let name = host
                    .input_box("Enter new version name", "version_name")
                    .await
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty());

                let Some(name) = name else {
                    host.notify(Notification::warning(
                        "Adding version cancelled - no version name provided",
                    ));
                    return Outcome::Aborted(AbortReason::MissingVersionName);
                };
                request = request.with_argument(name);
            }
            Operation::Switch => {
                let versions = match self.list_versions(target).await {
                    Ok(versions) => versions,
                    Err(err) => {
                        host.notify(Notification::error(err.to_string()));
                        return Outcome::Aborted(AbortReason::ListingFailed);
                    }
                };

                if versions.is_empty() {
                    host.notify(Notification::warning("No versions available for this file"));
                    return Outcome::Aborted(AbortReason::NoVersions);
                }

                let choice = host
                    .quick_pick(versions.clone(), "Select version to switch to")
                    .await
                    .filter(|choice| versions.contains(choice));

                let Some(choice) = choice else {
                    host.notify(Notification::warning("Switch cancelled - no version selected"));
                    return Outcome::Aborted(AbortReason::NoVersionSelected);
                };
                request = request.with_argument(choice);
            }
            Operation::Init | Operation::Commit => {}
        }

        let invocation = request.invocation(&self.tool, &self.workspace_root);
        info!(command = %invocation.command_line(), "running external tool");

        let outcome = match self.runner.run(&invocation).await {
            Ok(output) => classify(&invocation, output),
            Err(err) => Outcome::Failed(err.to_string()),
        };

        match &outcome {
            Outcome::Failed(message) => {
                host.notify(Notification::error(format!("Error: {message}")));
            }
            Outcome::Succeeded(stdout) => {
                host.notify(Notification::info(format!("Success: {stdout}")));
            }
            Outcome::Aborted(_) => {}
        }

        outcome
    }

    /// Fetch the version identifiers of `target` from the tool's listing
    async fn list_versions(&self, target: &DirectoryEntry) -> Result<Vec<String>, CitError> {
        let invocation = Invocation::list_versions(&self.tool, &target.path, &self.workspace_root);
        debug!(command = %invocation.command_line(), "listing versions");

        let output = self
            .runner
            .run(&invocation)
            .await
            .map_err(|err| CitError::Listing(err.to_string()))?;

        if !output.success {
            let status = output
                .exit_code
                .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"));
            return Err(CitError::Listing(format!("{status}: {}", output.stderr.trim())));
        }

        let versions = parse_version_listing(&output.stdout);
        debug!(count = versions.len(), "parsed version listing");
        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cit::{NotificationKind, ToolOutput};
    use crate::workspace::EntryKind;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    const LISTING: &str = "Versions of /ws/a.txt\n----------\nv1: created yesterday\n\nv2: created today\n";

    /// Host answering prompts from a script and recording everything shown
    #[derive(Default)]
    struct ScriptedHost {
        inputs: Mutex<VecDeque<Option<String>>>,
        picks: Mutex<VecDeque<Option<String>>>,
        offered: Mutex<Vec<Vec<String>>>,
        notifications: Mutex<Vec<Notification>>,
    }

    impl ScriptedHost {
        fn with_input(answer: Option<&str>) -> Self {
            let host = Self::default();
            host.inputs.lock().unwrap().push_back(answer.map(String::from));
            host
        }

        fn with_pick(answer: Option<&str>) -> Self {
            let host = Self::default();
            host.picks.lock().unwrap().push_back(answer.map(String::from));
            host
        }

        fn notifications(&self) -> Vec<Notification> {
            self.notifications.lock().unwrap().clone()
        }

        fn last(&self) -> Notification {
            self.notifications().last().cloned().unwrap()
        }
    }

    impl Host for ScriptedHost {
        async fn input_box(&self, _prompt: &str, _placeholder: &str) -> Option<String> {
            self.inputs.lock().unwrap().pop_front().expect("unexpected input prompt")
        }

        async fn quick_pick(&self, items: Vec<String>, _placeholder: &str) -> Option<String> {
            self.offered.lock().unwrap().push(items);
            self.picks.lock().unwrap().pop_front().expect("unexpected quick pick")
        }

        fn notify(&self, notification: Notification) {
            self.notifications.lock().unwrap().push(notification);
        }
    }

    /// Runner replaying canned results and recording invocations
    #[derive(Clone, Default)]
    struct ScriptedRunner {
        results: Arc<Mutex<VecDeque<Result<ToolOutput, CitError>>>>,
        calls: Arc<Mutex<Vec<Invocation>>>,
    }

    impl ScriptedRunner {
        fn new(results: Vec<Result<ToolOutput, CitError>>) -> Self {
            Self {
                results: Arc::new(Mutex::new(results.into())),
                calls: Arc::default(),
            }
        }

        fn command_lines(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(Invocation::command_line).collect()
        }
    }

    impl ToolRunner for ScriptedRunner {
        async fn run(&self, invocation: &Invocation) -> Result<ToolOutput, CitError> {
            self.calls.lock().unwrap().push(invocation.clone());
            self.results.lock().unwrap().pop_front().expect("unexpected invocation")
        }
    }

    fn orchestrator(runner: &ScriptedRunner) -> Orchestrator<ScriptedRunner> {
        Orchestrator::new("cit", PathBuf::from("/ws"), runner.clone())
    }

    fn file(path: &str) -> DirectoryEntry {
        DirectoryEntry::new(PathBuf::from(path), EntryKind::File)
    }

    #[tokio::test]
    async fn test_add_builds_command_with_version_name() {
        let runner = ScriptedRunner::new(vec![Ok(ToolOutput::ok("added draft1\n", ""))]);
        let host = ScriptedHost::with_input(Some("draft1"));

        let outcome = orchestrator(&runner)
            .execute(&host, Operation::Add, Some(&file("/ws/a.txt")))
            .await;

        assert_eq!(outcome, Outcome::Succeeded("added draft1\n".to_string()));
        assert_eq!(runner.command_lines(), vec!["cit /ws/a.txt --add draft1"]);
        assert_eq!(runner.calls.lock().unwrap()[0].cwd, PathBuf::from("/ws"));
        assert_eq!(
            host.notifications(),
            vec![
                Notification::info("Adding version for file: /ws/a.txt"),
                Notification::info("Success: added draft1\n"),
            ]
        );
    }

    #[tokio::test]
    async fn test_add_cancelled_runs_nothing() {
        let runner = ScriptedRunner::default();
        let host = ScriptedHost::with_input(None);

        let outcome = orchestrator(&runner)
            .execute(&host, Operation::Add, Some(&file("/ws/a.txt")))
            .await;

        assert_eq!(outcome, Outcome::Aborted(AbortReason::MissingVersionName));
        assert!(runner.command_lines().is_empty());
        assert_eq!(host.last().kind, NotificationKind::Warning);
    }

    #[tokio::test]
    async fn test_add_blank_name_runs_nothing() {
        let runner = ScriptedRunner::default();
        let host = ScriptedHost::with_input(Some("   "));

        let outcome = orchestrator(&runner)
            .execute(&host, Operation::Add, Some(&file("/ws/a.txt")))
            .await;

        assert_eq!(outcome, Outcome::Aborted(AbortReason::MissingVersionName));
        assert!(runner.command_lines().is_empty());
    }

    #[tokio::test]
    async fn test_switch_offers_parsed_versions() {
        let runner = ScriptedRunner::new(vec![
            Ok(ToolOutput::ok(LISTING, "")),
            Ok(ToolOutput::ok("switched to v2\n", "")),
        ]);
        let host = ScriptedHost::with_pick(Some("v2"));

        let outcome = orchestrator(&runner)
            .execute(&host, Operation::Switch, Some(&file("/ws/a.txt")))
            .await;

        assert_eq!(outcome, Outcome::Succeeded("switched to v2\n".to_string()));
        assert_eq!(*host.offered.lock().unwrap(), vec![vec!["v1", "v2"]]);
        assert_eq!(
            runner.command_lines(),
            vec!["cit /ws/a.txt --list", "cit /ws/a.txt --switch v2"]
        );
    }

    #[tokio::test]
    async fn test_switch_without_versions_shows_no_prompt() {
        let runner = ScriptedRunner::new(vec![Ok(ToolOutput::ok("header\n----\n", ""))]);
        let host = ScriptedHost::default();

        let outcome = orchestrator(&runner)
            .execute(&host, Operation::Switch, Some(&file("/ws/a.txt")))
            .await;

        assert_eq!(outcome, Outcome::Aborted(AbortReason::NoVersions));
        assert!(host.offered.lock().unwrap().is_empty());
        assert_eq!(runner.command_lines(), vec!["cit /ws/a.txt --list"]);
        assert_eq!(
            host.last(),
            Notification::warning("No versions available for this file")
        );
    }

    #[tokio::test]
    async fn test_switch_cancelled_runs_nothing_more() {
        let runner = ScriptedRunner::new(vec![Ok(ToolOutput::ok(LISTING, ""))]);
        let host = ScriptedHost::with_pick(None);

        let outcome = orchestrator(&runner)
            .execute(&host, Operation::Switch, Some(&file("/ws/a.txt")))
            .await;

        assert_eq!(outcome, Outcome::Aborted(AbortReason::NoVersionSelected));
        assert_eq!(runner.command_lines(), vec!["cit /ws/a.txt --list"]);
        assert_eq!(host.last().kind, NotificationKind::Warning);
    }

    #[tokio::test]
    async fn test_switch_rejects_unlisted_choice() {
        let runner = ScriptedRunner::new(vec![Ok(ToolOutput::ok(LISTING, ""))]);
        let host = ScriptedHost::with_pick(Some("v9"));

        let outcome = orchestrator(&runner)
            .execute(&host, Operation::Switch, Some(&file("/ws/a.txt")))
            .await;

        assert_eq!(outcome, Outcome::Aborted(AbortReason::NoVersionSelected));
        assert_eq!(runner.command_lines().len(), 1);
    }

    #[tokio::test]
    async fn test_switch_listing_failure_aborts() {
        let runner = ScriptedRunner::new(vec![Ok(ToolOutput::failed(1, "", "not tracked\n"))]);
        let host = ScriptedHost::default();

        let outcome = orchestrator(&runner)
            .execute(&host, Operation::Switch, Some(&file("/ws/a.txt")))
            .await;

        assert_eq!(outcome, Outcome::Aborted(AbortReason::ListingFailed));
        assert_eq!(
            host.last(),
            Notification::error("Failed to list versions: exit code 1: not tracked")
        );
    }

    #[tokio::test]
    async fn test_stderr_with_zero_exit_reports_failure() {
        let runner = ScriptedRunner::new(vec![Ok(ToolOutput::ok("committed\n", "lock busy"))]);
        let host = ScriptedHost::default();

        let outcome = orchestrator(&runner)
            .execute(&host, Operation::Commit, Some(&file("/ws/a.txt")))
            .await;

        assert_eq!(outcome, Outcome::Failed("lock busy".to_string()));
        assert_eq!(host.last(), Notification::error("Error: lock busy"));
        assert!(host.notifications().iter().all(|n| !n.text.starts_with("Success")));
    }

    #[tokio::test]
    async fn test_launch_failure_is_reported() {
        let runner = ScriptedRunner::new(vec![Err(CitError::Launch {
            command: "cit /ws/a.txt --init".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })]);
        let host = ScriptedHost::default();

        let outcome = orchestrator(&runner)
            .execute(&host, Operation::Init, Some(&file("/ws/a.txt")))
            .await;

        assert!(matches!(outcome, Outcome::Failed(_)));
        let last = host.last();
        assert_eq!(last.kind, NotificationKind::Error);
        assert!(last.text.starts_with("Error: Failed to launch `cit /ws/a.txt --init`"));
    }

    #[tokio::test]
    async fn test_no_selection() {
        let runner = ScriptedRunner::default();
        let host = ScriptedHost::default();

        let outcome = orchestrator(&runner).execute(&host, Operation::Commit, None).await;

        assert_eq!(outcome, Outcome::Aborted(AbortReason::NoSelection));
        assert_eq!(host.notifications(), vec![Notification::error("No file selected")]);
    }

    #[tokio::test]
    async fn test_directory_only_for_init() {
        let runner = ScriptedRunner::new(vec![Ok(ToolOutput::ok("initialized\n", ""))]);
        let host = ScriptedHost::default();
        let dir = DirectoryEntry::new(PathBuf::from("/ws/docs"), EntryKind::Directory);
        let orchestrator = orchestrator(&runner);

        let outcome = orchestrator.execute(&host, Operation::Commit, Some(&dir)).await;
        assert_eq!(outcome, Outcome::Aborted(AbortReason::NotAFile));

        let outcome = orchestrator.execute(&host, Operation::Init, Some(&dir)).await;
        assert_eq!(outcome, Outcome::Succeeded("initialized\n".to_string()));
        assert_eq!(runner.command_lines(), vec!["cit /ws/docs --init"]);
    }

    #[tokio::test]
    async fn test_target_outside_workspace() {
        let runner = ScriptedRunner::default();
        let host = ScriptedHost::default();

        let outcome = orchestrator(&runner)
            .execute(&host, Operation::Commit, Some(&file("/elsewhere/a.txt")))
            .await;

        assert_eq!(outcome, Outcome::Aborted(AbortReason::OutsideWorkspace));
        assert_eq!(host.last(), Notification::error("No workspace folder found"));
    }
}
