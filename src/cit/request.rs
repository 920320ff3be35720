//! Command requests and the invocations built from them

use std::fmt;
use std::path::{Path, PathBuf};

/// Operation the user asked the external tool to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Init,
    Add,
    Commit,
    Switch,
}

impl Operation {
    /// Mode flag passed to the external tool
    pub fn flag(self) -> &'static str {
        match self {
            Operation::Init => "--init",
            Operation::Add => "--add",
            Operation::Commit => "--commit",
            Operation::Switch => "--switch",
        }
    }

    /// Whether this operation may target a directory
    pub fn accepts_directory(self) -> bool {
        matches!(self, Operation::Init)
    }

    /// Notice shown before the operation starts
    pub fn start_notice(self, target: &Path) -> String {
        let path = target.display();
        match self {
            Operation::Init => format!("Initializing cit for: {path}"),
            Operation::Add => format!("Adding version for file: {path}"),
            Operation::Commit => format!("Commit selected file: {path}"),
            Operation::Switch => format!("Switch selected file: {path}"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Init => "init",
            Operation::Add => "add",
            Operation::Commit => "commit",
            Operation::Switch => "switch",
        };
        f.write_str(name)
    }
}

/// A fully specified request, ready to become an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Absolute path of the file the command applies to
    pub target: PathBuf,
    pub operation: Operation,
    /// New version name for `add`, chosen version for `switch`
    pub argument: Option<String>,
}

impl CommandRequest {
    pub fn new(target: PathBuf, operation: Operation) -> Self {
        Self {
            target,
            operation,
            argument: None,
        }
    }

    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    /// Resolve into a subprocess of `tool` running in `cwd`
    pub fn invocation(&self, tool: &str, cwd: &Path) -> Invocation {
        let mut args = vec![
            self.target.to_string_lossy().into_owned(),
            self.operation.flag().to_string(),
        ];
        if let Some(argument) = &self.argument {
            args.push(argument.clone());
        }

        Invocation {
            program: tool.to_string(),
            args,
            cwd: cwd.to_path_buf(),
        }
    }
}

/// One subprocess call of the external tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory: the owning workspace root
    pub cwd: PathBuf,
}

impl Invocation {
    /// The `--list` call used to discover versions of `target`
    pub fn list_versions(tool: &str, target: &Path, cwd: &Path) -> Self {
        Self {
            program: tool.to_string(),
            args: vec![target.to_string_lossy().into_owned(), "--list".to_string()],
            cwd: cwd.to_path_buf(),
        }
    }

    /// Space-joined command line, as shown to the user and logged
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}
