// src/protocol/mod.rs

use std::fmt;

use thiserror::Error;

pub mod executor;
pub mod extractor;
pub mod planner;

/// A single trimmed, non-empty line of shell text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command(String);

impl Command {
    /// Returns `None` for lines that are blank once trimmed.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Commands proposed for one task, in the order they must run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandPlan {
    pub commands: Vec<Command>,
}

impl CommandPlan {
    /// Builds a plan from raw lines, dropping blank ones.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            commands: lines
                .into_iter()
                .filter_map(|line| Command::parse(line.as_ref()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// The plan as one AND-sequenced shell line.
    pub fn chained(&self) -> String {
        self.commands
            .iter()
            .map(Command::as_str)
            .collect::<Vec<_>>()
            .join(" && ")
    }
}

/// A command in the chain that did not complete successfully.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("command #{} `{command}` failed ({})", .index + 1, describe_exit(.exit_code))]
pub struct ExecutionError {
    pub index: usize,
    pub command: Command,
    pub exit_code: Option<i32>,
    pub stderr: String,
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code".to_string(),
    }
}

/// What running a plan produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Captured stdout of the run, partial if a command failed.
    pub stdout: String,
    pub error: Option<ExecutionError>,
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
