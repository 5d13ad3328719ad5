// src/protocol/executor.rs

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::platform::Platform;
use crate::protocol::{CommandPlan, ExecutionError, ExecutionOutcome};
use crate::tools::ProcessRunner;

/// Written to stderr by the shell after each command that succeeds.
const PROGRESS_MARKER: &str = "__task_agent_ok__";

static PROGRESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{PROGRESS_MARKER}[ \t]*\r?\n?")).expect("progress pattern is valid")
});

/// Runs an approved plan as one AND-sequenced shell invocation.
///
/// Every command shares the same shell, so `cd` and exported variables carry
/// over. The chain stops at the first failing command; nothing is rolled
/// back. There is no timeout: a hung command blocks the caller.
pub struct ExecutionEngine {
    runner: Box<dyn ProcessRunner>,
    platform: Platform,
}

impl ExecutionEngine {
    pub fn new(runner: Box<dyn ProcessRunner>, platform: Platform) -> Self {
        Self { runner, platform }
    }

    #[instrument(skip_all, fields(commands = plan.len()))]
    pub fn execute(&self, plan: &CommandPlan) -> ExecutionOutcome {
        if plan.is_empty() {
            return ExecutionOutcome::default();
        }
        debug!(chain = %plan.chained(), "executing plan");

        let script = guarded_script(plan, self.platform);
        let (exit_code, stdout, stderr, completed) = match self.runner.run(&script) {
            Ok(output) if output.success() => {
                return ExecutionOutcome {
                    stdout: output.stdout,
                    error: None,
                };
            }
            Ok(output) => {
                let (completed, stderr) = strip_progress(&output.stderr);
                (output.exit_code, output.stdout, stderr, completed)
            }
            Err(err) => (None, String::new(), format!("failed to start shell: {err}"), 0),
        };

        let index = completed.min(plan.len() - 1);
        let error = ExecutionError {
            index,
            command: plan.commands[index].clone(),
            exit_code,
            stderr,
        };
        warn!(%error, "plan aborted");
        ExecutionOutcome {
            stdout,
            error: Some(error),
        }
    }
}

/// The plan joined with `&&`, with a progress marker after every command.
pub fn guarded_script(plan: &CommandPlan, platform: Platform) -> String {
    plan.iter()
        .map(|command| match platform {
            Platform::Unix => format!("{{ {command}\n}} && echo {PROGRESS_MARKER} >&2"),
            Platform::Windows => format!("{command} && echo {PROGRESS_MARKER}>&2"),
        })
        .collect::<Vec<_>>()
        .join(" && ")
}

/// Counts completed commands and removes the markers from captured stderr.
fn strip_progress(stderr: &str) -> (usize, String) {
    let completed = PROGRESS_LINE.find_iter(stderr).count();
    (completed, PROGRESS_LINE.replace_all(stderr, "").into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ProcessOutput;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    /// Replays a fixed result and records the scripts it was handed.
    struct Scripted {
        result: Option<ProcessOutput>,
        ran: Rc<RefCell<Vec<String>>>,
    }

    impl ProcessRunner for Scripted {
        fn run(&self, line: &str) -> io::Result<ProcessOutput> {
            self.ran.borrow_mut().push(line.to_string());
            self.result
                .clone()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "sh not found"))
        }
    }

    fn engine(result: Option<ProcessOutput>) -> (ExecutionEngine, Rc<RefCell<Vec<String>>>) {
        let ran = Rc::new(RefCell::new(Vec::new()));
        let runner = Scripted {
            result,
            ran: ran.clone(),
        };
        (ExecutionEngine::new(Box::new(runner), Platform::Unix), ran)
    }

    #[test]
    fn unix_script_chains_commands_in_one_shell() {
        let plan = CommandPlan::from_lines(["mkdir demo", "cd demo"]);
        assert_eq!(
            guarded_script(&plan, Platform::Unix),
            "{ mkdir demo\n} && echo __task_agent_ok__ >&2 && { cd demo\n} && echo __task_agent_ok__ >&2"
        );
    }

    #[test]
    fn windows_script_uses_cmd_redirection() {
        let plan = CommandPlan::from_lines(["dir", "cd out"]);
        assert_eq!(
            guarded_script(&plan, Platform::Windows),
            "dir && echo __task_agent_ok__>&2 && cd out && echo __task_agent_ok__>&2"
        );
    }

    #[test]
    fn whole_plan_is_one_invocation() {
        let (engine, ran) = engine(Some(ProcessOutput {
            exit_code: Some(0),
            stdout: "hello\nworld\n".into(),
            stderr: format!("{PROGRESS_MARKER}\n{PROGRESS_MARKER}\n"),
        }));
        let outcome = engine.execute(&CommandPlan::from_lines(["echo hello", "echo world"]));

        assert!(outcome.is_success());
        assert_eq!(outcome.stdout, "hello\nworld\n");
        assert_eq!(ran.borrow().len(), 1);
    }

    #[test]
    fn failure_is_attributed_by_completed_markers() {
        let (engine, _) = engine(Some(ProcessOutput {
            exit_code: Some(2),
            stdout: "one\n".into(),
            stderr: format!("{PROGRESS_MARKER}\nboom"),
        }));
        let plan = CommandPlan::from_lines(["one", "two", "three"]);
        let error = engine.execute(&plan).error.unwrap();

        assert_eq!(error.index, 1);
        assert_eq!(error.command.as_str(), "two");
        assert_eq!(error.exit_code, Some(2));
        assert_eq!(error.stderr, "boom");
    }

    #[test]
    fn marker_after_unterminated_stderr_is_still_counted() {
        let (completed, stderr) = strip_progress(&format!("warn{PROGRESS_MARKER}\r\n"));
        assert_eq!(completed, 1);
        assert_eq!(stderr, "warn");
    }

    #[test]
    fn spawn_error_is_an_execution_failure() {
        let (engine, _) = engine(None);
        let error = engine.execute(&CommandPlan::from_lines(["ls"])).error.unwrap();
        assert_eq!(error.index, 0);
        assert_eq!(error.exit_code, None);
        assert!(error.stderr.contains("sh not found"));
    }

    #[test]
    fn empty_plan_succeeds_without_running_anything() {
        let (engine, ran) = engine(None);
        assert!(engine.execute(&CommandPlan::default()).is_success());
        assert!(ran.borrow().is_empty());
    }
}
