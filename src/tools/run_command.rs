// src/tools/run_command.rs

use std::io;

use tracing::debug;

use crate::platform::Platform;
use crate::tools::{ProcessOutput, ProcessRunner};

/// Runs command lines through the host shell, waiting as long as they take.
pub struct ShellRunner {
    platform: Platform,
}

impl ShellRunner {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl ProcessRunner for ShellRunner {
    fn run(&self, line: &str) -> io::Result<ProcessOutput> {
        let out = self.platform.shell_command(line).output()?;
        let output = ProcessOutput {
            exit_code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        };
        debug!(line, exit_code = ?output.exit_code, "command finished");
        Ok(output)
    }
}
