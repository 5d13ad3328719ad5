// src/platform/mod.rs

use std::fmt;
use std::process::Command;

/// The OS family the agent generates, screens and runs commands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// Detects the family of the host this binary was built for.
    pub fn detect() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Shell dialect named in the generation instruction.
    pub fn dialect(self) -> &'static str {
        match self {
            Platform::Unix => "bash",
            Platform::Windows => "Windows CMD",
        }
    }

    /// Path separator that does not belong to this platform's shell.
    pub fn foreign_separator(self) -> char {
        match self {
            Platform::Unix => '\\',
            Platform::Windows => '/',
        }
    }

    /// Builds a process that runs `line` through the platform shell.
    pub fn shell_command(self, line: &str) -> Command {
        let mut cmd = match self {
            Platform::Unix => {
                let mut c = Command::new("sh");
                c.arg("-c");
                c
            }
            Platform::Windows => {
                let mut c = Command::new("cmd");
                c.arg("/C");
                c
            }
        };
        cmd.arg(line);
        cmd
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Unix => write!(f, "unix"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}
