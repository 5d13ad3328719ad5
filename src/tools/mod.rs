// src/tools/mod.rs

use std::io;

use serde::Serialize;

use crate::error::GenerationError;

pub mod llm;
pub mod run_command;

pub use llm::HttpTransport;
pub use run_command::ShellRunner;

/// Request body understood by the text-generation service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub inputs: String,
    pub parameters: GenerationParameters,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
}

/// Sends a prompt to a text-generation backend and returns the generated text.
pub trait Transport {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Captured result of running one command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a single command line to completion and captures its output.
pub trait ProcessRunner {
    fn run(&self, line: &str) -> io::Result<ProcessOutput>;
}
