// src/ui/mod.rs

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, Input};

use crate::agent::{EXIT_KEYWORD, Frontend, SessionEvent};
use crate::protocol::CommandPlan;

/// Prompts on the terminal and prints colored status lines to stdout.
pub struct TerminalFrontend;

impl TerminalFrontend {
    pub fn new() -> Self {
        Self
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .with_context(|| format!("read answer to {prompt:?}"))
}

impl Frontend for TerminalFrontend {
    fn read_task(&mut self) -> Result<String> {
        Input::<String>::new()
            .with_prompt("Enter task")
            .interact_text()
            .context("read task")
    }

    fn confirm_execution(&mut self, _plan: &CommandPlan) -> Result<bool> {
        println!();
        confirm("Execute these commands?")
    }

    fn confirm_success(&mut self) -> Result<bool> {
        println!();
        confirm("Task completed successfully?")
    }

    fn read_feedback(&mut self) -> Result<String> {
        Input::<String>::new()
            .with_prompt("What went wrong?")
            .interact_text()
            .context("read feedback")
    }

    fn notify(&mut self, event: SessionEvent<'_>) {
        match event {
            SessionEvent::Started => println!(
                "{}",
                format!("\nAI Task Agent (type '{EXIT_KEYWORD}' to quit)\n")
                    .blue()
                    .bold()
            ),
            SessionEvent::GenerationFailed(err) => {
                println!("{}", format!("API Error: {err}").red());
            }
            SessionEvent::NoCommands => println!(
                "{}",
                "No valid commands generated. Please try again.".yellow()
            ),
            SessionEvent::PlanProposed(plan) => {
                println!("{}", "\nGenerated Plan:".green());
                for (i, command) in plan.iter().enumerate() {
                    println!("  {}. {}", i + 1, command);
                }
            }
            SessionEvent::PlanRejected(rejection) => {
                println!(
                    "{}",
                    format!("{}: {}", rejection.violation, rejection.command).red()
                );
                println!("{}", "Aborting due to dangerous commands!".red());
            }
            SessionEvent::CommandOutput(stdout) => println!("Output:\n{stdout}"),
            SessionEvent::CommandFailed(error) => {
                println!(
                    "{}",
                    format!("\nError executing command: {}", error.command).red()
                );
                println!("{}", format!("Error details:\n{}", error.stderr).red());
            }
            SessionEvent::Retrying {
                attempt,
                max_attempts,
            } => println!(
                "{}",
                format!("Retrying ({attempt}/{max_attempts})...\n").yellow()
            ),
            SessionEvent::Completed => println!("{}", "Success!".green()),
            SessionEvent::RetriesExhausted => {
                println!("{}", "\nMaximum retries exceeded. Exiting.".red());
            }
            SessionEvent::Exiting => println!("{}", "Exiting...".yellow()),
        }
    }
}
