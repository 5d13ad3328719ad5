// src/agent/mod.rs

//! Interactive loop that turns a task into executed commands.
//!
//! The controller walks the states below, asking the [`Frontend`] for input
//! and decisions at each gate:
//!
//! ```text
//! AwaitingTask -> Generating -> Extracting -> Validating
//!     -> AwaitingExecConfirmation -> Executing -> AwaitingSuccessConfirmation
//!     -> Done | Retrying -> Generating
//! ```
//!
//! Only an executed plan costs an attempt. Empty, unsafe or declined plans
//! send the user back to enter a task without touching the budget.

use anyhow::Result;
use tracing::{debug, info};

use crate::error::GenerationError;
use crate::model::{RetryState, Task};
use crate::protocol::executor::ExecutionEngine;
use crate::protocol::extractor::extract;
use crate::protocol::planner::PlanGenerator;
use crate::protocol::{CommandPlan, ExecutionError};
use crate::validation::{Rejection, SafetyValidator, ValidationVerdict};

pub const EXIT_KEYWORD: &str = "exit";

/// Something the user should be told about.
#[derive(Debug)]
pub enum SessionEvent<'a> {
    Started,
    GenerationFailed(&'a GenerationError),
    NoCommands,
    PlanProposed(&'a CommandPlan),
    PlanRejected(&'a Rejection),
    CommandOutput(&'a str),
    CommandFailed(&'a ExecutionError),
    Retrying { attempt: u32, max_attempts: u32 },
    Completed,
    RetriesExhausted,
    Exiting,
}

/// Everything interactive: input, yes/no gates and user-facing messages.
pub trait Frontend {
    fn read_task(&mut self) -> Result<String>;
    fn confirm_execution(&mut self, plan: &CommandPlan) -> Result<bool>;
    fn confirm_success(&mut self) -> Result<bool>;
    fn read_feedback(&mut self) -> Result<String>;
    fn notify(&mut self, event: SessionEvent<'_>);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The user typed the exit keyword.
    Exited,
    /// The user confirmed the task was done.
    Completed,
    RetriesExhausted,
}

#[derive(Debug)]
enum State {
    AwaitingTask,
    Generating,
    Extracting(String),
    Validating(CommandPlan),
    AwaitingExecConfirmation(CommandPlan),
    Executing(CommandPlan),
    AwaitingSuccessConfirmation,
    Retrying,
    Done(SessionOutcome),
}

pub struct Session<F: Frontend> {
    generator: PlanGenerator,
    validator: SafetyValidator,
    engine: ExecutionEngine,
    frontend: F,
    task: Task,
    retry: RetryState,
}

impl<F: Frontend> Session<F> {
    pub fn new(
        generator: PlanGenerator,
        validator: SafetyValidator,
        engine: ExecutionEngine,
        frontend: F,
        max_retries: u32,
    ) -> Self {
        Self {
            generator,
            validator,
            engine,
            frontend,
            task: Task::new(""),
            retry: RetryState::new(max_retries),
        }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn retry_state(&self) -> RetryState {
        self.retry
    }

    pub fn into_frontend(self) -> F {
        self.frontend
    }

    /// Drives the loop until the user exits, confirms success, or the budget runs out.
    pub fn run(&mut self) -> Result<SessionOutcome> {
        self.frontend.notify(SessionEvent::Started);
        let mut state = State::AwaitingTask;
        loop {
            debug!(?state, "session state");
            state = match self.advance(state)? {
                State::Done(outcome) => {
                    info!(?outcome, attempts = self.retry.attempts(), "session finished");
                    return Ok(outcome);
                }
                next => next,
            };
        }
    }

    fn advance(&mut self, state: State) -> Result<State> {
        let next = match state {
            State::AwaitingTask => {
                let input = self.frontend.read_task()?;
                if input.trim().eq_ignore_ascii_case(EXIT_KEYWORD) {
                    self.frontend.notify(SessionEvent::Exiting);
                    State::Done(SessionOutcome::Exited)
                } else {
                    self.task = Task::new(&input);
                    State::Generating
                }
            }
            State::Generating => {
                let text = match self.generator.try_generate(self.task.description()) {
                    Ok(text) => text,
                    Err(err) => {
                        self.frontend.notify(SessionEvent::GenerationFailed(&err));
                        String::new()
                    }
                };
                State::Extracting(text)
            }
            State::Extracting(text) => {
                let plan = extract(&text);
                if plan.is_empty() {
                    self.frontend.notify(SessionEvent::NoCommands);
                    State::AwaitingTask
                } else {
                    self.frontend.notify(SessionEvent::PlanProposed(&plan));
                    State::Validating(plan)
                }
            }
            State::Validating(plan) => match self.validator.validate(&plan) {
                ValidationVerdict::Approved => State::AwaitingExecConfirmation(plan),
                ValidationVerdict::Rejected(rejection) => {
                    self.frontend.notify(SessionEvent::PlanRejected(&rejection));
                    State::AwaitingTask
                }
            },
            State::AwaitingExecConfirmation(plan) => {
                if self.frontend.confirm_execution(&plan)? {
                    State::Executing(plan)
                } else {
                    State::AwaitingTask
                }
            }
            State::Executing(plan) => {
                let outcome = self.engine.execute(&plan);
                match &outcome.error {
                    None => {
                        if !outcome.stdout.is_empty() {
                            self.frontend
                                .notify(SessionEvent::CommandOutput(&outcome.stdout));
                        }
                        State::AwaitingSuccessConfirmation
                    }
                    Some(error) => {
                        self.frontend.notify(SessionEvent::CommandFailed(error));
                        State::Retrying
                    }
                }
            }
            State::AwaitingSuccessConfirmation => {
                if self.frontend.confirm_success()? {
                    self.frontend.notify(SessionEvent::Completed);
                    State::Done(SessionOutcome::Completed)
                } else {
                    State::Retrying
                }
            }
            State::Retrying => {
                self.retry.record_attempt();
                if self.retry.is_exhausted() {
                    self.frontend.notify(SessionEvent::RetriesExhausted);
                    State::Done(SessionOutcome::RetriesExhausted)
                } else {
                    let feedback = self.frontend.read_feedback()?;
                    self.task.append_feedback(&feedback);
                    self.frontend.notify(SessionEvent::Retrying {
                        attempt: self.retry.attempts(),
                        max_attempts: self.retry.max_attempts(),
                    });
                    State::Generating
                }
            }
            State::Done(outcome) => State::Done(outcome),
        };
        Ok(next)
    }
}
