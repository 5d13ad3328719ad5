//! Turns natural-language tasks into vetted shell commands and runs them.
//!
//! - [`protocol`]: the pipeline stages (generate, extract, execute) and the
//!   plan/outcome types they exchange.
//! - [`validation`]: safety rules applied to a plan before it may run.
//! - [`agent`]: the interactive session that drives the pipeline and owns the
//!   retry budget.
//! - [`tools`]: side-effecting seams (HTTP transport, process runner) that
//!   tests replace with fakes.

pub mod agent;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod platform;
pub mod protocol;
pub mod tools;
pub mod ui;
pub mod validation;
