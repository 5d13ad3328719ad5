use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use task_agent::agent::Session;
use task_agent::config::Config;
use task_agent::logging;
use task_agent::platform::Platform;
use task_agent::protocol::executor::ExecutionEngine;
use task_agent::protocol::planner::PlanGenerator;
use task_agent::tools::ShellRunner;
use task_agent::ui::TerminalFrontend;
use task_agent::validation::SafetyValidator;

#[derive(Parser)]
#[command(
    name = "task-agent",
    version,
    about = "Turn tasks into shell commands, check them, and run them"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive session.
    Chat {
        /// Maximum number of plan executions before giving up.
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
        max_retries: u32,
    },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Chat { max_retries } => cmd_chat(max_retries),
    }
}

fn cmd_chat(max_retries: u32) -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("load configuration")?;
    let platform = Platform::detect();
    info!(%platform, max_retries, "starting session");

    let generator =
        PlanGenerator::from_config(&config, platform).context("build generation client")?;
    let mut session = Session::new(
        generator,
        SafetyValidator::for_platform(platform),
        ExecutionEngine::new(Box::new(ShellRunner::new(platform)), platform),
        TerminalFrontend::new(),
        max_retries,
    );
    session.run()?;
    Ok(())
}
