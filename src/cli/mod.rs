mod browse;
mod compile;
mod config_cmd;
mod edit;
mod list;
mod run;
mod submit;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, warn};

use crate::config::{self, Config};
use crate::error::Result;
use crate::logging::{self, LogLevel};
use crate::models::{Language, ProblemId};
use crate::workspace::Workspace;

#[derive(Parser)]
#[command(name = "cpc", version)]
#[command(about = "Competitive Programming Client", long_about = None)]
pub struct Cli {
    /// Log at this level to a temporary file
    #[arg(short, long = "log", value_enum, global = true)]
    pub log: Option<LogLevel>,

    /// Raise the log level; may be repeated
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.config/cpc/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse judges, contests and problems (the default)
    Browse,
    /// Print the contests, or the problems of one contest
    List { contest: Option<u32> },
    /// Open a problem's solution in the editor
    Edit {
        problem: ProblemId,
        #[arg(short = 'L', long, value_enum)]
        language: Option<Language>,
    },
    /// Compile a problem's solution
    Compile { problem: ProblemId },
    /// Compile and run a problem's solution on stdin
    Run { problem: ProblemId },
    /// Submit a problem's solution through the browser
    Submit { problem: ProblemId },
    /// Show the config path, or write a template with --init
    Config {
        #[arg(long)]
        init: bool,
    },
}

impl Commands {
    fn action(&self) -> &'static str {
        match self {
            Commands::Browse => "browse",
            Commands::List { .. } => "list problems",
            Commands::Edit { .. } => "edit",
            Commands::Compile { .. } => "compile",
            Commands::Run { .. } => "run",
            Commands::Submit { .. } => "submit",
            Commands::Config { .. } => "set up config",
        }
    }
}

/// What every command needs: the loaded config and the solution directory.
pub struct Context {
    pub config: Config,
    pub workspace: Workspace,
}

impl Context {
    fn load(path: &std::path::Path) -> Result<Self> {
        let config = config::load_config(path)?;
        let workspace = Workspace::new(config.solutions_root());
        Ok(Self { config, workspace })
    }
}

fn log_level(cli: &Cli) -> Option<LogLevel> {
    match (cli.log, cli.verbose) {
        (None, 0) => None,
        (level, verbose) => Some(level.unwrap_or(LogLevel::Warn).raised(verbose)),
    }
}

pub fn run(cli: Cli) {
    let log_path = log_level(&cli).and_then(|level| match logging::init_file_logging(level) {
        Ok(path) => Some(path),
        Err(e) => {
            eprintln!("Failed to set up logging: {}", e);
            None
        }
    });
    info!(args = ?std::env::args().collect::<Vec<_>>(), "cpc started");

    let command = cli.command.unwrap_or(Commands::Browse);
    let action = command.action();

    let result = resolve_config_path(cli.config).and_then(|path| match command {
        Commands::Config { init } => config_cmd::handle_config(&path, init).map(|()| 0),
        command => Context::load(&path).and_then(|context| dispatch(command, &context)),
    });

    if let Some(path) = &log_path {
        eprintln!("Log written to {}", path.display());
    }

    match result {
        Ok(0) => {}
        Ok(code) => {
            info!(code, "exiting with the program's status");
            std::process::exit(exit_status(code));
        }
        Err(e) => {
            warn!(error = %e, action, "command failed");
            eprintln!("Failed to {}: {}", action, e);
            std::process::exit(1);
        }
    }
}

/// Programs killed by a signal report no code of their own.
fn exit_status(code: i32) -> i32 {
    if code > 0 {
        code
    } else {
        1
    }
}

fn resolve_config_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => config::get_config_path(),
    }
}

/// Runs a command and returns the status cpc should exit with.
fn dispatch(command: Commands, context: &Context) -> Result<i32> {
    match command {
        Commands::Browse => browse::browse(context).map(|()| 0),
        Commands::List { contest } => list::list_problems(context, contest).map(|()| 0),
        Commands::Edit { problem, language } => {
            edit::edit_solution(context, &problem, language).map(|()| 0)
        }
        Commands::Compile { problem } => compile::compile_solution(context, &problem).map(|()| 0),
        Commands::Run { problem } => run::run_solution(context, &problem),
        Commands::Submit { problem } => submit::submit_solution(context, &problem).map(|()| 0),
        Commands::Config { .. } => Ok(0),
    }
}
