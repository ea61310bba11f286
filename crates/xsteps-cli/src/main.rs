//! xsteps CLI
//!
//! Installs build tools into a local workspace and runs them with the
//! environment they were installed with.

mod cli;
mod commands;
mod error;
mod logging;

use std::io;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::{Cli, CmakeAction, Commands, ConfigAction};
use error::Result;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not set up logging: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!(workspace = %cli.workspace.display(), "starting");

    match run(cli) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Execute the parsed command and return the process exit code.
fn run(cli: Cli) -> Result<i32> {
    let workspace = cli.workspace;

    match cli.command {
        Commands::Cmake {
            local_conan_cache,
            action,
        } => match action {
            CmakeAction::Install { reference } => {
                commands::run_install(&workspace, local_conan_cache, reference.as_deref())?;
                Ok(0)
            }
            CmakeAction::Execute { args } => {
                commands::run_execute(&workspace, local_conan_cache, &args)
            }
            CmakeAction::Config { action } => {
                match action {
                    ConfigAction::Show => commands::run_config_show(&workspace)?,
                    ConfigAction::Set {
                        pairs,
                        allow_override,
                    } => commands::run_config_set(&workspace, &pairs, allow_override)?,
                }
                Ok(0)
            }
        },
        Commands::List => {
            commands::run_list(&workspace)?;
            Ok(0)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "xsteps", &mut io::stdout());
            Ok(0)
        }
    }
}
