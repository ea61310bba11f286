//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

/// xsteps - Install and run build tools inside a local workspace
#[derive(Parser, Debug)]
#[command(name = "xsteps")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Workspace directory holding extension configs and installed tools
    #[arg(long, global = true, env = "XSTEPS_WORKSPACE", default_value = ".xsteps")]
    pub workspace: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Manage the CMake extension
    ///
    /// Examples:
    ///   xsteps cmake install                  # Install the configured version
    ///   xsteps cmake install cmake/3.21.0     # Install a specific version
    ///   xsteps cmake execute -- --version     # Run cmake with arguments
    Cmake {
        /// Keep the Conan cache inside the workspace instead of the user's home
        #[arg(long, action = ArgAction::Set, default_value_t = true, value_name = "BOOL")]
        local_conan_cache: bool,

        /// CMake action to perform
        #[command(subcommand)]
        action: CmakeAction,
    },

    /// List known extensions and their state in the workspace
    List,

    /// Generate shell completions
    ///
    /// Outputs completion script for your shell.
    ///
    /// Examples:
    ///   xsteps completions bash > ~/.local/share/bash-completion/completions/xsteps
    ///   xsteps completions zsh > ~/.zfunc/_xsteps
    ///   xsteps completions fish > ~/.config/fish/completions/xsteps.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Actions of the cmake command
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CmakeAction {
    /// Install CMake through the package manager
    Install {
        /// Package reference, e.g. cmake/3.22.0 (defaults to the configured one)
        reference: Option<String>,
    },

    /// Run the installed cmake, forwarding all arguments
    ///
    /// The global flags `-v`/`--verbose` and `--workspace` are read by
    /// xsteps wherever they appear. Put cmake's arguments after `--` to
    /// forward them unchanged.
    ///
    /// Examples:
    ///   xsteps cmake execute -- --version
    ///   xsteps cmake execute -- -S . -B build -v
    Execute {
        /// Arguments passed to cmake
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Show or change the extension config
    Config {
        /// Config action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the config document
    Show,

    /// Merge KEY=VALUE pairs into the config
    ///
    /// Values are read as YAML scalars, so `true` and `3` keep their types.
    Set {
        /// Entries to merge
        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,

        /// Replace values of keys that already exist
        #[arg(long = "override")]
        allow_override: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_defaults() {
        let cli = Cli::try_parse_from(["xsteps", "list"]).unwrap();
        assert!(!cli.verbose);
        assert_eq!(cli.command, Commands::List);
    }

    #[test]
    fn parse_workspace_and_verbose_after_subcommand() {
        let cli =
            Cli::parse_from(["xsteps", "list", "--workspace", "/tmp/ws", "-v"]);
        assert_eq!(cli.workspace, PathBuf::from("/tmp/ws"));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_cmake_install_default_reference() {
        let cli = Cli::parse_from(["xsteps", "cmake", "install"]);
        assert_eq!(
            cli.command,
            Commands::Cmake {
                local_conan_cache: true,
                action: CmakeAction::Install { reference: None },
            }
        );
    }

    #[test]
    fn parse_cmake_install_reference_without_local_cache() {
        let cli = Cli::parse_from([
            "xsteps",
            "cmake",
            "--local-conan-cache",
            "false",
            "install",
            "cmake/3.21.0",
        ]);
        assert_eq!(
            cli.command,
            Commands::Cmake {
                local_conan_cache: false,
                action: CmakeAction::Install {
                    reference: Some("cmake/3.21.0".to_string())
                },
            }
        );
    }

    #[test]
    fn parse_cmake_execute_forwards_hyphenated_args() {
        let cli = Cli::parse_from(["xsteps", "cmake", "execute", "--version"]);
        match cli.command {
            Commands::Cmake {
                action: CmakeAction::Execute { args },
                ..
            } => assert_eq!(args, vec!["--version"]),
            other => panic!("Expected Execute command, got {other:?}"),
        }
    }

    #[test]
    fn parse_cmake_execute_after_separator() {
        let cli = Cli::parse_from(["xsteps", "cmake", "execute", "--", "-S", ".", "-B", "build"]);
        match cli.command {
            Commands::Cmake {
                action: CmakeAction::Execute { args },
                ..
            } => assert_eq!(args, vec!["-S", ".", "-B", "build"]),
            other => panic!("Expected Execute command, got {other:?}"),
        }
    }

    #[test]
    fn parse_cmake_execute_forwards_global_flag_names_after_separator() {
        let cli = Cli::parse_from(["xsteps", "cmake", "execute", "--", "-v", "--workspace", "x"]);
        assert!(!cli.verbose);
        match cli.command {
            Commands::Cmake {
                action: CmakeAction::Execute { args },
                ..
            } => assert_eq!(args, vec!["-v", "--workspace", "x"]),
            other => panic!("Expected Execute command, got {other:?}"),
        }
    }

    #[test]
    fn parse_config_set_with_override() {
        let cli = Cli::parse_from([
            "xsteps",
            "cmake",
            "config",
            "set",
            "run_command=cmake3",
            "jobs=4",
            "--override",
        ]);
        match cli.command {
            Commands::Cmake {
                action:
                    CmakeAction::Config {
                        action: ConfigAction::Set { pairs, allow_override },
                    },
                ..
            } => {
                assert_eq!(pairs, vec!["run_command=cmake3", "jobs=4"]);
                assert!(allow_override);
            }
            other => panic!("Expected Config Set command, got {other:?}"),
        }
    }

    #[test]
    fn parse_config_set_requires_pairs() {
        assert!(Cli::try_parse_from(["xsteps", "cmake", "config", "set"]).is_err());
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["xsteps", "completions", "bash"]);
        assert_eq!(cli.command, Commands::Completions { shell: Shell::Bash });
    }

    #[test]
    fn parse_missing_command_fails() {
        assert!(Cli::try_parse_from(["xsteps"]).is_err());
    }
}
