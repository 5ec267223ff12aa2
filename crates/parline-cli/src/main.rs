//! Parline CLI
//!
//! Command-line interface for the parline C# layout linter

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use parline_core::init_tracing;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "parline")]
#[command(about = "parline: keep C# parameter and argument lists one item per line")]
#[command(version = parline_core::VERSION)]
#[command(
    long_about = "parline reports parameter and argument lists whose items share a line\n\
and rewrites them so that every item sits on its own line.\n\
\n\
Examples:\n  \
parline check                  # Check the current directory\n  \
parline check --write src/     # Fix files in src/\n  \
parline check --diff Foo.cs    # Show the fix without applying it\n  \
parline rules --detailed       # Describe the available rules\n  \
parline config init            # Create parline.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (parline.toml/.parlinerc.json)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,

    /// Generate shell completion script
    #[arg(long, value_enum, help = "Generate shell completion script")]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check C# files for list items sharing a line
    #[command(alias = "lint")]
    Check {
        /// Files or directories to check
        #[arg(help = "Files or directories to check (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(
            short,
            long,
            default_value = "human",
            help = "Output format for diagnostics"
        )]
        format: OutputFormat,

        /// Apply fixes in place
        #[arg(long, help = "Rewrite files with every fix applied")]
        write: bool,

        /// Show the fixes as a diff without touching files
        #[arg(
            long,
            help = "Show a diff of the proposed fixes",
            conflicts_with = "write"
        )]
        diff: bool,

        /// Minimum severity to report
        #[arg(
            long,
            default_value = "warning",
            help = "Minimum severity level to report"
        )]
        min_severity: Severity,
    },

    /// Inspect the available rules
    Rules {
        /// Show detailed rule information
        #[arg(long, help = "Show detailed information for each rule")]
        detailed: bool,

        /// Filter rules by category
        #[arg(long, help = "Filter rules by category (correctness, style, ...)")]
        category: Option<String>,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed version and build information")]
        detailed: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Create parline.toml in the current directory
    Init {
        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(help = "Path to configuration file (default: search for parline.toml)")]
        path: Option<PathBuf>,
    },

    /// Show the configuration in effect
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable output with colors and context
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// One line per diagnostic
    Compact,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Severity {
    /// Only show errors
    Error,
    /// Show warnings and errors
    Warning,
    /// Show info, warnings, and errors
    Info,
    /// Show all diagnostics including hints
    Hint,
}

impl Severity {
    /// Whether a diagnostic of `severity` passes this threshold
    fn admits(self, severity: parline_core::Severity) -> bool {
        use parline_core::Severity as Core;
        let rank = |s: Core| match s {
            Core::Hint => 0,
            Core::Info => 1,
            Core::Warning => 2,
            Core::Error => 3,
        };
        let threshold = match self {
            Severity::Hint => Core::Hint,
            Severity::Info => Core::Info,
            Severity::Warning => Core::Warning,
            Severity::Error => Core::Error,
        };
        rank(severity) >= rank(threshold)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return ExitCode::SUCCESS;
    }

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose);

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        return ExitCode::FAILURE;
    }

    match run_command(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("parline failed: {:#}", e);
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let use_colors = !cli.no_color;

    match cli.command {
        Some(Commands::Check {
            paths,
            format,
            write,
            diff,
            min_severity,
        }) => {
            let paths = if paths.is_empty() {
                vec![PathBuf::from(".")]
            } else {
                paths
            };
            let mode = if write {
                commands::FixMode::Write
            } else if diff {
                commands::FixMode::Diff
            } else {
                commands::FixMode::Report
            };

            let clean = commands::check_command(commands::CheckOptions {
                paths,
                format,
                mode,
                min_severity,
                config_path: cli.config,
                use_colors,
            })?;
            Ok(if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Some(Commands::Rules { detailed, category }) => {
            commands::rules_command(detailed, category, cli.config)?;
            Ok(ExitCode::SUCCESS)
        }

        Some(Commands::Config { action }) => {
            match action {
                ConfigAction::Init { force } => commands::config_init_command(force)?,
                ConfigAction::Validate { path } => {
                    commands::config_validate_command(path.or(cli.config))?
                }
                ConfigAction::Show => commands::config_show_command(cli.config)?,
            }
            Ok(ExitCode::SUCCESS)
        }

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("parline {}", parline_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
            } else {
                println!("{}", parline_core::VERSION);
            }
            Ok(ExitCode::SUCCESS)
        }

        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parline_core::Severity as Core;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_severity_threshold() {
        assert!(Severity::Warning.admits(Core::Error));
        assert!(Severity::Warning.admits(Core::Warning));
        assert!(!Severity::Warning.admits(Core::Info));
        assert!(Severity::Hint.admits(Core::Info));
        assert!(!Severity::Error.admits(Core::Warning));
    }
}
