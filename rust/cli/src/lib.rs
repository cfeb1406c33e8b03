//! # Coup CLI Library
//!
//! Command-line front end for the `coup-engine` baccarat core: tableau
//! lookups, outcome enumeration for partially dealt coups, scoreboard roads
//! and shoe simulation.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line
//! arguments and executes the appropriate subcommand.
//!
//! ```
//! let mut out = Vec::new();
//! let mut err = Vec::new();
//! let args = ["coup", "tableau", "--player", "4", "--banker", "3", "--third", "8"];
//! let code = coup_cli::run(args, &mut out, &mut err);
//! assert_eq!(code, 0);
//! assert!(String::from_utf8(out).unwrap().contains("Banker: stands"));
//! ```
//!
//! ## Available Subcommands
//!
//! - `tableau`: third-card decision for two totals
//! - `odds`: enumerate the outcomes of a partial coup
//! - `roads`: bead, big, big-eye and small roads for a result string
//! - `deal`: deal a single coup from a seeded shoe
//! - `sim`: simulate many coups, optionally writing JSONL records
//! - `cfg`: display current configuration settings

use clap::Parser;
use std::io::Write;

pub mod cli;
mod commands;
mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod ui;

use cli::{Commands, CoupCli};
use commands::{
    handle_cfg_command, handle_deal_command, handle_odds_command, handle_roads_command,
    handle_sim_command, handle_tableau_command,
};

pub use error::CliError;

const COMMANDS: &[&str] = &["tableau", "odds", "roads", "deal", "sim", "cfg"];

/// Main entry point for the CLI application.
///
/// # Arguments
///
/// * `args` - Iterator over command-line arguments (typically `std::env::args()`)
/// * `out` - Output stream for normal output (typically `stdout`)
/// * `err` - Output stream for error messages (typically `stderr`)
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors, `130` for interruptions
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match CoupCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Tableau {
            player,
            banker,
            third,
            json,
        } => handle_tableau_command(player, banker, third, json, out),
        Commands::Odds {
            player,
            banker,
            json,
        } => handle_odds_command(&player, &banker, json, out),
        Commands::Roads { results, json } => handle_roads_command(&results, json, out),
        Commands::Deal { seed, json } => handle_deal_command(seed, json, out),
        Commands::Sim {
            rounds,
            seed,
            output,
            json,
        } => handle_sim_command(rounds, seed, output, json, out, err),
        Commands::Cfg => match handle_cfg_command(out, err) {
            // cfg already reported the problem on stderr
            Err(CliError::Config(_)) => return exit_code::ERROR,
            other => other,
        },
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(_)) => exit_code::INTERRUPTED,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }

    let mut report = || -> std::io::Result<()> {
        writeln!(err, "{}", e)?;
        writeln!(err)?;
        writeln!(err, "Coup Baccarat CLI")?;
        writeln!(err, "Usage: coup <command> [options]\n")?;
        writeln!(err, "Commands:")?;
        for c in COMMANDS {
            writeln!(err, "  {}", c)?;
        }
        writeln!(err, "\nFor full help, run: coup --help")
    };
    let _ = report();
    exit_code::ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_command_parses() {
        let commands = vec![
            vec!["coup", "tableau", "--player", "1", "--banker", "2"],
            vec!["coup", "odds", "--player", "K,4"],
            vec!["coup", "roads", "--results", "PB"],
            vec!["coup", "deal"],
            vec!["coup", "sim", "--rounds", "1"],
            vec!["coup", "cfg"],
        ];
        assert_eq!(commands.len(), COMMANDS.len());
        for (args, name) in commands.iter().zip(COMMANDS) {
            assert_eq!(args[1], *name);
            let result = CoupCli::try_parse_from(args);
            assert!(result.is_ok(), "Failed to parse: {:?}", args);
        }
    }

    #[test]
    fn unknown_command_lists_commands_on_stderr() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(["coup", "shuffle"], &mut out, &mut err);
        assert_eq!(code, exit_code::ERROR);
        let stderr = String::from_utf8(err).unwrap();
        assert!(stderr.contains("Usage: coup <command>"));
        assert!(stderr.contains("  roads"));
    }

    #[test]
    fn help_goes_to_stdout() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        assert_eq!(run(["coup", "--help"], &mut out, &mut err), 0);
        assert!(!out.is_empty());
        assert!(err.is_empty());
    }
}
