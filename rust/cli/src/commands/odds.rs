//! `odds` command: enumerates the completions of a partially dealt coup.
//!
//! Cards are given per side as a comma-separated list of slot labels, e.g.
//! `--player K,4,? --banker 6,10`. Missing trailing slots are unknown.

use crate::config;
use crate::error::CliError;
use crate::formatters::{format_report, supports_unicode};
use coup_engine::forecast::forecast;
use coup_engine::hand::Hand;
use std::io::Write;

fn parse_hand(side: &str, raw: &str) -> Result<Hand, CliError> {
    let labels: Vec<&str> = if raw.trim().is_empty() {
        Vec::new()
    } else {
        raw.split(',').collect()
    };
    Hand::parse_labels(labels)
        .map_err(|e| CliError::InvalidInput(format!("{side} hand '{raw}': {e}")))
}

pub fn handle_odds_command(
    player: &str,
    banker: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let player = parse_hand("player", player)?;
    let banker = parse_hand("banker", banker)?;
    let report = forecast(&player, &banker).report();

    if json || config::load()?.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }
    let arrow = if supports_unicode() { "→" } else { "->" };
    writeln!(out, "Player {player} vs Banker {banker}")?;
    writeln!(out, "{arrow} {}", format_report(&report).replace('\n', "\n  "))?;
    Ok(())
}
