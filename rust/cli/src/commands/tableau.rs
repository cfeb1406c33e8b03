//! `tableau` command: prints the third-card decision for two totals.

use crate::config;
use crate::error::CliError;
use crate::formatters::format_decision;
use coup_engine::tableau::decide;
use std::io::Write;

pub fn handle_tableau_command(
    player: u8,
    banker: u8,
    third: Option<u8>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let decision = decide(player, banker, third)?;
    if json || config::load()?.json {
        let value = serde_json::json!({
            "player_total": player,
            "banker_total": banker,
            "player_third": third,
            "natural": decision.natural,
            "player_draws": decision.player_draws,
            "banker": decision.banker,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        writeln!(out, "{}", format_decision(player, banker, &decision))?;
    }
    Ok(())
}
