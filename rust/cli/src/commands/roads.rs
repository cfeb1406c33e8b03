//! `roads` command: renders the four scoreboard roads for a result string.

use crate::config;
use crate::error::CliError;
use crate::formatters::format_road_map;
use coup_engine::roads::ResultLog;
use coup_engine::round::Outcome;
use std::io::Write;

pub fn handle_roads_command(results: &str, json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let outcomes = Outcome::parse_sequence(results)
        .map_err(|e| CliError::InvalidInput(format!("results: {e}")))?;
    let log = ResultLog::from(outcomes);
    let map = log.roads();

    if json || config::load()?.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&map)?)?;
    } else {
        writeln!(out, "{}", format_road_map(&map))?;
    }
    Ok(())
}
