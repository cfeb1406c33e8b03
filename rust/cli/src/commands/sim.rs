//! Simulation command: deals many coups from one seeded shoe.
//!
//! Each coup is optionally written as a JSONL [`RoundRecord`], and the
//! results feed a road map whose summary and big road are printed at the end.
//!
//! # Environment Variables
//!
//! - `COUP_SIM_BREAK_AFTER`: stop after N rounds and report an interruption

use crate::config;
use crate::error::CliError;
use crate::formatters::{format_big_road, format_road_map};
use crate::ui;
use coup_engine::logger::{RoundLogger, RoundRecord};
use coup_engine::roads::ResultLog;
use coup_engine::shoe::Shoe;
use std::io::Write;

/// Handle the sim command.
///
/// # Arguments
///
/// * `rounds` - Coups to deal; falls back to the configured default
/// * `seed` - Shoe seed; falls back to config, then a random seed
/// * `output` - JSONL file receiving one record per coup
/// * `json` - Print the road map as JSON instead of text
///
/// # Errors
///
/// `CliError::InvalidInput` for zero rounds, `CliError::Io` when the output
/// file cannot be written, `CliError::Interrupted` when stopped early.
pub fn handle_sim_command(
    rounds: Option<u64>,
    seed: Option<u64>,
    output: Option<String>,
    json: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    let total = rounds.unwrap_or(cfg.rounds);
    if total == 0 {
        ui::write_error(err, "rounds must be >= 1")?;
        return Err(CliError::InvalidInput("rounds must be >= 1".to_string()));
    }
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);

    if let Some(path) = output.as_deref()
        && std::path::Path::new(path).exists()
    {
        ui::display_warning(err, &format!("overwriting existing file {}", path))?;
    }
    let mut logger = match output.as_deref() {
        Some(path) => match RoundLogger::create(path) {
            Ok(logger) => Some(logger),
            Err(e) => {
                ui::write_error(err, &format!("Failed to open output file: {}", e))?;
                return Err(CliError::Io(e));
            }
        },
        None => None,
    };

    let break_after = std::env::var("COUP_SIM_BREAK_AFTER")
        .ok()
        .and_then(|v| v.parse::<u64>().ok());

    let mut shoe = Shoe::new_with_seed(seed);
    let mut log = ResultLog::new();
    let mut naturals = 0u64;
    for i in 0..total {
        if break_after == Some(i) {
            writeln!(out, "Interrupted: saved {}/{}", i, total)?;
            return Err(CliError::Interrupted(format!("saved {}/{}", i, total)));
        }
        let coup = shoe.deal_coup();
        if coup.natural {
            naturals += 1;
        }
        log.append(coup.outcome);
        if let Some(logger) = logger.as_mut() {
            let record = RoundRecord::from_coup(logger.next_id(), Some(seed), &coup);
            logger.write(&record)?;
        }
    }

    let map = log.roads();
    if json || cfg.json {
        let value = serde_json::json!({
            "seed": seed,
            "naturals": naturals,
            "roads": map,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    writeln!(out, "Simulated: {} rounds (seed {})", total, seed)?;
    writeln!(out, "Naturals: {}", naturals)?;
    if total > 60 {
        // long runs: counts and the big road only
        let s = &map.summary;
        writeln!(
            out,
            "Player: {}  Banker: {}  Tie: {}",
            s.player, s.banker, s.tie
        )?;
        writeln!(out, "\nBig road:\n{}", format_big_road(&map.big))?;
    } else {
        writeln!(out, "{}", format_road_map(&map))?;
    }
    if let Some(path) = output {
        writeln!(out, "Wrote {} records to {}", total, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rounds_is_rejected() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let res = handle_sim_command(Some(0), Some(1), None, false, &mut out, &mut err);
        assert!(matches!(res, Err(CliError::InvalidInput(_))));
        assert!(String::from_utf8(err).unwrap().contains("rounds must be >= 1"));
    }

    #[test]
    fn json_summary_counts_all_rounds() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_sim_command(Some(40), Some(7), None, true, &mut out, &mut err).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["roads"]["summary"]["rounds"], 40);
        assert_eq!(v["seed"], 7);
    }
}
