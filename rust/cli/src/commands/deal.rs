//! `deal` command: deals one coup from an infinite seeded shoe.

use crate::config;
use crate::error::CliError;
use crate::formatters::format_coup;
use coup_engine::shoe::Shoe;
use std::io::Write;

pub fn handle_deal_command(seed: Option<u64>, json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let cfg = config::load()?;
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let coup = Shoe::new_with_seed(seed).deal_coup();

    if json || cfg.json {
        let value = serde_json::json!({ "seed": seed, "coup": coup });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        writeln!(out, "Seed: {seed}")?;
        writeln!(out, "{}", format_coup(&coup))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_output() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        handle_deal_command(Some(12345), false, &mut a).unwrap();
        handle_deal_command(Some(12345), false, &mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn text_output_has_both_hands_and_result() {
        let mut out = Vec::new();
        handle_deal_command(Some(999), false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("Player: ["));
        assert!(lines[2].starts_with("Banker: ["));
        assert!(lines[3].starts_with("Result: "));
    }
}
