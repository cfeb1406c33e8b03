use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::cards::Card;
use crate::errors::GameError;

/// The two hands dealt in every coup.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Banker,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Banker => "Banker",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one coup as recorded on the scoreboard.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Player,
    Banker,
    Tie,
}

impl Outcome {
    /// Compares final totals.
    pub fn from_totals(player_total: u8, banker_total: u8) -> Outcome {
        match player_total.cmp(&banker_total) {
            Ordering::Greater => Outcome::Player,
            Ordering::Less => Outcome::Banker,
            Ordering::Equal => Outcome::Tie,
        }
    }

    /// The winning side, `None` for a tie.
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::Player => Some(Side::Player),
            Outcome::Banker => Some(Side::Banker),
            Outcome::Tie => None,
        }
    }

    /// Single-letter scoreboard code.
    pub fn code(self) -> char {
        match self {
            Outcome::Player => 'P',
            Outcome::Banker => 'B',
            Outcome::Tie => 'T',
        }
    }

    /// Parses a compact result string such as `"PBBTP"`; whitespace and
    /// commas are ignored.
    pub fn parse_sequence(s: &str) -> Result<Vec<Outcome>, GameError> {
        s.chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(|c| c.to_string().parse())
            .collect()
    }
}

impl From<Side> for Outcome {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => Outcome::Player,
            Side::Banker => Outcome::Banker,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Player => f.write_str("Player"),
            Outcome::Banker => f.write_str("Banker"),
            Outcome::Tie => f.write_str("Tie"),
        }
    }
}

impl FromStr for Outcome {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" | "player" => Ok(Outcome::Player),
            "b" | "banker" => Ok(Outcome::Banker),
            "t" | "tie" => Ok(Outcome::Tie),
            _ => Err(GameError::InvalidOutcome(s.to_string())),
        }
    }
}

/// A fully dealt coup: the cards each side ended with and the result.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Coup {
    /// Player cards in deal order (2 or 3)
    pub player: Vec<Card>,
    /// Banker cards in deal order (2 or 3)
    pub banker: Vec<Card>,
    pub player_total: u8,
    pub banker_total: u8,
    pub outcome: Outcome,
    /// Either side had 8 or 9 on two cards
    pub natural: bool,
}

pub fn total_of(cards: &[Card]) -> u8 {
    cards.iter().map(|c| c.rank.points()).sum::<u8>() % 10
}
