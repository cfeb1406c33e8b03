use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cards::Rank;
use crate::errors::GameError;

/// Maximum number of cards one side can hold in a coup.
pub const MAX_CARDS: usize = 3;

/// One card position in a hand as entered by the operator.
///
/// `Absent` is an explicit "this side does not take that card", which is not
/// the same as `Unknown` (not decided yet, open for enumeration).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rank", rename_all = "snake_case")]
pub enum Slot {
    #[default]
    Unknown,
    Fixed(Rank),
    Absent,
}

impl Slot {
    pub fn rank(self) -> Option<Rank> {
        match self {
            Slot::Fixed(rank) => Some(rank),
            _ => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Slot::Unknown)
    }

    pub fn label(self) -> &'static str {
        match self {
            Slot::Unknown => "?",
            Slot::Absent => "no-card",
            Slot::Fixed(rank) => rank.label(),
        }
    }
}

impl FromStr for Slot {
    type Err = GameError;

    /// `""`/`"?"` are unknown, `"no-card"`/`"-"` are absent, anything else
    /// must be a card label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() || raw == "?" {
            return Ok(Slot::Unknown);
        }
        if raw == "-" || raw.eq_ignore_ascii_case("no-card") || raw.eq_ignore_ascii_case("none") {
            return Ok(Slot::Absent);
        }
        raw.parse::<Rank>().map(Slot::Fixed)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three card slots of one side, first two cards then the third-card slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
pub struct Hand {
    slots: [Slot; MAX_CARDS],
}

impl Hand {
    pub fn new(slots: [Slot; MAX_CARDS]) -> Self {
        Self { slots }
    }

    /// Hand with every slot still open.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fixed cards in deal order; remaining slots stay unknown.
    pub fn from_ranks(ranks: &[Rank]) -> Result<Self, GameError> {
        if ranks.len() > MAX_CARDS {
            return Err(GameError::TooManyCards {
                count: ranks.len(),
                maximum: MAX_CARDS,
            });
        }
        let mut slots = [Slot::Unknown; MAX_CARDS];
        for (slot, &rank) in slots.iter_mut().zip(ranks) {
            *slot = Slot::Fixed(rank);
        }
        Ok(Self { slots })
    }

    /// Builds a hand from operator labels (see [`Slot::from_str`]).
    ///
    /// ```
    /// use coup_engine::cards::Rank;
    /// use coup_engine::hand::{Hand, Slot};
    ///
    /// let hand = Hand::parse_labels(["K", "4", "no-card"]).unwrap();
    /// assert_eq!(hand.slot(0), Slot::Fixed(Rank::King));
    /// assert_eq!(hand.slot(2), Slot::Absent);
    /// assert_eq!(hand.total(), 4);
    /// ```
    pub fn parse_labels<I, S>(labels: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = labels
            .into_iter()
            .map(|label| label.as_ref().parse::<Slot>())
            .collect::<Result<Vec<_>, _>>()?;
        if parsed.len() > MAX_CARDS {
            return Err(GameError::TooManyCards {
                count: parsed.len(),
                maximum: MAX_CARDS,
            });
        }
        let mut slots = [Slot::Unknown; MAX_CARDS];
        slots[..parsed.len()].copy_from_slice(&parsed);
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[Slot; MAX_CARDS] {
        &self.slots
    }

    /// Slot at `index` in deal order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`MAX_CARDS`].
    pub fn slot(&self, index: usize) -> Slot {
        self.slots[index]
    }

    pub fn third(&self) -> Slot {
        self.slots[2]
    }

    /// # Panics
    ///
    /// Panics if `index` is not below [`MAX_CARDS`].
    pub fn with_slot(mut self, index: usize, slot: Slot) -> Self {
        self.slots[index] = slot;
        self
    }

    /// Total of the first two cards, once both are fixed.
    pub fn two_card_total(&self) -> Option<u8> {
        match (self.slots[0], self.slots[1]) {
            (Slot::Fixed(a), Slot::Fixed(b)) => Some((a.points() + b.points()) % 10),
            _ => None,
        }
    }

    /// Sum of the fixed cards modulo 10; unknown and absent slots count nothing.
    pub fn total(&self) -> u8 {
        self.slots
            .iter()
            .filter_map(|slot| slot.rank())
            .map(|rank| rank.points())
            .sum::<u8>()
            % 10
    }

    pub fn is_complete(&self) -> bool {
        !self.slots.iter().any(|slot| slot.is_unknown())
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.slots.iter().map(|slot| slot.label()).collect();
        write!(f, "[{}]", labels.join(" "))
    }
}
