use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::GameError;

/// Represents one of the four suits in a standard 52-card deck.
/// Suits never affect scoring; they only decorate cards dealt by the [`crate::shoe::Shoe`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (♣)
    Clubs,
    /// Diamonds suit (♦)
    Diamonds,
    /// Hearts suit (♥)
    Hearts,
    /// Spades suit (♠)
    Spades,
}

impl Suit {
    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }
}

/// Represents the rank of a playing card from Ace through King.
/// Ace is low in baccarat; discriminants follow the printed face value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Ace (1 point)
    Ace = 1,
    /// Rank 2
    Two,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10 (0 points)
    Ten,
    /// Jack (0 points)
    Jack,
    /// Queen (0 points)
    Queen,
    /// King (0 points)
    King,
}

impl Rank {
    /// Maps a 1-based face number (1 = Ace, 13 = King) to a rank.
    pub fn from_u8(v: u8) -> Option<Rank> {
        match v {
            1 => Some(Rank::Ace),
            2 => Some(Rank::Two),
            3 => Some(Rank::Three),
            4 => Some(Rank::Four),
            5 => Some(Rank::Five),
            6 => Some(Rank::Six),
            7 => Some(Rank::Seven),
            8 => Some(Rank::Eight),
            9 => Some(Rank::Nine),
            10 => Some(Rank::Ten),
            11 => Some(Rank::Jack),
            12 => Some(Rank::Queen),
            13 => Some(Rank::King),
            _ => None,
        }
    }

    /// Baccarat point value: Ace is 1, two through nine count face value,
    /// tens and court cards count zero.
    ///
    /// ```
    /// use coup_engine::cards::Rank;
    ///
    /// assert_eq!(Rank::Ace.points(), 1);
    /// assert_eq!(Rank::Seven.points(), 7);
    /// assert_eq!(Rank::Queen.points(), 0);
    /// ```
    pub fn points(self) -> u8 {
        match self {
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 0,
            r => r as u8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Rank {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let rank = match raw.to_ascii_uppercase().as_str() {
            "A" | "ACE" | "1" => Rank::Ace,
            "J" | "JACK" => Rank::Jack,
            "Q" | "QUEEN" => Rank::Queen,
            "K" | "KING" => Rank::King,
            "T" => Rank::Ten,
            other => other
                .parse::<u8>()
                .ok()
                .filter(|v| (2..=10).contains(v))
                .and_then(Rank::from_u8)
                .ok_or_else(|| GameError::InvalidCard(raw.to_string()))?,
        };
        Ok(rank)
    }
}

/// Represents a single playing card with a suit and rank.
/// Produced by the shoe; hands only look at the rank.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    /// The suit of the card, display only
    pub suit: Suit,
    /// The rank of the card (Ace through King)
    pub rank: Rank,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_values_follow_baccarat_counting() {
        let points: Vec<u8> = all_ranks().iter().map(|r| r.points()).collect();
        assert_eq!(points, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 0, 0, 0]);
    }

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("a".parse::<Rank>().unwrap(), Rank::Ace);
        assert_eq!("10".parse::<Rank>().unwrap(), Rank::Ten);
        assert_eq!(" k ".parse::<Rank>().unwrap(), Rank::King);
        assert_eq!("queen".parse::<Rank>().unwrap(), Rank::Queen);
    }

    #[test]
    fn rejects_non_card_labels() {
        assert!(matches!("0".parse::<Rank>(), Err(GameError::InvalidCard(_))));
        assert!(matches!("11".parse::<Rank>(), Err(GameError::InvalidCard(_))));
        assert!(matches!("joker".parse::<Rank>(), Err(GameError::InvalidCard(_))));
    }

    #[test]
    fn labels_round_trip_through_parse() {
        for rank in all_ranks() {
            assert_eq!(rank.label().parse::<Rank>().unwrap(), rank);
        }
    }
}
