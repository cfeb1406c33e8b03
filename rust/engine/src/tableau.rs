use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// What the banker does once the player's draw is known.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankerDraw {
    Draws,
    Stands,
    /// The player draws but the card is not known yet; the banker's move
    /// hinges on its value.
    PendingPlayerCard,
}

impl BankerDraw {
    pub fn resolved(self) -> Option<bool> {
        match self {
            BankerDraw::Draws => Some(true),
            BankerDraw::Stands => Some(false),
            BankerDraw::PendingPlayerCard => None,
        }
    }
}

/// Third-card decision for both sides of a coup.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Natural on either side: the coup ends after two cards each
    pub natural: bool,
    /// Whether the player takes a third card
    pub player_draws: bool,
    /// Banker's move, possibly still waiting on the player's third card
    pub banker: BankerDraw,
}

impl Decision {
    /// `(player_draws, banker_draws)` with `None` standing for "depends on
    /// the player's third card".
    pub fn as_pair(&self) -> (bool, Option<bool>) {
        (self.player_draws, self.banker.resolved())
    }
}

pub fn is_natural(total: u8) -> bool {
    total >= 8
}

/// Player draws on 0-5, stands on 6-7.
pub fn player_draws(player_total: u8) -> bool {
    player_total <= 5
}

/// Banker column of the tableau when the player has drawn a third card
/// worth `player_third` points.
pub fn banker_draws(banker_total: u8, player_third: u8) -> bool {
    match banker_total {
        0..=2 => true,
        3 => player_third != 8,
        4 => (2..=7).contains(&player_third),
        5 => (4..=7).contains(&player_third),
        6 => player_third == 6 || player_third == 7,
        _ => false,
    }
}

/// Applies the third-card tableau to two-card totals.
///
/// `player_third` is the point value (0-9) of the player's third card when
/// one has been dealt. Naturals short-circuit everything else.
///
/// # Errors
///
/// Returns [`GameError::TotalOutOfRange`] or [`GameError::PointOutOfRange`]
/// for inputs outside 0-9; every in-range input has a decision.
///
/// # Examples
///
/// ```
/// use coup_engine::tableau::{decide, BankerDraw};
///
/// // Banker on 3 stands against a player eight.
/// let d = decide(4, 3, Some(8)).unwrap();
/// assert!(d.player_draws);
/// assert_eq!(d.banker, BankerDraw::Stands);
///
/// // Player stands on 6, banker draws on 5.
/// assert_eq!(decide(6, 5, None).unwrap().as_pair(), (false, Some(true)));
///
/// // Player must draw but the card is not out yet.
/// assert_eq!(decide(2, 6, None).unwrap().banker, BankerDraw::PendingPlayerCard);
/// ```
pub fn decide(
    player_total: u8,
    banker_total: u8,
    player_third: Option<u8>,
) -> Result<Decision, GameError> {
    for total in [player_total, banker_total] {
        if total > 9 {
            return Err(GameError::TotalOutOfRange(total));
        }
    }
    if let Some(points) = player_third {
        if points > 9 {
            return Err(GameError::PointOutOfRange(points));
        }
    }

    Ok(table(player_total, banker_total, player_third))
}

/// Unchecked tableau lookup; callers guarantee inputs are 0-9.
pub(crate) fn table(player_total: u8, banker_total: u8, player_third: Option<u8>) -> Decision {
    if is_natural(player_total) || is_natural(banker_total) {
        return Decision {
            natural: true,
            player_draws: false,
            banker: BankerDraw::Stands,
        };
    }

    if !player_draws(player_total) {
        let banker = if banker_total <= 5 {
            BankerDraw::Draws
        } else {
            BankerDraw::Stands
        };
        return Decision {
            natural: false,
            player_draws: false,
            banker,
        };
    }

    let banker = match player_third {
        Some(points) if banker_draws(banker_total, points) => BankerDraw::Draws,
        Some(_) => BankerDraw::Stands,
        None => BankerDraw::PendingPlayerCard,
    };
    Decision {
        natural: false,
        player_draws: true,
        banker,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banker_column_matches_printed_table() {
        // rows: banker total 0..=7, columns: player third 0..=9
        let table: [[u8; 10]; 8] = [
            [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            [1, 1, 1, 1, 1, 1, 1, 1, 0, 1],
            [0, 0, 1, 1, 1, 1, 1, 1, 0, 0],
            [0, 0, 0, 0, 1, 1, 1, 1, 0, 0],
            [0, 0, 0, 0, 0, 0, 1, 1, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        ];
        for (banker, row) in table.iter().enumerate() {
            for (third, &expected) in row.iter().enumerate() {
                assert_eq!(
                    banker_draws(banker as u8, third as u8),
                    expected == 1,
                    "banker {banker} vs player third {third}"
                );
            }
        }
    }

    #[test]
    fn rejects_out_of_range_inputs() {
        assert_eq!(decide(10, 0, None), Err(GameError::TotalOutOfRange(10)));
        assert_eq!(decide(0, 12, None), Err(GameError::TotalOutOfRange(12)));
        assert_eq!(decide(3, 3, Some(10)), Err(GameError::PointOutOfRange(10)));
    }

    #[test]
    fn player_standing_leaves_banker_on_simple_rule() {
        for banker in 0..=7u8 {
            for player in [6u8, 7] {
                let d = decide(player, banker, None).unwrap();
                assert!(!d.player_draws);
                assert_eq!(d.banker.resolved(), Some(banker <= 5));
            }
        }
    }
}
