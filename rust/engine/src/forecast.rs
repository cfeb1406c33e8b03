//! Outcome enumeration over partially entered hands.
//!
//! Unknown third-card slots are expanded over all thirteen ranks, **with
//! replacement**: a rank already showing elsewhere on the table stays
//! available, as if dealt from an infinite shoe. The tableau decides which
//! unknown slots are in play at all, and an operator entry is never
//! overridden: a contradiction comes back as [`Forecast::Inconsistent`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use crate::cards::{all_ranks, Rank};
use crate::hand::{Hand, Slot};
use crate::round::{Outcome, Side};
use crate::tableau::{self, BankerDraw, Decision};

/// Ranks each unknown slot branches over.
pub const RANKS_PER_SLOT: usize = 13;

const DEAL_ORDER: [(Side, usize); 4] = [
    (Side::Player, 0),
    (Side::Banker, 0),
    (Side::Player, 1),
    (Side::Banker, 1),
];

/// Win/loss/tie counts over the enumerated completions.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub player: u64,
    pub banker: u64,
    pub tie: u64,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Player => self.player += 1,
            Outcome::Banker => self.banker += 1,
            Outcome::Tie => self.tie += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.player + self.banker + self.tie
    }

    /// `None` when nothing was enumerated.
    pub fn percentages(&self) -> Option<Percentages> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let pct = |count: u64| count as f64 / total as f64 * 100.0;
        Some(Percentages {
            player: pct(self.player),
            banker: pct(self.banker),
            tie: pct(self.tie),
        })
    }
}

impl From<Outcome> for Tally {
    fn from(outcome: Outcome) -> Self {
        let mut tally = Tally::default();
        tally.record(outcome);
        tally
    }
}

impl Add for Tally {
    type Output = Tally;

    fn add(self, rhs: Tally) -> Tally {
        Tally {
            player: self.player + rhs.player,
            banker: self.banker + rhs.banker,
            tie: self.tie + rhs.tie,
        }
    }
}

impl Sum for Tally {
    fn sum<I: Iterator<Item = Tally>>(iter: I) -> Tally {
        iter.fold(Tally::default(), Add::add)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Percentages {
    pub player: f64,
    pub banker: f64,
    pub tie: f64,
}

/// What the dealer does next, as far as the tableau can tell.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// One of the four opening cards is still missing (card is 1 or 2)
    Deal { side: Side, card: usize },
    /// Natural: nobody draws
    Natural,
    DrawThird { side: Side },
    /// No further cards; the result is on the table
    Complete,
}

/// Operator guidance derived from the tableau state.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct NextAction {
    pub step: Step,
    pub summary: String,
    pub detail: String,
}

impl NextAction {
    fn deal(side: Side, card: usize) -> Self {
        Self {
            step: Step::Deal { side, card },
            summary: format!("{side} draws card {card}"),
            detail: "Cards are dealt Player, Banker, Player, Banker before the tableau applies."
                .to_string(),
        }
    }
}

/// An operator entry the tableau cannot accept.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conflict {
    /// One of the opening cards was marked as not dealt
    MissingInitialCard { side: Side, card: usize },
    /// A third card was entered for a side that must stand
    UnexpectedThirdCard { side: Side, rule: String },
    /// A side was marked as standing although it must draw
    MissingThirdCard { side: Side, rule: String },
    /// The banker entry contradicts the tableau for every possible player third card
    NoConsistentCompletion { side: Side },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::MissingInitialCard { side, card } => {
                write!(f, "{side} card {card} cannot be skipped")
            }
            Conflict::UnexpectedThirdCard { side, rule } => {
                write!(f, "{side} has a third card but must stand: {rule}")
            }
            Conflict::MissingThirdCard { side, rule } => {
                write!(f, "{side} is marked as standing but must draw: {rule}")
            }
            Conflict::NoConsistentCompletion { side } => write!(
                f,
                "no player third card makes the {} entry legal",
                side.name().to_lowercase()
            ),
        }
    }
}

/// Result of [`forecast`]. Every variant carries the next dealer step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Forecast {
    /// Opening cards are still missing; no probabilities yet
    Pending { next: NextAction },
    Inconsistent { conflict: Conflict, next: NextAction },
    Resolved { tally: Tally, next: NextAction },
}

impl Forecast {
    pub fn next(&self) -> &NextAction {
        match self {
            Forecast::Pending { next }
            | Forecast::Inconsistent { next, .. }
            | Forecast::Resolved { next, .. } => next,
        }
    }

    pub fn tally(&self) -> Option<&Tally> {
        match self {
            Forecast::Resolved { tally, .. } => Some(tally),
            _ => None,
        }
    }

    pub fn conflict(&self) -> Option<&Conflict> {
        match self {
            Forecast::Inconsistent { conflict, .. } => Some(conflict),
            _ => None,
        }
    }

    pub fn report(&self) -> ForecastReport {
        ForecastReport::from(self)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStatus {
    Resolved,
    Pending,
    Inconsistent,
}

/// Flat shape handed to the lesson page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub status: ForecastStatus,
    pub player_pct: Option<f64>,
    pub banker_pct: Option<f64>,
    pub tie_pct: Option<f64>,
    /// Number of completions behind the percentages
    pub enumerated: u64,
    pub next_action: String,
    pub next_action_detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict: Option<String>,
}

impl From<&Forecast> for ForecastReport {
    fn from(forecast: &Forecast) -> Self {
        let next = forecast.next();
        let (status, tally) = match forecast {
            Forecast::Pending { .. } => (ForecastStatus::Pending, None),
            Forecast::Inconsistent { .. } => (ForecastStatus::Inconsistent, None),
            Forecast::Resolved { tally, .. } => (ForecastStatus::Resolved, Some(*tally)),
        };
        let pct = tally.and_then(|t| t.percentages());
        Self {
            status,
            player_pct: pct.map(|p| p.player),
            banker_pct: pct.map(|p| p.banker),
            tie_pct: pct.map(|p| p.tie),
            enumerated: tally.map(|t| t.total()).unwrap_or(0),
            next_action: next.summary.clone(),
            next_action_detail: next.detail.clone(),
            conflict: forecast.conflict().map(|c| c.to_string()),
        }
    }
}

/// Every assignment of ranks to `width` unknown slots, in odometer order.
///
/// Yields `13^width` completions; a width of zero yields a single empty one.
#[derive(Debug, Clone)]
pub struct Completions {
    digits: Option<Vec<usize>>,
}

impl Completions {
    pub fn new(width: usize) -> Self {
        Self {
            digits: Some(vec![0; width]),
        }
    }
}

impl Iterator for Completions {
    type Item = Vec<Rank>;

    fn next(&mut self) -> Option<Vec<Rank>> {
        let ranks = all_ranks();
        let digits = self.digits.as_mut()?;
        let current = digits.iter().map(|&d| ranks[d]).collect();

        let mut exhausted = true;
        for digit in digits.iter_mut().rev() {
            *digit += 1;
            if *digit < RANKS_PER_SLOT {
                exhausted = false;
                break;
            }
            *digit = 0;
        }
        if exhausted {
            self.digits = None;
        }
        Some(current)
    }
}

/// Enumerates every completion of the two hands consistent with the tableau
/// and tallies the results.
///
/// # Examples
///
/// ```
/// use coup_engine::forecast::{forecast, Forecast};
/// use coup_engine::hand::Hand;
///
/// // Player 9 natural against banker 5: settled.
/// let player = Hand::parse_labels(["4", "5"]).unwrap();
/// let banker = Hand::parse_labels(["K", "5"]).unwrap();
/// let tally = *forecast(&player, &banker).tally().unwrap();
/// assert_eq!((tally.player, tally.total()), (1, 1));
///
/// // Missing opening cards only produce guidance.
/// let pending = forecast(&Hand::parse_labels(["4"]).unwrap(), &Hand::empty());
/// assert!(matches!(pending, Forecast::Pending { .. }));
/// ```
pub fn forecast(player: &Hand, banker: &Hand) -> Forecast {
    let hand_of = |side: Side| match side {
        Side::Player => player,
        Side::Banker => banker,
    };

    for &(side, index) in &DEAL_ORDER {
        if hand_of(side).slot(index) == Slot::Absent {
            return Forecast::Inconsistent {
                conflict: Conflict::MissingInitialCard {
                    side,
                    card: index + 1,
                },
                next: NextAction::deal(side, index + 1),
            };
        }
    }
    for &(side, index) in &DEAL_ORDER {
        if hand_of(side).slot(index).is_unknown() {
            return Forecast::Pending {
                next: NextAction::deal(side, index + 1),
            };
        }
    }

    let (Some(player_total), Some(banker_total)) =
        (player.two_card_total(), banker.two_card_total())
    else {
        return Forecast::Pending {
            next: NextAction::deal(Side::Player, 1),
        };
    };

    let player_third = player.third();
    let banker_third = banker.third();
    let decision = tableau::table(
        player_total,
        banker_total,
        player_third.rank().map(Rank::points),
    );
    let next = next_action(player_total, banker_total, &decision, player, banker);

    if let Some(conflict) = check_entry(
        Side::Player,
        player_third,
        Some(decision.player_draws),
        player_total,
        banker_total,
        &decision,
    ) {
        return Forecast::Inconsistent { conflict, next };
    }
    // Banker 0-2 and 7 do not depend on the player's third card.
    let banker_draws = decision.banker.resolved().or(match banker_total {
        0..=2 => Some(true),
        7 => Some(false),
        _ => None,
    });
    if let Some(conflict) = check_entry(
        Side::Banker,
        banker_third,
        banker_draws,
        player_total,
        banker_total,
        &decision,
    ) {
        return Forecast::Inconsistent { conflict, next };
    }

    let mut unknown = Vec::with_capacity(2);
    if decision.player_draws && player_third.is_unknown() {
        unknown.push(Side::Player);
    }
    if banker_draws != Some(false) && banker_third.is_unknown() {
        unknown.push(Side::Banker);
    }

    let setup = Layout {
        player_total,
        banker_total,
        player_draws: decision.player_draws,
        natural: decision.natural,
        player_third,
        banker_third,
    };
    let tally: Tally = Completions::new(unknown.len())
        .filter_map(|ranks| {
            let assigned = |side: Side| {
                unknown
                    .iter()
                    .position(|&s| s == side)
                    .map(|i| ranks[i])
            };
            setup
                .play_out(assigned(Side::Player), assigned(Side::Banker))
                .map(Tally::from)
        })
        .sum();

    if tally.total() == 0 {
        return Forecast::Inconsistent {
            conflict: Conflict::NoConsistentCompletion { side: Side::Banker },
            next,
        };
    }
    Forecast::Resolved { tally, next }
}

/// Opening totals plus the operator's third-card entries.
struct Layout {
    player_total: u8,
    banker_total: u8,
    player_draws: bool,
    natural: bool,
    player_third: Slot,
    banker_third: Slot,
}

impl Layout {
    /// Final result for one assignment of the unknown slots, or `None` when
    /// the assignment contradicts the banker entry.
    fn play_out(&self, player_card: Option<Rank>, banker_card: Option<Rank>) -> Option<Outcome> {
        let player_third = if self.player_draws {
            self.player_third.rank().or(player_card)
        } else {
            None
        };

        let banker_draws = if self.natural {
            false
        } else {
            match player_third {
                Some(rank) => tableau::banker_draws(self.banker_total, rank.points()),
                None => self.banker_total <= 5,
            }
        };

        let banker_third = match (self.banker_third, banker_draws) {
            (Slot::Unknown, true) => banker_card,
            (Slot::Unknown, false) | (Slot::Absent, false) => None,
            (Slot::Fixed(rank), true) => Some(rank),
            (Slot::Fixed(_), false) | (Slot::Absent, true) => return None,
        };

        let add = |total: u8, card: Option<Rank>| (total + card.map(Rank::points).unwrap_or(0)) % 10;
        Some(Outcome::from_totals(
            add(self.player_total, player_third),
            add(self.banker_total, banker_third),
        ))
    }
}

/// Compares an entered third-card slot against what the tableau requires.
fn check_entry(
    side: Side,
    slot: Slot,
    draws: Option<bool>,
    player_total: u8,
    banker_total: u8,
    decision: &Decision,
) -> Option<Conflict> {
    let draws = draws?;
    let rule = || rule_text(side, draws, player_total, banker_total, decision);
    match (slot, draws) {
        (Slot::Fixed(_), false) => Some(Conflict::UnexpectedThirdCard { side, rule: rule() }),
        (Slot::Absent, true) => Some(Conflict::MissingThirdCard { side, rule: rule() }),
        _ => None,
    }
}

fn rule_text(
    side: Side,
    draws: bool,
    player_total: u8,
    banker_total: u8,
    decision: &Decision,
) -> String {
    if decision.natural {
        let (holder, total) = if tableau::is_natural(player_total) {
            (Side::Player, player_total)
        } else {
            (Side::Banker, banker_total)
        };
        return format!("{holder} natural {total} ends the coup");
    }
    let verb = if draws { "draws" } else { "stands" };
    match side {
        Side::Player if draws => format!("Player draws on {player_total} (0-5)"),
        Side::Player => format!("Player stands on {player_total} (6-7)"),
        Side::Banker if !decision.player_draws => {
            format!("Player stood, Banker {verb} on {banker_total}")
        }
        Side::Banker if decision.banker == BankerDraw::PendingPlayerCard => {
            format!("Banker {verb} on {banker_total} whatever the player draws")
        }
        Side::Banker => {
            format!("Banker {verb} on {banker_total} against that player third card")
        }
    }
}

fn next_action(
    player_total: u8,
    banker_total: u8,
    decision: &Decision,
    player: &Hand,
    banker: &Hand,
) -> NextAction {
    if decision.natural {
        return NextAction {
            step: Step::Natural,
            summary: "Natural: both sides stand".to_string(),
            detail: format!(
                "Player {player_total} vs Banker {banker_total}; a two-card 8 or 9 ends the coup."
            ),
        };
    }

    if decision.player_draws && player.third().rank().is_none() {
        let banker_note = match banker_total {
            0..=2 => format!("Banker {banker_total} draws whatever that card is."),
            7 => "Banker 7 stands whatever that card is.".to_string(),
            _ => format!("Banker {banker_total} then acts on the value of that card."),
        };
        return NextAction {
            step: Step::DrawThird { side: Side::Player },
            summary: "Player draws a third card".to_string(),
            detail: format!("Player total {player_total} is 0-5, so the player draws. {banker_note}"),
        };
    }

    if decision.banker == BankerDraw::Draws && banker.third().rank().is_none() {
        let reason = match player.third().rank() {
            Some(card) if decision.player_draws => format!(
                "Banker {banker_total} draws against a player third card worth {}.",
                card.points()
            ),
            _ => format!("Player stood on {player_total}; Banker {banker_total} draws on 0-5."),
        };
        return NextAction {
            step: Step::DrawThird { side: Side::Banker },
            summary: "Banker draws a third card".to_string(),
            detail: reason,
        };
    }

    let (player_final, banker_final) = (player.total(), banker.total());
    let outcome = Outcome::from_totals(player_final, banker_final);
    let verdict = match outcome.winner() {
        Some(side) => format!("{side} wins"),
        None => "tie".to_string(),
    };
    NextAction {
        step: Step::Complete,
        summary: "Coup complete".to_string(),
        detail: format!("Player {player_final} vs Banker {banker_final}: {verdict}."),
    }
}
