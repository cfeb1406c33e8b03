//! Text rendering for cards, tableau decisions, forecasts and road grids.
//!
//! Every function here is pure and returns a `String`, so commands only deal
//! with writing.
//!
//! ## Road legend
//!
//! - Bead road: `P`, `B`, `T`
//! - Big road: `P`/`B`; lowercase when one or more ties followed that result
//! - Big eye / small road: `o` regular, `x` irregular
//! - Empty cells: `.`
//!
//! ```rust
//! use coup_engine::roads::RoadMap;
//! use coup_engine::round::Outcome;
//! use coup_cli::formatters::format_big_road;
//!
//! let log = Outcome::parse_sequence("BBP").unwrap();
//! let text = format_big_road(&RoadMap::from_log(&log).big);
//! assert_eq!(text.lines().next(), Some("BP"));
//! ```

use coup_engine::cards::{Card, Suit};
use coup_engine::forecast::{ForecastReport, ForecastStatus};
use coup_engine::roads::{BigRoad, Grid, Mark, RoadMap, ROWS};
use coup_engine::round::{Coup, Outcome, Side};
use coup_engine::tableau::{BankerDraw, Decision};

/// Unicode suit symbols everywhere except legacy Windows consoles.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_suit(suit: Suit) -> String {
    if supports_unicode() {
        suit.symbol().to_string()
    } else {
        match suit {
            Suit::Hearts => "h",
            Suit::Diamonds => "d",
            Suit::Clubs => "c",
            Suit::Spades => "s",
        }
        .to_string()
    }
}

/// String like "K♠" (Unicode) or "Ks" (ASCII)
pub fn format_card(card: &Card) -> String {
    format!("{}{}", card.rank.label(), format_suit(card.suit))
}

/// Cards in bracket notation, e.g. `[K♠ 4♥]`; `[]` if empty.
pub fn format_cards(cards: &[Card]) -> String {
    let formatted: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", formatted.join(" "))
}

pub fn format_coup(coup: &Coup) -> String {
    let mut s = format!(
        "Player: {} = {}\nBanker: {} = {}\nResult: {}",
        format_cards(&coup.player),
        coup.player_total,
        format_cards(&coup.banker),
        coup.banker_total,
        coup.outcome
    );
    if coup.natural {
        s.push_str(" (natural)");
    }
    s
}

pub fn format_decision(player_total: u8, banker_total: u8, decision: &Decision) -> String {
    let player = if decision.player_draws {
        "draws"
    } else {
        "stands"
    };
    let banker = match decision.banker {
        BankerDraw::Draws => "draws",
        BankerDraw::Stands => "stands",
        BankerDraw::PendingPlayerCard => "depends on the player's third card",
    };
    format!(
        "Player {player_total} vs Banker {banker_total}\nNatural: {}\nPlayer: {player}\nBanker: {banker}",
        if decision.natural { "yes" } else { "no" }
    )
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}%"))
}

pub fn format_report(report: &ForecastReport) -> String {
    let mut lines = Vec::new();
    match report.status {
        ForecastStatus::Resolved => {
            lines.push(format!(
                "Player {}  Banker {}  Tie {}",
                pct(report.player_pct),
                pct(report.banker_pct),
                pct(report.tie_pct)
            ));
            lines.push(format!("Completions: {}", report.enumerated));
        }
        ForecastStatus::Pending => lines.push("Insufficient information".to_string()),
        ForecastStatus::Inconsistent => lines.push(format!(
            "Inconsistent hand: {}",
            report.conflict.as_deref().unwrap_or("entry contradicts the tableau")
        )),
    }
    lines.push(format!("Next: {}", report.next_action));
    lines.push(format!("      {}", report.next_action_detail));
    lines.join("\n")
}

/// Six text rows, one character per column.
pub fn render_grid<T>(grid: &Grid<T>, cell: impl Fn(&T) -> char) -> String {
    (0..ROWS)
        .map(|row| {
            (0..grid.width())
                .map(|col| grid.get(col, row).map_or('.', &cell))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_bead_road(grid: &Grid<Outcome>) -> String {
    render_grid(grid, |o| o.code())
}

pub fn format_big_road(road: &BigRoad) -> String {
    render_grid(&road.grid, |cell| {
        let code = match cell.winner {
            Side::Player => 'P',
            Side::Banker => 'B',
        };
        if cell.ties > 0 {
            code.to_ascii_lowercase()
        } else {
            code
        }
    })
}

pub fn format_marks(grid: &Grid<Mark>) -> String {
    render_grid(grid, |m| match m {
        Mark::Regular => 'o',
        Mark::Irregular => 'x',
    })
}

pub fn format_road_map(map: &RoadMap) -> String {
    let s = &map.summary;
    let mut out = format!(
        "Rounds: {}  Player: {}  Banker: {}  Tie: {}",
        s.rounds, s.player, s.banker, s.tie
    );
    if let Some(streak) = s.current_streak {
        out.push_str(&format!("  Streak: {} x{}", streak.side, streak.len));
    }
    let sections = [
        ("Bead road", format_bead_road(&map.bead)),
        ("Big road", format_big_road(&map.big)),
        ("Big eye", format_marks(&map.big_eye)),
        ("Small road", format_marks(&map.small)),
    ];
    for (title, body) in sections {
        out.push_str(&format!("\n\n{title}:\n{body}"));
    }
    if map.big.leading_ties > 0 {
        out.push_str(&format!("\n\nTies before first result: {}", map.big.leading_ties));
    }
    out
}
