//! # coup-engine: Baccarat Tableau Core
//!
//! Pure, synchronous building blocks for teaching punto banco: the
//! third-card tableau, an exhaustive outcome enumerator over partially dealt
//! hands, and the scoreboard roads derived from a stream of results.
//!
//! ## Core Modules
//!
//! - [`cards`] - Rank, Suit and Card with baccarat point values
//! - [`hand`] - Three-slot hands where each slot is unknown, fixed or absent
//! - [`tableau`] - Third-card drawing rules for Player and Banker
//! - [`forecast`] - Enumerates completions of a partial coup into a tally
//! - [`round`] - Sides, outcomes and fully dealt coups
//! - [`roads`] - Result log plus bead, big, big-eye and small roads
//! - [`shoe`] - Seeded infinite shoe that deals whole coups
//! - [`logger`] - JSONL round records
//! - [`errors`] - Error types for boundary validation
//!
//! ## Quick Start
//!
//! ```rust
//! use coup_engine::forecast::{forecast, Forecast};
//! use coup_engine::hand::Hand;
//!
//! // Player K 4, Banker 6 10: both third cards still to come.
//! let player = Hand::parse_labels(["K", "4"]).unwrap();
//! let banker = Hand::parse_labels(["6", "10"]).unwrap();
//!
//! let result = forecast(&player, &banker);
//! let tally = result.tally().unwrap();
//! assert_eq!(tally.total(), 169);
//! println!("{}", result.next().summary);
//! ```
//!
//! ## Roads
//!
//! Every road is recomputed from the whole log, so undo is exact:
//!
//! ```rust
//! use coup_engine::roads::{ResultLog, RoadMap};
//! use coup_engine::round::Outcome;
//!
//! let mut log = ResultLog::new();
//! for o in Outcome::parse_sequence("BBPT").unwrap() {
//!     log.append(o);
//! }
//! let before = log.roads();
//! log.append(Outcome::Player);
//! log.undo();
//! assert_eq!(log.roads(), before);
//! assert_eq!(before, RoadMap::from_log(log.as_slice()));
//! ```

pub mod cards;
pub mod errors;
pub mod forecast;
pub mod hand;
pub mod logger;
pub mod roads;
pub mod round;
pub mod shoe;
pub mod tableau;
