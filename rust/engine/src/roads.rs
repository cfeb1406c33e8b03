//! Scoreboard roads derived from a chronological list of results.
//!
//! Every road here is a pure function of the full result slice. Nothing is
//! patched incrementally, so dropping the last result and recomputing gives
//! exactly the roads of the shorter history.

use serde::{Deserialize, Serialize};

use crate::round::{Outcome, Side};

/// Visible rows per column on every road.
pub const ROWS: usize = 6;

/// Column-major sparse grid with a fixed height of [`ROWS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    columns: Vec<[Option<T>; ROWS]>,
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
        }
    }
}

impl<T> Grid<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lays values out top to bottom, six per column, left to right.
    pub fn pack<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut grid = Self::new();
        for (i, value) in values.into_iter().enumerate() {
            grid.set(i / ROWS, i % ROWS, value);
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&T> {
        self.columns.get(col)?.get(row)?.as_ref()
    }

    pub fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut T> {
        self.columns.get_mut(col)?.get_mut(row)?.as_mut()
    }

    pub fn column(&self, col: usize) -> Option<&[Option<T>; ROWS]> {
        self.columns.get(col)
    }

    /// Places a value, widening the grid as needed. Rows past the window are ignored.
    pub fn set(&mut self, col: usize, row: usize, value: T) {
        if row >= ROWS {
            return;
        }
        while self.columns.len() <= col {
            self.columns.push(std::array::from_fn(|_| None));
        }
        self.columns[col][row] = Some(value);
    }

    /// Filled cells as `(col, row, value)` in column-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        self.columns.iter().enumerate().flat_map(|(col, column)| {
            column
                .iter()
                .enumerate()
                .filter_map(move |(row, cell)| cell.as_ref().map(|v| (col, row, v)))
        })
    }

    pub fn filled(&self) -> usize {
        self.cells().count()
    }
}

/// Plain chronological layout, ties included.
pub fn bead_road(log: &[Outcome]) -> Grid<Outcome> {
    Grid::pack(log.iter().copied())
}

/// One cell of the big road.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigRoadCell {
    pub winner: Side,
    /// Ties recorded after this result and before the next decisive one
    pub ties: u32,
}

/// A run of consecutive wins by one side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub side: Side,
    pub len: usize,
    /// Grid column where the run starts
    pub column: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigRoad {
    pub grid: Grid<BigRoadCell>,
    pub streaks: Vec<Streak>,
    /// Ties dealt before the first decisive result
    pub leading_ties: u32,
}

impl BigRoad {
    /// Filled rows per grid column, left to right.
    ///
    /// A dragon tail adds one-deep columns without opening a new streak.
    pub fn depths(&self) -> Vec<usize> {
        (0..self.grid.width())
            .map(|col| {
                self.grid
                    .column(col)
                    .map_or(0, |cells| cells.iter().filter(|c| c.is_some()).count())
            })
            .collect()
    }
}

/// Streak-compressed road.
///
/// A change of winner opens a new column at row 0; a repeat moves down one
/// row. Once a run fills the bottom row it carries on to the right along that
/// row (the dragon tail). Ties are attached to the preceding cell.
pub fn big_road(log: &[Outcome]) -> BigRoad {
    let mut road = BigRoad::default();
    let mut cursor: Option<(usize, usize)> = None;

    for &outcome in log {
        let Some(side) = outcome.winner() else {
            match cursor.and_then(|(col, row)| road.grid.get_mut(col, row)) {
                Some(cell) => cell.ties += 1,
                None => road.leading_ties += 1,
            }
            continue;
        };

        let continues = road.streaks.last().is_some_and(|s| s.side == side);
        let (col, row) = match cursor {
            Some((col, row)) if continues => {
                if row + 1 < ROWS {
                    (col, row + 1)
                } else {
                    (col + 1, row)
                }
            }
            Some((col, _)) => (col + 1, 0),
            None => (0, 0),
        };

        if continues {
            if let Some(streak) = road.streaks.last_mut() {
                streak.len += 1;
            }
        } else {
            road.streaks.push(Streak {
                side,
                len: 1,
                column: col,
            });
        }
        road.grid.set(col, row, BigRoadCell { winner: side, ties: 0 });
        cursor = Some((col, row));
    }
    road
}

/// Mark on the derived roads.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    /// The streak pattern repeats
    Regular,
    /// The streak pattern breaks
    Irregular,
}

/// Big-eye lag: each column is compared with the one right before it.
pub const BIG_EYE_LAG: usize = 1;
/// Small-road lag: each column is compared with the one two back.
pub const SMALL_ROAD_LAG: usize = 2;

/// Regularity road over big-road column depths (see [`BigRoad::depths`]).
///
/// Empty until the big road has `lag + 1` columns. Column `lag` is regular
/// when its depth equals column 0. Each later column `i` is regular when the
/// rise from column `i-1` to column `i` matches the rise from `i-lag-1` to
/// `i-lag`. Marks are packed six to a column in production order.
///
/// ```
/// use coup_engine::roads::{derived_road, Mark, BIG_EYE_LAG};
///
/// let road = derived_road(&[2, 2, 3], BIG_EYE_LAG);
/// assert_eq!(road.get(0, 0), Some(&Mark::Regular)); // 2 == 2
/// assert_eq!(road.get(0, 1), Some(&Mark::Irregular)); // rose, but did not rise before
/// ```
pub fn derived_road(depths: &[usize], lag: usize) -> Grid<Mark> {
    if lag == 0 || depths.len() <= lag {
        return Grid::new();
    }
    let marks = (lag..depths.len()).map(|i| {
        let regular = if i == lag {
            depths[i] == depths[0]
        } else {
            (depths[i] > depths[i - 1]) == (depths[i - lag] > depths[i - lag - 1])
        };
        if regular {
            Mark::Regular
        } else {
            Mark::Irregular
        }
    });
    Grid::pack(marks)
}

/// Counts shown next to the roads.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoeSummary {
    pub rounds: usize,
    pub player: usize,
    pub banker: usize,
    pub tie: usize,
    /// The run in progress, if any decisive result has been recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_streak: Option<Streak>,
}

/// All four roads plus the summary for one result history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadMap {
    pub bead: Grid<Outcome>,
    pub big: BigRoad,
    pub big_eye: Grid<Mark>,
    pub small: Grid<Mark>,
    pub summary: ShoeSummary,
}

impl RoadMap {
    pub fn from_log(log: &[Outcome]) -> Self {
        let big = big_road(log);
        let depths = big.depths();
        let count = |o: Outcome| log.iter().filter(|&&x| x == o).count();
        let summary = ShoeSummary {
            rounds: log.len(),
            player: count(Outcome::Player),
            banker: count(Outcome::Banker),
            tie: count(Outcome::Tie),
            current_streak: big.streaks.last().copied(),
        };
        Self {
            bead: bead_road(log),
            big_eye: derived_road(&depths, BIG_EYE_LAG),
            small: derived_road(&depths, SMALL_ROAD_LAG),
            big,
            summary,
        }
    }
}

/// Append-only list of recorded results; `undo` and `reset` are the only
/// other mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLog {
    results: Vec<Outcome>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, outcome: Outcome) {
        self.results.push(outcome);
    }

    /// Drops the most recent result. Undo on an empty log is a no-op.
    pub fn undo(&mut self) -> Option<Outcome> {
        self.results.pop()
    }

    pub fn reset(&mut self) {
        self.results.clear();
    }

    pub fn as_slice(&self) -> &[Outcome] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn roads(&self) -> RoadMap {
        RoadMap::from_log(&self.results)
    }
}

impl From<Vec<Outcome>> for ResultLog {
    fn from(results: Vec<Outcome>) -> Self {
        Self { results }
    }
}

impl Extend<Outcome> for ResultLog {
    fn extend<I: IntoIterator<Item = Outcome>>(&mut self, iter: I) {
        self.results.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Outcome::{Banker as B, Player as P, Tie as T};

    #[test]
    fn undo_on_empty_log_is_noop() {
        let mut log = ResultLog::new();
        assert_eq!(log.undo(), None);
        log.append(B);
        assert_eq!(log.undo(), Some(B));
        assert!(log.is_empty());
    }

    #[test]
    fn pack_fills_columns_top_down() {
        let grid = Grid::pack(0..8);
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.get(0, 5), Some(&5));
        assert_eq!(grid.get(1, 1), Some(&7));
        assert_eq!(grid.get(1, 2), None);
        assert_eq!(grid.filled(), 8);
    }

    #[test]
    fn set_ignores_rows_outside_window() {
        let mut grid = Grid::new();
        grid.set(0, ROWS, 'x');
        assert!(grid.is_empty());
    }

    #[test]
    fn ties_attach_to_previous_cell() {
        let road = big_road(&[T, P, T, T, B]);
        assert_eq!(road.leading_ties, 1);
        assert_eq!(
            road.grid.get(0, 0),
            Some(&BigRoadCell {
                winner: Side::Player,
                ties: 2
            })
        );
        assert_eq!(road.grid.get(1, 0).map(|c| c.winner), Some(Side::Banker));
    }

    #[test]
    fn new_run_after_dragon_tail_starts_right_of_tail() {
        let mut log = vec![B; 8];
        log.push(P);
        let road = big_road(&log);
        // rows 0-5 in col 0, tail at (1,5) and (2,5), next run in col 3
        assert_eq!(road.grid.get(2, 5).map(|c| c.winner), Some(Side::Banker));
        assert_eq!(road.grid.get(3, 0).map(|c| c.winner), Some(Side::Player));
        assert_eq!(road.depths(), vec![6, 1, 1, 1]);
        assert_eq!(road.streaks[1].column, 3);
        assert_eq!(road.streaks[0].len, 8);
    }

    #[test]
    fn small_road_waits_for_three_runs() {
        assert!(derived_road(&[1, 2], SMALL_ROAD_LAG).is_empty());
        let road = derived_road(&[1, 2, 1, 3], SMALL_ROAD_LAG);
        // run 2 vs run 0: 1 == 1
        assert_eq!(road.get(0, 0), Some(&Mark::Regular));
        // rise 1->3 vs rise 1->2
        assert_eq!(road.get(0, 1), Some(&Mark::Regular));
    }

    #[test]
    fn summary_counts_every_result() {
        let map = RoadMap::from_log(&[P, B, B, T]);
        assert_eq!(map.summary.rounds, 4);
        assert_eq!(map.summary.banker, 2);
        assert_eq!(map.summary.tie, 1);
        let streak = map.summary.current_streak.unwrap();
        assert_eq!((streak.side, streak.len), (Side::Banker, 2));
    }
}
