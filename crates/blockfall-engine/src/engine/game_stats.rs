use serde::{Deserialize, Serialize};

/// Points awarded for clearing rows with a single lock.
///
/// | Rows | `Classic` | `Squared` |
/// |------|-----------|-----------|
/// | 1    | 100       | 100       |
/// | 2    | 300       | 400       |
/// | 3    | 500       | 900       |
/// | 4    | 800       | 1600      |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTable {
    #[default]
    Classic,
    Squared,
}

const CLASSIC_SCORES: [u64; 5] = [0, 100, 300, 500, 800];

impl ScoreTable {
    /// Returns the points for clearing `lines` rows at once.
    ///
    /// ```
    /// use blockfall_engine::ScoreTable;
    ///
    /// assert_eq!(ScoreTable::Classic.points(4), 800);
    /// assert_eq!(ScoreTable::Squared.points(4), 1600);
    /// assert_eq!(ScoreTable::Classic.points(0), 0);
    /// ```
    #[must_use]
    pub fn points(self, lines: usize) -> u64 {
        match self {
            // A single piece spans at most four rows.
            Self::Classic => CLASSIC_SCORES[lines.min(4)],
            Self::Squared => {
                let n = u64::try_from(lines).unwrap_or(u64::MAX);
                n.saturating_mul(n).saturating_mul(100)
            }
        }
    }
}

/// Game statistics tracking score, level, lines cleared, and piece count.
///
/// - **Score**: points earned from line clears, per [`ScoreTable`]
/// - **Level**: starts at 1 and never decreases
/// - **Completed pieces**: total number of pieces locked
/// - **Line clear distribution**: count of locks by number of rows cleared
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameStats, ScoreTable};
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4, ScoreTable::Classic);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: u64,
    level: u32,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by rows cleared (index 0 to 4).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece locks and `cleared_lines` rows are removed.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize, table: ScoreTable) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }
        self.score = self.score.saturating_add(table.points(cleared_lines));
    }

    /// Raises the level to `level`. Lower values are ignored.
    ///
    /// Returns `true` when the level changed.
    pub fn raise_level(&mut self, level: u32) -> bool {
        if level > self.level {
            self.level = level;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_table() {
        let points: Vec<_> = (0..=4).map(|n| ScoreTable::Classic.points(n)).collect();
        assert_eq!(points, [0, 100, 300, 500, 800]);
    }

    #[test]
    fn test_squared_table() {
        let points: Vec<_> = (0..=4).map(|n| ScoreTable::Squared.points(n)).collect();
        assert_eq!(points, [0, 100, 400, 900, 1600]);
    }

    #[test]
    fn test_complete_piece_drop_accumulates() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0, ScoreTable::Classic);
        stats.complete_piece_drop(2, ScoreTable::Classic);
        stats.complete_piece_drop(1, ScoreTable::Classic);

        assert_eq!(stats.score(), 400);
        assert_eq!(stats.completed_pieces(), 3);
        assert_eq!(stats.total_cleared_lines(), 3);
        assert_eq!(stats.line_cleared_counter(), &[1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_level_never_decreases() {
        let mut stats = GameStats::new();
        assert_eq!(stats.level(), 1);
        assert!(stats.raise_level(3));
        assert!(!stats.raise_level(2));
        assert!(!stats.raise_level(3));
        assert_eq!(stats.level(), 3);
    }
}
