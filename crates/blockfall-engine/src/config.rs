//! Game configuration.
//!
//! [`GameConfig`] collects every tunable of a session: board dimensions, the
//! gravity curve, soft-drop and input-repeat timing, how levels advance and
//! which score table applies. It deserializes from JSON with every field
//! optional, so a config file only needs to mention what it changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::ScoreTable;

/// Smallest board accepted by [`GameConfig::validate`]; the I-piece needs four columns.
pub const MIN_BOARD_SIZE: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of columns.
    pub width: u8,
    /// Number of visible rows.
    pub height: u8,
    /// Gravity interval at level 1, in milliseconds.
    pub base_fall_interval_ms: u64,
    /// How much the gravity interval shrinks per level, in milliseconds.
    pub fall_interval_step_ms: u64,
    /// Lower bound of the gravity interval, in milliseconds.
    pub min_fall_interval_ms: u64,
    /// Gravity interval while soft drop is held, in milliseconds.
    pub soft_drop_interval_ms: u64,
    /// Minimum delay between two accepted moves (or rotations), in milliseconds.
    pub move_repeat_delay_ms: u64,
    pub level_progression: LevelProgression,
    pub score_table: ScoreTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            base_fall_interval_ms: 250,
            fall_interval_step_ms: 50,
            min_fall_interval_ms: 100,
            soft_drop_interval_ms: 100,
            move_repeat_delay_ms: 100,
            level_progression: LevelProgression::default(),
            score_table: ScoreTable::default(),
        }
    }
}

/// Rule that raises the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelProgression {
    /// One level per `lines_per_level` cleared lines.
    Lines { lines_per_level: usize },
    /// One level per `interval_ms` of unpaused play.
    Time { interval_ms: u64 },
}

impl Default for LevelProgression {
    fn default() -> Self {
        Self::Lines {
            lines_per_level: 10,
        }
    }
}

impl LevelProgression {
    /// Level reached after clearing `lines` lines, or `None` when the level
    /// does not depend on cleared lines.
    #[must_use]
    pub fn level_for_lines(self, lines: usize) -> Option<u32> {
        match self {
            Self::Lines { lines_per_level } => {
                let level = lines / lines_per_level.max(1) + 1;
                Some(u32::try_from(level).unwrap_or(u32::MAX))
            }
            Self::Time { .. } => None,
        }
    }

    /// Time between level-ups, or `None` when levels follow cleared lines.
    #[must_use]
    pub fn level_interval(self) -> Option<Duration> {
        match self {
            Self::Lines { .. } => None,
            Self::Time { interval_ms } => Some(Duration::from_millis(interval_ms)),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display(
        "board must be at least {}x{}, got {width}x{height}",
        MIN_BOARD_SIZE,
        MIN_BOARD_SIZE
    )]
    BoardTooSmall { width: u8, height: u8 },
    #[display("{name} must be greater than zero")]
    ZeroInterval { name: &'static str },
    #[display("min_fall_interval_ms ({min_ms}) exceeds base_fall_interval_ms ({base_ms})")]
    FloorAboveBase { min_ms: u64, base_ms: u64 },
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_BOARD_SIZE || self.height < MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        let level_step = match self.level_progression {
            LevelProgression::Lines { lines_per_level } => {
                u64::try_from(lines_per_level).unwrap_or(u64::MAX)
            }
            LevelProgression::Time { interval_ms } => interval_ms,
        };
        for (name, value) in [
            ("base_fall_interval_ms", self.base_fall_interval_ms),
            ("min_fall_interval_ms", self.min_fall_interval_ms),
            ("soft_drop_interval_ms", self.soft_drop_interval_ms),
            ("level_progression", level_step),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval { name });
            }
        }
        if self.min_fall_interval_ms > self.base_fall_interval_ms {
            return Err(ConfigError::FloorAboveBase {
                min_ms: self.min_fall_interval_ms,
                base_ms: self.base_fall_interval_ms,
            });
        }
        Ok(())
    }

    /// Gravity interval at `level` (1-based): shrinks by a fixed step per
    /// level and never drops below the configured floor.
    #[must_use]
    pub fn fall_interval(&self, level: u32) -> Duration {
        let steps = u64::from(level.saturating_sub(1));
        let millis = self
            .base_fall_interval_ms
            .saturating_sub(steps.saturating_mul(self.fall_interval_step_ms))
            .max(self.min_fall_interval_ms);
        Duration::from_millis(millis)
    }

    #[must_use]
    pub fn soft_drop_interval(&self) -> Duration {
        Duration::from_millis(self.soft_drop_interval_ms)
    }

    #[must_use]
    pub fn move_repeat_delay(&self) -> Duration {
        Duration::from_millis(self.move_repeat_delay_ms)
    }
}
