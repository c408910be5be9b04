// src/difficulty.rs

//! Difficulty semantics: the per-category parameter bands and the streak
//! state machine that moves a learner between them.

use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::constants::{LEVEL_MAX, LEVEL_MIN, STREAK_TO_LEVEL_DOWN, STREAK_TO_LEVEL_UP};
use crate::models::MathCategory;

/// Numeric parameters for one (category, level) pair. For `Powers` the
/// range bounds the exponent and `bases` lists the candidate bases; for
/// every other category `bases` is empty and the range bounds the operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelParams {
    pub min: u32,
    pub max: u32,
    pub bases: &'static [u32],
}

impl LevelParams {
    const fn range(min: u32, max: u32) -> Self {
        LevelParams {
            min,
            max,
            bases: &[],
        }
    }

    const fn powers(min: u32, max: u32, bases: &'static [u32]) -> Self {
        LevelParams { min, max, bases }
    }
}

/// The sole source of difficulty semantics. Bands widen (or their bounds
/// rise) monotonically with level.
pub fn params_for(category: MathCategory, level: u8) -> LevelParams {
    let level = level.clamp(LEVEL_MIN, LEVEL_MAX);
    match category {
        MathCategory::Tables | MathCategory::Mixed => match level {
            1 => LevelParams::range(2, 5),
            2 => LevelParams::range(6, 10),
            3 => LevelParams::range(11, 15),
            4 => LevelParams::range(16, 20),
            _ => LevelParams::range(21, 30),
        },
        MathCategory::Squares => match level {
            1 => LevelParams::range(2, 10),
            2 => LevelParams::range(11, 20),
            3 => LevelParams::range(21, 30),
            4 => LevelParams::range(31, 50),
            _ => LevelParams::range(51, 99),
        },
        MathCategory::Cubes => match level {
            1 => LevelParams::range(2, 5),
            2 => LevelParams::range(6, 10),
            3 => LevelParams::range(11, 15),
            4 => LevelParams::range(16, 20),
            _ => LevelParams::range(21, 25),
        },
        MathCategory::Reciprocals => match level {
            1 => LevelParams::range(2, 5),
            2 => LevelParams::range(6, 10),
            3 => LevelParams::range(11, 15),
            4 => LevelParams::range(16, 20),
            _ => LevelParams::range(21, 30),
        },
        MathCategory::Powers => match level {
            1 => LevelParams::powers(2, 4, &[2]),
            2 => LevelParams::powers(2, 5, &[2, 3]),
            3 => LevelParams::powers(2, 6, &[2, 3, 5]),
            4 => LevelParams::powers(2, 7, &[2, 3, 5, 6]),
            _ => LevelParams::powers(2, 8, &[2, 3, 5, 6, 7]),
        },
        MathCategory::Mental => match level {
            1 => LevelParams::range(10, 20),
            2 => LevelParams::range(10, 50),
            3 => LevelParams::range(10, 99),
            4 => LevelParams::range(20, 150),
            _ => LevelParams::range(50, 300),
        },
    }
}

// --- Streak state machine ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DifficultyState {
    pub current_level: u8,
    pub correct_streak: u32,
    pub incorrect_streak: u32,
}

impl Default for DifficultyState {
    fn default() -> Self {
        DifficultyState {
            current_level: LEVEL_MIN,
            correct_streak: 0,
            incorrect_streak: 0,
        }
    }
}

/// Per-category difficulty tracker. States are created lazily on the first
/// answer in a category; an untouched category reports level 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DifficultyTracker {
    #[serde(default)]
    modes: BTreeMap<MathCategory, DifficultyState>,
}

impl DifficultyTracker {
    pub fn new() -> Self {
        DifficultyTracker::default()
    }

    pub fn level_for(&self, category: MathCategory) -> u8 {
        self.modes
            .get(&category)
            .map(|s| s.current_level)
            .unwrap_or(LEVEL_MIN)
    }

    pub fn state(&self, category: MathCategory) -> Option<&DifficultyState> {
        self.modes.get(&category)
    }

    /// Applies one answer outcome. Three straight correct answers climb a
    /// level, two straight misses drop one; the moving streak resets on a
    /// level change and the opposing streak resets on every answer.
    pub fn record(&mut self, category: MathCategory, is_correct: bool) {
        let state = self.modes.entry(category).or_default();
        let before = state.current_level;

        if is_correct {
            state.correct_streak += 1;
            state.incorrect_streak = 0;
            if state.correct_streak >= STREAK_TO_LEVEL_UP && state.current_level < LEVEL_MAX {
                state.current_level += 1;
                state.correct_streak = 0;
            }
        } else {
            state.incorrect_streak += 1;
            state.correct_streak = 0;
            if state.incorrect_streak >= STREAK_TO_LEVEL_DOWN && state.current_level > LEVEL_MIN {
                state.current_level -= 1;
                state.incorrect_streak = 0;
            }
        }

        if state.current_level != before {
            info!(
                "[Difficulty] {}: level {} -> {}",
                category, before, state.current_level
            );
        }
    }

    pub fn reset(&mut self) {
        self.modes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BASE_CATEGORIES;

    fn midpoint(p: LevelParams) -> f64 {
        (p.min + p.max) as f64 / 2.0
    }

    #[test]
    fn bands_are_well_formed_and_monotonic() {
        let categories = [
            MathCategory::Tables,
            MathCategory::Squares,
            MathCategory::Cubes,
            MathCategory::Reciprocals,
            MathCategory::Powers,
            MathCategory::Mental,
            MathCategory::Mixed,
        ];
        for cat in categories {
            let mut prev: Option<LevelParams> = None;
            for level in 1..=5u8 {
                let p = params_for(cat, level);
                assert!(p.min <= p.max, "{cat} level {level}");
                if let Some(prev) = prev {
                    assert!(
                        midpoint(p) >= midpoint(prev),
                        "{cat} level {level} got easier"
                    );
                }
                prev = Some(p);
            }
        }
    }

    #[test]
    fn power_base_sets_widen_with_level() {
        let mut prev_len = 0;
        for level in 1..=5u8 {
            let p = params_for(MathCategory::Powers, level);
            assert!(p.bases.len() >= prev_len);
            prev_len = p.bases.len();
        }
        assert_eq!(params_for(MathCategory::Powers, 5).bases, &[2, 3, 5, 6, 7]);
    }

    #[test]
    fn out_of_range_levels_clamp() {
        assert_eq!(params_for(MathCategory::Squares, 0), params_for(MathCategory::Squares, 1));
        assert_eq!(params_for(MathCategory::Squares, 9), params_for(MathCategory::Squares, 5));
    }

    #[test]
    fn three_correct_answers_climb_one_level() {
        let mut tracker = DifficultyTracker::new();
        for _ in 0..3 {
            tracker.record(MathCategory::Tables, true);
        }
        let state = tracker.state(MathCategory::Tables).unwrap();
        assert_eq!(state.current_level, 2);
        assert_eq!(state.correct_streak, 0);
    }

    #[test]
    fn two_misses_drop_one_level() {
        let mut tracker = DifficultyTracker::new();
        for _ in 0..6 {
            tracker.record(MathCategory::Cubes, true);
        }
        assert_eq!(tracker.level_for(MathCategory::Cubes), 3);
        tracker.record(MathCategory::Cubes, false);
        tracker.record(MathCategory::Cubes, false);
        let state = tracker.state(MathCategory::Cubes).unwrap();
        assert_eq!(state.current_level, 2);
        assert_eq!(state.incorrect_streak, 0);
    }

    #[test]
    fn level_never_leaves_bounds() {
        let mut tracker = DifficultyTracker::new();
        for _ in 0..40 {
            tracker.record(MathCategory::Squares, true);
        }
        assert_eq!(tracker.level_for(MathCategory::Squares), 5);
        for _ in 0..40 {
            tracker.record(MathCategory::Squares, false);
        }
        assert_eq!(tracker.level_for(MathCategory::Squares), 1);
    }

    #[test]
    fn a_miss_resets_the_correct_streak() {
        let mut tracker = DifficultyTracker::new();
        tracker.record(MathCategory::Powers, true);
        tracker.record(MathCategory::Powers, true);
        tracker.record(MathCategory::Powers, false);
        tracker.record(MathCategory::Powers, true);
        // The earlier pair no longer counts toward a climb.
        assert_eq!(tracker.level_for(MathCategory::Powers), 1);
    }

    #[test]
    fn untouched_categories_report_level_one() {
        let tracker = DifficultyTracker::new();
        for cat in BASE_CATEGORIES {
            assert_eq!(tracker.level_for(cat), 1);
        }
    }
}
