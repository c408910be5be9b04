// src/constants.rs

// --- Difficulty Adaptation ---
pub const LEVEL_MIN: u8 = 1;
pub const LEVEL_MAX: u8 = 5;
pub const STREAK_TO_LEVEL_UP: u32 = 3; // Consecutive correct answers
pub const STREAK_TO_LEVEL_DOWN: u32 = 2; // Consecutive misses

// --- Question Generation ---
pub const DEFAULT_OPTION_COUNT: usize = 4;
pub const RECENT_BUFFER_CAP: usize = 10; // Anti-repeat window
pub const REGEN_ATTEMPTS: u32 = 5; // Redraws before accepting a repeat
pub const DISTRACTOR_ATTEMPTS: u32 = 300; // Random draws before sequential fallback
pub const INT_DELTA_MAX: i64 = 10; // Integer distractor offset band
pub const DECIMAL_DELTA_MAX: i64 = 15; // Decimal distractor band, percent of the answer
pub const DECIMAL_PLACES: u32 = 4;
pub const PERCENT_PLACES: u32 = 2;
pub const TABLE_MULTIPLIER_MIN: u32 = 1;
pub const TABLE_MULTIPLIER_MAX: u32 = 10;

// --- Fact Library Defaults ---
pub const TABLES_LIMIT: u32 = 20;
pub const SQUARES_LIMIT: u32 = 100;
pub const CUBES_LIMIT: u32 = 20;
pub const RECIPROCALS_LIMIT: u32 = 30;

// --- Progression ---
pub const XP_PER_LEVEL: u64 = 1000;
pub const HISTORY_CAP: usize = 30; // Rolling days kept in stats history
pub const QUIZ_XP_BASE: u64 = 10;
pub const QUIZ_XP_STREAK_BONUS: u64 = 2;
pub const TYPED_XP_BASE: u64 = 15;
pub const TYPED_XP_STREAK_BONUS: u64 = 3;

// --- Storage Keys ---
pub const STATS_KEY: &str = "mathforge_stats";
pub const SETTINGS_KEY: &str = "mathforge_settings";
pub const PROGRESS_KEY: &str = "mathforge_progress";
pub const DIFFICULTY_KEY: &str = "mathforge_difficulty";
