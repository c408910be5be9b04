// src/models.rs

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// --- Categories ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MathCategory {
    Tables,
    Squares,
    Cubes,
    Reciprocals,
    Powers,
    Mental,
    Mixed,
}

/// The five concrete fact categories. `Mental` and `Mixed` sit on top.
pub const BASE_CATEGORIES: [MathCategory; 5] = [
    MathCategory::Tables,
    MathCategory::Squares,
    MathCategory::Cubes,
    MathCategory::Reciprocals,
    MathCategory::Powers,
];

impl MathCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MathCategory::Tables => "tables",
            MathCategory::Squares => "squares",
            MathCategory::Cubes => "cubes",
            MathCategory::Reciprocals => "reciprocals",
            MathCategory::Powers => "powers",
            MathCategory::Mental => "mental",
            MathCategory::Mixed => "mixed",
        }
    }
}

impl fmt::Display for MathCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MathCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tables" => Ok(MathCategory::Tables),
            "squares" => Ok(MathCategory::Squares),
            "cubes" => Ok(MathCategory::Cubes),
            "reciprocals" => Ok(MathCategory::Reciprocals),
            "powers" => Ok(MathCategory::Powers),
            "mental" => Ok(MathCategory::Mental),
            "mixed" => Ok(MathCategory::Mixed),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

// --- Questions ---

/// The value an option stands for. Decimals are always pre-rounded to four
/// places, so derived equality compares canonical values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Int(i64),
    Decimal(f64),
}

impl OptionValue {
    /// Canonical display string. Decimals render at four places with
    /// trailing zeros trimmed ("0.0833", "2.5").
    pub fn label(&self) -> String {
        match self {
            OptionValue::Int(v) => v.to_string(),
            OptionValue::Decimal(v) => {
                let s = format!("{v:.4}");
                let s = s.trim_end_matches('0').trim_end_matches('.');
                s.to_string()
            }
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Unique within one question only.
    pub id: String,
    pub label: String,
    pub value: OptionValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Canonical fingerprint of category + operands ("7x8", "sq12", "pw3^4").
    /// Doubles as the anti-repeat token and the heatmap key.
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuestionOption>,
    pub correct_option_id: String,
    pub category: MathCategory,
}

impl Question {
    pub fn correct_option(&self) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == self.correct_option_id)
    }
}

/// Per-session overrides. Explicit `min`/`max`/`table`/`base` win over the
/// difficulty-derived defaults; `total_questions`/`time_limit` are carried
/// for the session shell and ignored by generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
    #[serde(default)]
    pub table: Option<u32>,
    #[serde(default)]
    pub base: Option<u32>,
    #[serde(default)]
    pub total_questions: Option<u32>,
    #[serde(default)]
    pub time_limit: Option<u32>,
}

/// One answered question, as reported by the session shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerEvent {
    pub category: MathCategory,
    pub is_correct: bool,
    pub time_taken_ms: u64,
    #[serde(default)]
    pub question_id: Option<String>,
}

// --- Persistent Stats ---

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CategoryStat {
    pub attempted: u64,
    pub correct: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HeatmapEntry {
    pub correct: u64,
    pub attempts: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub xp: u64,
    pub questions: u64,
}

/// The quiz-side progress snapshot. Every field defaults so blobs written
/// by older versions merge cleanly over the current shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub xp: u64,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_played: Option<NaiveDate>,
    #[serde(default)]
    pub total_questions: u64,
    #[serde(default)]
    pub correct_answers: u64,
    /// `None` until the first correct timed answer.
    #[serde(default)]
    pub fastest_time_ms: Option<u64>,
    #[serde(default = "default_category_stats")]
    pub category_stats: BTreeMap<MathCategory, CategoryStat>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub heatmap: HashMap<String, HeatmapEntry>,
}

fn default_level() -> u32 {
    1
}

fn default_category_stats() -> BTreeMap<MathCategory, CategoryStat> {
    BASE_CATEGORIES
        .iter()
        .map(|c| (*c, CategoryStat::default()))
        .collect()
}

impl Default for UserStats {
    fn default() -> Self {
        UserStats {
            xp: 0,
            level: 1,
            streak: 0,
            last_played: None,
            total_questions: 0,
            correct_answers: 0,
            fastest_time_ms: None,
            category_stats: default_category_stats(),
            history: Vec::new(),
            heatmap: HashMap::new(),
        }
    }
}

// --- Settings ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub vibration_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dark_mode: false,
            sound_enabled: true,
            vibration_enabled: true,
        }
    }
}
