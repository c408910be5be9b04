// src/lib.rs

//! MathForge: an adaptive arithmetic practice engine. Generates
//! multiple-choice questions over tables, squares, cubes, reciprocals,
//! powers, and mental math; adapts per-category difficulty from answer
//! streaks; and keeps the progress, currency, and rank ledgers that the
//! surrounding shell renders. Persistence and remote sync sit behind small
//! traits so shells can plug in their own backends.

pub mod constants;
pub mod difficulty;
pub mod economy;
pub mod engine;
pub mod error;
pub mod facts;
pub mod generator;
pub mod models;
pub mod progress;
pub mod storage;
pub mod sync;
pub mod tiers;

pub use difficulty::{params_for, DifficultyTracker};
pub use economy::{Currency, CurrencyLedger, RANKS, STORE_ITEMS};
pub use engine::Engine;
pub use error::{GenerateError, StorageError, SyncError};
pub use generator::QuestionGenerator;
pub use models::{
    AnswerEvent, MathCategory, OptionValue, Question, QuestionOption, QuizConfig, Settings,
    UserStats,
};
pub use storage::{KvStore, MemoryStore, SqliteStore};
pub use sync::{MemorySync, RemoteSync, StatsSnapshot};
pub use tiers::{tier, Tier, TierId, TIERS};
