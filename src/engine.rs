// src/engine.rs

//! The engine facade the session shell talks to: question requests, answer
//! submission, purchases, settings, persistence, and optional remote sync.
//! All state lives in memory; every mutation re-persists whole snapshots
//! best-effort and never blocks gameplay on a storage failure.

use log::{info, warn};

use crate::constants::{DIFFICULTY_KEY, PROGRESS_KEY, SETTINGS_KEY, STATS_KEY};
use crate::difficulty::DifficultyTracker;
use crate::economy::{Currency, CurrencyLedger};
use crate::error::{GenerateError, SyncError};
use crate::generator::QuestionGenerator;
use crate::models::{AnswerEvent, MathCategory, Question, QuizConfig, Settings, UserStats};
use crate::storage::{load_json, save_json, KvStore};
use crate::sync::{RemoteSync, StatsSnapshot};
use crate::tiers::{tier, TierId};

pub struct Engine {
    generator: QuestionGenerator,
    difficulty: DifficultyTracker,
    stats: UserStats,
    progress: CurrencyLedger,
    settings: Settings,
    store: Box<dyn KvStore>,
    sync: Option<Box<dyn RemoteSync>>,
    user_id: Option<String>,
    current_tier: Option<TierId>,
}

impl Engine {
    /// Builds an engine over the given store, loading whatever snapshots
    /// it already holds. A corrupt or unreadable blob falls back to
    /// defaults with a warning; play continues.
    pub fn new(store: Box<dyn KvStore>) -> Self {
        let stats = load_or_default(store.as_ref(), STATS_KEY);
        let progress = load_or_default(store.as_ref(), PROGRESS_KEY);
        let settings = load_or_default(store.as_ref(), SETTINGS_KEY);
        let difficulty = load_or_default(store.as_ref(), DIFFICULTY_KEY);
        Engine {
            generator: QuestionGenerator::new(),
            difficulty,
            stats,
            progress,
            settings,
            store,
            sync: None,
            user_id: None,
            current_tier: None,
        }
    }

    pub fn with_sync(mut self, sync: Box<dyn RemoteSync>) -> Self {
        self.sync = Some(sync);
        self
    }

    /// Swaps the RNG for a seeded one. Test hook.
    pub fn with_seeded_generator(mut self, seed: u64) -> Self {
        self.generator = QuestionGenerator::with_seed(seed);
        self
    }

    // --- Questions ---

    /// Serves the next question. With no explicit level the per-category
    /// adaptive level applies.
    pub fn next_question(
        &mut self,
        category: MathCategory,
        option_count: usize,
        config: &QuizConfig,
        level: Option<u8>,
    ) -> Result<Question, GenerateError> {
        let level = level.unwrap_or_else(|| self.difficulty.level_for(category));
        self.generator.generate(category, option_count, config, level)
    }

    /// Applies one answered question: tier reward, progress ledger, and
    /// the difficulty state machine, then persists.
    pub fn submit_answer(&mut self, event: &AnswerEvent) {
        if event.is_correct {
            if let Some(tier_id) = self.current_tier {
                let reward = tier(tier_id).reward;
                self.progress.add(reward.currency, reward.amount);
            }
        }
        self.stats.record_answer(event);
        self.difficulty.record(event.category, event.is_correct);
        self.persist();
        self.push_sync();
    }

    /// Credits quiz XP (correctness-driven track).
    pub fn award_xp(&mut self, amount: u64) {
        self.stats.add_xp(amount);
        self.persist();
        self.push_sync();
    }

    // --- Tiers & store ---

    pub fn select_tier(&mut self, tier_id: TierId) {
        info!("[Session] tier selected: {}", tier(tier_id).name);
        self.current_tier = Some(tier_id);
    }

    pub fn clear_tier(&mut self) {
        self.current_tier = None;
    }

    pub fn current_tier(&self) -> Option<TierId> {
        self.current_tier
    }

    pub fn buy_item(&mut self, item: &str, cost: u64, currency: Currency) -> bool {
        let bought = self.progress.buy_item(item, cost, currency);
        if bought {
            self.persist();
            self.push_sync();
        }
        bought
    }

    pub fn consume_item(&mut self, item: &str) -> bool {
        let consumed = self.progress.consume_item(item);
        if consumed {
            self.persist();
        }
        consumed
    }

    /// One-shot rank-up notification for the shell.
    pub fn take_rank_up(&mut self) -> bool {
        let pending = self.progress.take_rank_up();
        if pending {
            self.persist();
        }
        pending
    }

    // --- Settings ---

    pub fn toggle_dark_mode(&mut self) {
        self.settings.dark_mode = !self.settings.dark_mode;
        self.persist();
    }

    pub fn toggle_sound(&mut self) {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        self.persist();
    }

    pub fn toggle_vibration(&mut self) {
        self.settings.vibration_enabled = !self.settings.vibration_enabled;
        self.persist();
    }

    // --- Lifecycle ---

    /// Wipes quiz progress and its persisted copy. Currency, rank, and
    /// settings survive a reset, matching the original behavior.
    pub fn reset_progress(&mut self) {
        self.stats.reset();
        self.difficulty.reset();
        if let Err(e) = self.store.remove(STATS_KEY) {
            warn!("[Storage] failed to clear stats blob: {e}");
        }
        if let Err(e) = self.store.remove(DIFFICULTY_KEY) {
            warn!("[Storage] failed to clear difficulty blob: {e}");
        }
        self.push_sync();
    }

    /// Attaches a user identity. A remote snapshot, when present,
    /// overwrites local state (last-write-wins); otherwise the local
    /// snapshot seeds the remote. Returns whether remote data won.
    pub fn sign_in(&mut self, user_id: &str) -> Result<bool, SyncError> {
        self.user_id = Some(user_id.to_string());
        let Some(sync) = self.sync.as_mut() else {
            return Ok(false);
        };
        match sync.fetch_stats(user_id)? {
            Some(snapshot) => {
                info!("[Sync] remote snapshot wins for {user_id}");
                self.stats = snapshot.stats;
                self.progress = snapshot.progress;
                self.persist();
                Ok(true)
            }
            None => {
                let snapshot = StatsSnapshot {
                    stats: self.stats.clone(),
                    progress: self.progress.clone(),
                };
                sync.upsert_stats(user_id, &snapshot)?;
                Ok(false)
            }
        }
    }

    pub fn sign_out(&mut self) {
        self.user_id = None;
    }

    // --- Accessors ---

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn progress(&self) -> &CurrencyLedger {
        &self.progress
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn difficulty_level(&self, category: MathCategory) -> u8 {
        self.difficulty.level_for(category)
    }

    // --- Internals ---

    fn persist(&mut self) {
        let writes = [
            save_json(self.store.as_mut(), STATS_KEY, &self.stats),
            save_json(self.store.as_mut(), PROGRESS_KEY, &self.progress),
            save_json(self.store.as_mut(), SETTINGS_KEY, &self.settings),
            save_json(self.store.as_mut(), DIFFICULTY_KEY, &self.difficulty),
        ];
        for result in writes {
            if let Err(e) = result {
                warn!("[Storage] snapshot write failed: {e}");
            }
        }
    }

    fn push_sync(&mut self) {
        let Some(user_id) = self.user_id.clone() else {
            return;
        };
        let snapshot = StatsSnapshot {
            stats: self.stats.clone(),
            progress: self.progress.clone(),
        };
        if let Some(sync) = self.sync.as_mut() {
            if let Err(e) = sync.upsert_stats(&user_id, &snapshot) {
                warn!("[Sync] upsert failed: {e}");
            }
        }
    }
}

fn load_or_default<T: serde::de::DeserializeOwned + Default>(
    store: &dyn KvStore,
    key: &str,
) -> T {
    match load_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            warn!("[Storage] failed to load {key}, using defaults: {e}");
            T::default()
        }
    }
}
