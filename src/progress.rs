// src/progress.rs

//! Progress ledger: XP, level, day-streak, per-category accuracy, the
//! per-question heatmap, and the rolling 30-day history. All date-sensitive
//! operations have an `*_on(date)` form; the public wrappers pin the UTC
//! calendar date.

use chrono::{NaiveDate, Utc};
use log::debug;

use crate::constants::{
    HISTORY_CAP, QUIZ_XP_BASE, QUIZ_XP_STREAK_BONUS, TYPED_XP_BASE, TYPED_XP_STREAK_BONUS,
    XP_PER_LEVEL,
};
use crate::models::{AnswerEvent, HistoryEntry, UserStats};

/// XP for a correct multiple-choice answer at the given in-session streak.
pub fn quiz_xp(streak: u64) -> u64 {
    QUIZ_XP_BASE + streak * QUIZ_XP_STREAK_BONUS
}

/// XP for a correct typed answer (mixed/mental modes pay more).
pub fn typed_xp(streak: u64) -> u64 {
    TYPED_XP_BASE + streak * TYPED_XP_STREAK_BONUS
}

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

impl UserStats {
    pub fn add_xp(&mut self, amount: u64) {
        self.add_xp_on(amount, today_utc());
    }

    pub fn add_xp_on(&mut self, amount: u64, today: NaiveDate) {
        self.xp += amount;
        self.level = (self.xp / XP_PER_LEVEL) as u32 + 1;
        self.bump_history(today, amount, 0);
        debug!("[Progress] +{} XP -> {} (level {})", amount, self.xp, self.level);
    }

    pub fn record_answer(&mut self, event: &AnswerEvent) {
        self.record_answer_on(event, today_utc());
    }

    pub fn record_answer_on(&mut self, event: &AnswerEvent, today: NaiveDate) {
        self.total_questions += 1;
        if event.is_correct {
            self.correct_answers += 1;
            let faster = self
                .fastest_time_ms
                .map_or(true, |t| event.time_taken_ms < t);
            if faster {
                self.fastest_time_ms = Some(event.time_taken_ms);
            }
        }

        let cat = self.category_stats.entry(event.category).or_default();
        cat.attempted += 1;
        if event.is_correct {
            cat.correct += 1;
        }

        if let Some(question_id) = &event.question_id {
            let entry = self.heatmap.entry(question_id.clone()).or_default();
            entry.attempts += 1;
            if event.is_correct {
                entry.correct += 1;
            }
        }

        self.bump_history(today, 0, 1);
        self.update_streak_on(today);
    }

    pub fn update_streak(&mut self) {
        self.update_streak_on(today_utc());
    }

    /// Day-streak continuity: same day is a no-op, an unbroken yesterday
    /// extends, anything else (including first play) restarts at 1.
    pub fn update_streak_on(&mut self, today: NaiveDate) {
        if self.last_played == Some(today) {
            return;
        }
        if self.last_played == today.pred_opt() {
            self.streak += 1;
        } else {
            self.streak = 1;
        }
        self.last_played = Some(today);
    }

    pub fn reset(&mut self) {
        *self = UserStats::default();
    }

    /// Accuracy over all recorded answers, in [0, 1].
    pub fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.correct_answers as f64 / self.total_questions as f64
    }

    fn bump_history(&mut self, today: NaiveDate, xp: u64, questions: u64) {
        match self.history.iter_mut().find(|h| h.date == today) {
            Some(entry) => {
                entry.xp += xp;
                entry.questions += questions;
            }
            None => self.history.push(HistoryEntry {
                date: today,
                xp,
                questions,
            }),
        }
        while self.history.len() > HISTORY_CAP {
            let _ = self.history.remove(0);
        }
    }
}
