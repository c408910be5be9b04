// src/economy.rs

//! Currency and rank ledger: petal/ember balances earned from tier
//! challenges, the lifetime XP track that drives rank, and the power-up
//! inventory. This XP track is independent of the quiz-side XP in
//! [`crate::models::UserStats`]: one rewards correctness, this one rewards
//! showing up for challenges.

use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Petals,
    Embers,
}

#[derive(Debug, Clone, Copy)]
pub struct Rank {
    pub title: &'static str,
    pub min_xp: u64,
}

/// Ascending XP thresholds; rank is the highest index whose threshold the
/// lifetime XP meets.
pub const RANKS: [Rank; 10] = [
    Rank { title: "Initiate of Numbers", min_xp: 0 },
    Rank { title: "Petal Adept", min_xp: 100 },
    Rank { title: "Blossom Scholar", min_xp: 250 },
    Rank { title: "Rune Weaver", min_xp: 500 },
    Rank { title: "Flame Tactician", min_xp: 900 },
    Rank { title: "Dragon's Pupil", min_xp: 1400 },
    Rank { title: "Sakura Warden", min_xp: 2000 },
    Rank { title: "Citadel Guardian", min_xp: 2700 },
    Rank { title: "Celestial Forgeborn", min_xp: 3500 },
    Rank { title: "Eternal Dualist", min_xp: 5000 },
];

#[derive(Debug, Clone, Copy)]
pub struct StoreItem {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: u64,
    pub currency: Currency,
}

pub const STORE_ITEMS: [StoreItem; 3] = [
    StoreItem {
        id: "freeze",
        name: "Time Freeze",
        description: "Stop the timer for 10 seconds.",
        cost: 50,
        currency: Currency::Petals,
    },
    StoreItem {
        id: "extraTime",
        name: "Chronos Gift",
        description: "Add +10 seconds to the clock.",
        cost: 50,
        currency: Currency::Embers,
    },
    StoreItem {
        id: "fiftyFifty",
        name: "Dual Strike",
        description: "Remove 2 wrong answers.",
        cost: 100,
        currency: Currency::Embers,
    },
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyLedger {
    #[serde(default)]
    pub petals: u64,
    #[serde(default)]
    pub embers: u64,
    /// Lifetime reward XP; never decreases.
    #[serde(default)]
    pub total_xp: u64,
    #[serde(default)]
    pub rank: usize,
    /// One-shot flag the shell consumes to show the rank-up banner.
    #[serde(default)]
    pub pending_rank_up: bool,
    #[serde(default = "default_inventory")]
    pub inventory: BTreeMap<String, u64>,
}

fn default_inventory() -> BTreeMap<String, u64> {
    STORE_ITEMS
        .iter()
        .map(|item| (item.id.to_string(), 0))
        .collect()
}

impl Default for CurrencyLedger {
    fn default() -> Self {
        CurrencyLedger {
            petals: 0,
            embers: 0,
            total_xp: 0,
            rank: 0,
            pending_rank_up: false,
            inventory: default_inventory(),
        }
    }
}

impl CurrencyLedger {
    pub fn add_petals(&mut self, amount: u64) {
        self.petals += amount;
        self.grant_xp(amount);
    }

    pub fn add_embers(&mut self, amount: u64) {
        self.embers += amount;
        self.grant_xp(amount);
    }

    pub fn add(&mut self, currency: Currency, amount: u64) {
        match currency {
            Currency::Petals => self.add_petals(amount),
            Currency::Embers => self.add_embers(amount),
        }
    }

    fn grant_xp(&mut self, amount: u64) {
        self.total_xp += amount;
        let before = self.rank;
        while self.rank + 1 < RANKS.len() && self.total_xp >= RANKS[self.rank + 1].min_xp {
            self.rank += 1;
        }
        if self.rank > before {
            self.pending_rank_up = true;
            info!(
                "[Rank] {} -> {} ({})",
                RANKS[before].title,
                RANKS[self.rank].title,
                self.total_xp
            );
        }
    }

    pub fn rank_title(&self) -> &'static str {
        RANKS[self.rank.min(RANKS.len() - 1)].title
    }

    /// Consumes the rank-up notification, returning whether one was pending.
    pub fn take_rank_up(&mut self) -> bool {
        std::mem::take(&mut self.pending_rank_up)
    }

    /// Check-and-deduct purchase. Balances never go negative; a failed
    /// purchase leaves both the balance and the inventory untouched.
    pub fn buy_item(&mut self, item: &str, cost: u64, currency: Currency) -> bool {
        let balance = match currency {
            Currency::Petals => &mut self.petals,
            Currency::Embers => &mut self.embers,
        };
        if *balance < cost {
            return false;
        }
        *balance -= cost;
        *self.inventory.entry(item.to_string()).or_insert(0) += 1;
        info!("[Store] bought {item} for {cost}");
        true
    }

    /// Check-and-decrement. Returns false when the item is out of stock.
    pub fn consume_item(&mut self, item: &str) -> bool {
        match self.inventory.get_mut(item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn item_count(&self, item: &str) -> u64 {
        self.inventory.get(item).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_strictly_ascending() {
        for pair in RANKS.windows(2) {
            assert!(pair[0].min_xp < pair[1].min_xp);
        }
    }

    #[test]
    fn crossing_a_threshold_raises_rank_once() {
        let mut ledger = CurrencyLedger::default();
        ledger.add_petals(90);
        assert_eq!(ledger.rank, 0);
        assert!(!ledger.pending_rank_up);

        ledger.add_petals(20);
        assert_eq!(ledger.total_xp, 110);
        assert_eq!(ledger.rank, 1);
        assert!(ledger.take_rank_up());
        assert!(!ledger.take_rank_up(), "flag is one-shot");
    }

    #[test]
    fn a_large_grant_skips_intermediate_ranks() {
        let mut ledger = CurrencyLedger::default();
        ledger.add_embers(3000);
        assert_eq!(ledger.rank, 8);
        assert_eq!(ledger.rank_title(), "Celestial Forgeborn");
    }

    #[test]
    fn both_currencies_feed_one_xp_track() {
        let mut ledger = CurrencyLedger::default();
        ledger.add_petals(60);
        ledger.add_embers(60);
        assert_eq!(ledger.petals, 60);
        assert_eq!(ledger.embers, 60);
        assert_eq!(ledger.total_xp, 120);
        assert_eq!(ledger.rank, 1);
    }

    #[test]
    fn purchase_fails_without_funds() {
        let mut ledger = CurrencyLedger::default();
        ledger.petals = 30;
        assert!(!ledger.buy_item("freeze", 50, Currency::Petals));
        assert_eq!(ledger.petals, 30);
        assert_eq!(ledger.item_count("freeze"), 0);
    }

    #[test]
    fn purchase_deducts_and_stocks() {
        let mut ledger = CurrencyLedger::default();
        ledger.petals = 80;
        assert!(ledger.buy_item("freeze", 50, Currency::Petals));
        assert_eq!(ledger.petals, 30);
        assert_eq!(ledger.item_count("freeze"), 1);
    }

    #[test]
    fn consume_never_goes_negative() {
        let mut ledger = CurrencyLedger::default();
        assert!(!ledger.consume_item("fiftyFifty"));
        ledger.embers = 100;
        assert!(ledger.buy_item("fiftyFifty", 100, Currency::Embers));
        assert!(ledger.consume_item("fiftyFifty"));
        assert!(!ledger.consume_item("fiftyFifty"));
    }

    #[test]
    fn purchases_never_touch_rank_xp() {
        let mut ledger = CurrencyLedger::default();
        ledger.add_petals(100);
        let xp = ledger.total_xp;
        assert!(ledger.buy_item("freeze", 50, Currency::Petals));
        assert_eq!(ledger.total_xp, xp);
    }
}
