// src/tiers.rs

//! Session tiers: named presets that fix the per-question time limit and
//! the currency reward paid for each correct answer. The countdown itself
//! runs in the shell; the engine only consults the reward.

use serde::{Deserialize, Serialize};

use crate::economy::Currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierId {
    Gentle,
    Focused,
    Trial,
    Dragon,
}

#[derive(Debug, Clone, Copy)]
pub struct Reward {
    pub currency: Currency,
    pub amount: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct Tier {
    pub id: TierId,
    pub name: &'static str,
    pub description: &'static str,
    /// `None` means untimed.
    pub time_limit_secs: Option<u32>,
    pub reward: Reward,
}

pub const TIERS: [Tier; 4] = [
    Tier {
        id: TierId::Gentle,
        name: "Gentle Learning",
        description: "Unlimited time. Simple patterns.",
        time_limit_secs: None,
        reward: Reward { currency: Currency::Petals, amount: 1 },
    },
    Tier {
        id: TierId::Focused,
        name: "Focused Practice",
        description: "12s per question. Mild streak bonus.",
        time_limit_secs: Some(12),
        reward: Reward { currency: Currency::Petals, amount: 2 },
    },
    Tier {
        id: TierId::Trial,
        name: "Timed Trial",
        description: "8s per question. Earn Petals or Embers.",
        time_limit_secs: Some(8),
        reward: Reward { currency: Currency::Petals, amount: 3 },
    },
    Tier {
        id: TierId::Dragon,
        name: "Dragon Challenge",
        description: "5s per question. Rapid fire.",
        time_limit_secs: Some(5),
        reward: Reward { currency: Currency::Embers, amount: 2 },
    },
];

pub fn tier(id: TierId) -> &'static Tier {
    match id {
        TierId::Gentle => &TIERS[0],
        TierId::Focused => &TIERS[1],
        TierId::Trial => &TIERS[2],
        TierId::Dragon => &TIERS[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_the_table() {
        for t in &TIERS {
            assert_eq!(tier(t.id).name, t.name);
        }
    }

    #[test]
    fn time_limits_tighten_down_the_table() {
        assert_eq!(tier(TierId::Gentle).time_limit_secs, None);
        assert_eq!(tier(TierId::Focused).time_limit_secs, Some(12));
        assert_eq!(tier(TierId::Trial).time_limit_secs, Some(8));
        assert_eq!(tier(TierId::Dragon).time_limit_secs, Some(5));
    }
}
