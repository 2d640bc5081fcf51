use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Running total for one ability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbilityTally {
    pub total: i64,
    pub hits: u32,
    pub crits: u32,
}

impl AbilityTally {
    fn add(&mut self, amount: i64, critical: bool) {
        self.total = self.total.saturating_add(amount);
        self.hits = self.hits.saturating_add(1);
        if critical {
            self.crits += 1;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetricAccumulator {
    // Damage dealing
    pub damage_dealt: i64,
    pub damage_hit_count: u32,
    pub damage_crit_count: u32,

    // Healing given
    pub healing_done: i64,
    pub heal_count: u32,
    pub heal_crit_count: u32,

    // Damage receiving
    pub damage_received: i64,

    // General
    pub casts: u32,

    pub damage_by_ability: HashMap<i64, AbilityTally>,
    pub healing_by_ability: HashMap<i64, AbilityTally>,
}

impl MetricAccumulator {
    pub fn record_damage(&mut self, ability_id: i64, amount: i64, critical: bool) {
        self.damage_dealt = self.damage_dealt.saturating_add(amount);
        self.damage_hit_count += 1;
        if critical {
            self.damage_crit_count += 1;
        }
        self.damage_by_ability
            .entry(ability_id)
            .or_default()
            .add(amount, critical);
    }

    pub fn record_heal(&mut self, ability_id: i64, amount: i64, critical: bool) {
        self.healing_done = self.healing_done.saturating_add(amount);
        self.heal_count += 1;
        if critical {
            self.heal_crit_count += 1;
        }
        self.healing_by_ability
            .entry(ability_id)
            .or_default()
            .add(amount, critical);
    }

    /// Damage abilities by total, highest first. Ties break on ability id.
    pub fn top_damage_abilities(&self, limit: usize) -> Vec<(i64, AbilityTally)> {
        let mut abilities: Vec<_> = self
            .damage_by_ability
            .iter()
            .map(|(&id, &tally)| (id, tally))
            .collect();
        abilities.sort_by(|a, b| b.1.total.cmp(&a.1.total).then(a.0.cmp(&b.0)));
        abilities.truncate(limit);
        abilities
    }

    pub fn damage_crit_pct(&self) -> f32 {
        percent(self.damage_crit_count, self.damage_hit_count)
    }

    pub fn heal_crit_pct(&self) -> f32 {
        percent(self.heal_crit_count, self.heal_count)
    }
}

fn percent(part: u32, whole: u32) -> f32 {
    if whole == 0 {
        0.0
    } else {
        part as f32 / whole as f32 * 100.0
    }
}

/// Per-player numbers kept in an encounter summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMetrics {
    pub unit_id: String,
    pub name: String,
    pub damage: i64,
    pub healing: i64,
    pub dps: f64,
    pub hps: f64,
    pub damage_crit_pct: f32,
    pub heal_crit_pct: f32,
    pub casts: u32,
}

/// Amount per second over `duration_ms`; zero for an instant encounter.
pub fn per_second(amount: i64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        0.0
    } else {
        amount as f64 * 1000.0 / duration_ms as f64
    }
}
