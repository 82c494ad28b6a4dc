use serde::{Deserialize, Serialize};

use crate::constants::BURN_INTERVAL_TICKS;

/// Per-combatant damage-over-time and control timers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEffects {
    pub burn_damage_per_tick: i32,
    pub burn_ticks_remaining: u32,
    /// Ticks since the current burn was applied; damage lands whenever this is a multiple of
    /// the burn interval.
    pub burn_elapsed: u32,
    pub slow_ticks_remaining: u32,
    pub stun_ticks_remaining: u32,
}

impl StatusEffects {
    /// Start (or restart) a burn. Poison is a burn with a weaker, shorter profile.
    pub fn apply_burn(&mut self, damage: i32, ticks: u32) {
        self.burn_damage_per_tick = damage;
        self.burn_ticks_remaining = ticks;
        self.burn_elapsed = 0;
    }

    pub fn apply_slow(&mut self, ticks: u32) {
        self.slow_ticks_remaining = ticks;
    }

    pub fn apply_stun(&mut self, ticks: u32) {
        self.stun_ticks_remaining = ticks;
    }

    pub fn is_burning(&self) -> bool {
        self.burn_ticks_remaining > 0
    }

    pub fn is_slowed(&self) -> bool {
        self.slow_ticks_remaining > 0
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_ticks_remaining > 0
    }

    /// Advance every timer by one tick. Returns the burn damage due this tick, if any.
    pub fn tick(&mut self) -> Option<i32> {
        let mut due = None;
        if self.burn_ticks_remaining > 0 {
            if self.burn_elapsed % BURN_INTERVAL_TICKS == 0 {
                due = Some(self.burn_damage_per_tick);
            }
            self.burn_elapsed += 1;
            self.burn_ticks_remaining -= 1;
        }
        self.slow_ticks_remaining = self.slow_ticks_remaining.saturating_sub(1);
        self.stun_ticks_remaining = self.stun_ticks_remaining.saturating_sub(1);
        due
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
