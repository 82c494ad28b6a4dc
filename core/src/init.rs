use crate::combatant::Combatant;
use crate::config::{MatchConfig, Tuning};
use crate::constants::*;
use crate::types::{Slot, Vec2};

/// Standing spawn point: player 1 near the left wall, player 2 near the right.
pub fn spawn_position(slot: Slot, tuning: &Tuning) -> Vec2 {
    let x = match slot {
        Slot::A => SPAWN_INSET_LEFT,
        Slot::B => tuning.arena_width - SPAWN_INSET_RIGHT,
    };
    Vec2::new(x, tuning.ground_y() - COMBATANT_HEIGHT)
}

pub fn spawn_combatant(slot: Slot, tuning: &Tuning, ai_enabled: bool) -> Combatant {
    Combatant::new(slot, spawn_position(slot, tuning), tuning, ai_enabled)
}

/// Both combatants at full resources, with hardcore stats applied if the mode is on.
pub fn create_fighters(config: &MatchConfig) -> [Combatant; 2] {
    Slot::ALL.map(|slot| {
        let mut c = spawn_combatant(slot, &config.tuning, config.ai_enabled[slot.index()]);
        if config.hardcore {
            c.apply_base_stats(HARDCORE_MAX_HP, HARDCORE_ATTACK_DAMAGE);
        }
        c
    })
}
