use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::{WeaponArchetype, WeaponKind, WEAPON_KINDS};
use crate::combatant::{Combatant, TickCtx};
use crate::config::Tuning;
use crate::constants::*;
use crate::events::{EventLog, MatchEvent};
use crate::physics::{apply_gravity, clamp_to_arena, manhattan, move_and_land};
use crate::prng::Prng;
use crate::types::Vec2;

/// Ticks of the cosmetic bounce after a weapon lands.
const LANDING_BOUNCE_TICKS: i32 = 15;

/// A weapon instance: falling or lying in the arena, or held by a combatant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    pub id: u32,
    pub kind: WeaponKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub durability: i32,
    pub on_ground: bool,
    pub lifetime_ticks: i32,
    pub landing_ticks: i32,
}

impl Weapon {
    pub fn new(id: u32, kind: WeaponKind, pos: Vec2, vel: Vec2, lifetime_ticks: i32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            durability: kind.archetype().durability_max,
            on_ground: false,
            lifetime_ticks,
            landing_ticks: 0,
        }
    }

    /// Drop a random catalog weapon at a random x within the arena margins.
    pub fn spawn(id: u32, rng: &mut Prng, tuning: &Tuning) -> Self {
        let x = rng.range(WEAPON_SPAWN_MARGIN, tuning.arena_width - WEAPON_SPAWN_MARGIN);
        let vx = rng.range(-WEAPON_DRIFT, WEAPON_DRIFT);
        let kind = WEAPON_KINDS[rng.index(WEAPON_KINDS.len())];
        Self::new(
            id,
            kind,
            Vec2::new(x, WEAPON_SPAWN_Y),
            Vec2::new(vx, WEAPON_LAUNCH_VY),
            tuning.weapon_lifetime_ticks,
        )
    }

    pub fn archetype(&self) -> &'static WeaponArchetype {
        self.kind.archetype()
    }

    /// Fall until the ground is reached, then lie still. The lifetime runs either way.
    pub fn update(&mut self, tuning: &Tuning) {
        if !self.on_ground {
            apply_gravity(&mut self.vel, WEAPON_GRAVITY);
            if move_and_land(&mut self.pos, &mut self.vel, WEAPON_HEIGHT, tuning.ground_y()) {
                self.vel = Vec2::ZERO;
                self.on_ground = true;
                self.landing_ticks = LANDING_BOUNCE_TICKS;
            }
            clamp_to_arena(&mut self.pos, WEAPON_WIDTH, tuning.arena_width);
        }
        if self.landing_ticks > 0 {
            self.landing_ticks -= 1;
        }
        self.lifetime_ticks -= 1;
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime_ticks <= 0
    }

    /// Bottom-centre point, compared against a combatant's feet for pickups.
    pub fn anchor(&self) -> Vec2 {
        Vec2::new(self.pos.x + WEAPON_WIDTH / 2.0, self.pos.y + WEAPON_HEIGHT)
    }
}

// ── Drop scheduler ──────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponDropScheduler {
    pub timer: u32,
    next_id: u32,
}

impl WeaponDropScheduler {
    /// Advance loose weapons, despawn expired ones, and drop a new one once the timer passes
    /// the drop interval.
    pub fn tick(&mut self, weapons: &mut Vec<Weapon>, ctx: &mut TickCtx) {
        let tuning = ctx.tuning;
        for w in weapons.iter_mut() {
            w.update(tuning);
        }
        let events = &mut *ctx.events;
        weapons.retain(|w| {
            if w.is_expired() {
                debug!("weapon {} ({}) expired", w.id, w.archetype().name);
                events.push(MatchEvent::WeaponExpired { weapon: w.kind });
                return false;
            }
            true
        });

        self.timer += 1;
        if self.timer > tuning.weapon_drop_interval_ticks {
            let weapon = Weapon::spawn(self.next_id, ctx.rng, tuning);
            self.next_id += 1;
            self.timer = 0;
            debug!("dropped {} at x={:.1}", weapon.archetype().name, weapon.pos.x);
            ctx.events.push(MatchEvent::WeaponDropped {
                weapon: weapon.kind,
                x: weapon.pos.x,
            });
            weapons.push(weapon);
        }
    }
}

// ── Pickup ──────────────────────────────────────────────────

/// Hand grounded weapons to unarmed combatants standing on them. Combatants are checked in slot
/// order, so when both are in reach of the same weapon player 1 gets it. A weapon leaves the
/// arena the moment it is claimed.
pub fn resolve_weapon_pickups(
    fighters: &mut [Combatant; 2],
    weapons: &mut Vec<Weapon>,
    tuning: &Tuning,
    events: &mut EventLog,
) {
    let mut i = 0;
    while i < weapons.len() {
        if !weapons[i].on_ground {
            i += 1;
            continue;
        }
        let anchor = weapons[i].anchor();
        let taker = fighters.iter().position(|f| {
            f.can_collect_weapon() && manhattan(f.feet(), anchor) < tuning.pickup_distance
        });
        let Some(idx) = taker else {
            i += 1;
            continue;
        };
        let weapon = weapons.remove(i);
        let kind = weapon.kind;
        let fighter = &mut fighters[idx];
        if fighter.collect_weapon(weapon).is_ok() {
            debug!("player {} picked up {}", fighter.slot.player_number(), kind.archetype().name);
            events.push(MatchEvent::WeaponPickedUp {
                combatant: fighter.slot,
                weapon: kind,
            });
        }
    }
}
