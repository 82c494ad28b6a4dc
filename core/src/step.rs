use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::ai::{AiPolicy, AiState, InputSource};
use crate::catalog::WeaponKind;
use crate::combatant::{pair_mut, CombatStats, Combatant, TickCtx};
use crate::config::MatchConfig;
use crate::constants::*;
use crate::events::{EventLog, MatchEvent};
use crate::hash::snapshot_digest;
use crate::init::{create_fighters, spawn_position};
use crate::prng::Prng;
use crate::types::{Action, AttackKind, Mode, PlayerInput, Slot, Tick};
use crate::weapons::{resolve_weapon_pickups, Weapon, WeaponDropScheduler};

// ── Snapshot ────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeldWeaponView {
    pub kind: WeaponKind,
    pub name: String,
    pub durability: i32,
    pub durability_max: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantView {
    pub slot: Slot,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub width: f64,
    pub height: f64,
    pub facing: i8,
    pub hp: i32,
    pub max_hp: i32,
    pub stamina: f64,
    pub max_stamina: f64,
    pub attack_damage: i32,
    pub action: Action,
    pub attack_kind: AttackKind,
    pub attack_frame: i32,
    pub charge_ticks: u32,
    pub combo: u32,
    pub weapon: Option<HeldWeaponView>,
    pub burning: bool,
    pub slowed: bool,
    pub stunned: bool,
    pub invincible: bool,
    pub hit_flash: bool,
    pub victory_frame: u32,
    pub ai_enabled: bool,
    pub ai_state: Option<AiState>,
    pub stats: CombatStats,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponView {
    pub id: u32,
    pub kind: WeaponKind,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub durability: i32,
    pub on_ground: bool,
    pub lifetime_ticks: i32,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub tick: Tick,
    pub arena_width: f64,
    pub ground_y: f64,
    pub fighters: [CombatantView; 2],
    pub weapons: Vec<WeaponView>,
    pub weapon_drop_timer: u32,
    pub hardcore: bool,
    pub survival: bool,
    pub survival_wave: u32,
    pub paused: bool,
    pub game_over: bool,
    pub winner: Option<Slot>,
}

fn combatant_view(c: &Combatant, opponent: &Combatant, ai: &AiPolicy) -> CombatantView {
    CombatantView {
        slot: c.slot,
        x: c.pos.x,
        y: c.pos.y,
        vx: c.vel.x,
        vy: c.vel.y,
        width: c.width,
        height: c.height,
        facing: c.facing(opponent) as i8,
        hp: c.display_hp(),
        max_hp: c.max_hp,
        stamina: c.stamina,
        max_stamina: c.max_stamina,
        attack_damage: c.attack_damage,
        action: c.current_action(),
        attack_kind: c.attack_kind,
        attack_frame: c.attack_frame,
        charge_ticks: c.charge_ticks,
        combo: c.combo,
        weapon: c.weapon.as_ref().map(|w| HeldWeaponView {
            kind: w.kind,
            name: w.archetype().name.to_string(),
            durability: w.durability,
            durability_max: w.archetype().durability_max,
        }),
        burning: c.status.is_burning(),
        slowed: c.status.is_slowed(),
        stunned: c.status.is_stunned(),
        invincible: c.invincible,
        hit_flash: c.hit_flash_ticks > 0,
        victory_frame: c.victory_frame,
        ai_enabled: c.ai_enabled,
        ai_state: c.ai_enabled.then_some(ai.state),
        stats: c.stats,
    }
}

fn weapon_view(w: &Weapon) -> WeaponView {
    WeaponView {
        id: w.id,
        kind: w.kind,
        name: w.archetype().name.to_string(),
        x: w.pos.x,
        y: w.pos.y,
        durability: w.durability,
        on_ground: w.on_ground,
        lifetime_ticks: w.lifetime_ticks,
    }
}

// ── Match controller ────────────────────────────────────────

/// Owns a whole match and advances it one fixed tick at a time.
///
/// Tick order:
///  0. Clear the event log; nothing happens while paused or over
///  1. Victory linger: freeze physics, advance victory counters, count down to game over
///  2. Weapon drop scheduler (fall, expire, spawn)
///  3. Pickup resolution (player 1 first)
///  4. Resolve inputs (AI replaces human input on AI-driven sides)
///  5. Player 1 update, then player 2 update
///  6. Win check: survival respawn or one-shot match end
pub struct MatchController {
    config: MatchConfig,
    tick: Tick,
    fighters: [Combatant; 2],
    ai: [AiPolicy; 2],
    weapons: Vec<Weapon>,
    drop_scheduler: WeaponDropScheduler,
    rng: Prng,
    paused: bool,
    concluded: bool,
    linger_ticks: u32,
    game_over: bool,
    winner: Option<Slot>,
    survival_wave: u32,
    events: EventLog,
}

impl MatchController {
    pub fn new(config: MatchConfig) -> Self {
        let fighters = create_fighters(&config);
        let rng = Prng::new(config.seed);
        Self {
            config,
            tick: 0,
            fighters,
            ai: [AiPolicy::new(); 2],
            weapons: Vec::new(),
            drop_scheduler: WeaponDropScheduler::default(),
            rng,
            paused: false,
            concluded: false,
            linger_ticks: 0,
            game_over: false,
            winner: None,
            survival_wave: 0,
            events: EventLog::new(),
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn tick_count(&self) -> Tick {
        self.tick
    }

    pub fn fighter(&self, slot: Slot) -> &Combatant {
        &self.fighters[slot.index()]
    }

    /// Direct access for scripted setups and tests.
    pub fn fighter_mut(&mut self, slot: Slot) -> &mut Combatant {
        &mut self.fighters[slot.index()]
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn weapons_mut(&mut self) -> &mut Vec<Weapon> {
        &mut self.weapons
    }

    pub fn drop_timer(&self) -> u32 {
        self.drop_scheduler.timer
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// True from the tick a combatant falls, including the victory linger.
    pub fn is_concluded(&self) -> bool {
        self.concluded
    }

    pub fn winner(&self) -> Option<Slot> {
        self.winner
    }

    pub fn survival_wave(&self) -> u32 {
        self.survival_wave
    }

    /// Events emitted during the most recent tick (or control call since).
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> EventLog {
        std::mem::take(&mut self.events)
    }

    // ── Tick ────────────────────────────────────────────────

    pub fn tick(&mut self, inputs: [PlayerInput; 2]) {
        self.events.clear();
        if self.paused || self.game_over {
            return;
        }

        if self.concluded {
            self.tick += 1;
            for f in self.fighters.iter_mut().filter(|f| f.victorious) {
                f.advance_victory();
            }
            self.linger_ticks = self.linger_ticks.saturating_sub(1);
            if self.linger_ticks == 0 {
                self.game_over = true;
                info!("game over at tick {}", self.tick);
            }
            return;
        }

        self.tick += 1;
        let mut ctx = TickCtx {
            tuning: &self.config.tuning,
            rng: &mut self.rng,
            events: &mut self.events,
            tick: self.tick,
        };

        self.drop_scheduler.tick(&mut self.weapons, &mut ctx);
        resolve_weapon_pickups(&mut self.fighters, &mut self.weapons, ctx.tuning, ctx.events);

        let mut resolved = inputs;
        for slot in Slot::ALL {
            let i = slot.index();
            if self.fighters[i].ai_enabled {
                let opponent = &self.fighters[slot.opponent().index()];
                resolved[i] = self.ai[i].next_input(&self.fighters[i], opponent, ctx.rng);
            }
        }

        for slot in Slot::ALL {
            let (me, opponent) = pair_mut(&mut self.fighters, slot);
            me.update(&resolved[slot.index()], opponent, &mut ctx);
        }

        self.check_outcome();
    }

    fn check_outcome(&mut self) {
        if self.concluded {
            return;
        }
        let [a, b] = &self.fighters;
        if a.is_alive() && b.is_alive() {
            return;
        }
        // Player 1 keeps the win only if still standing.
        let winner = if a.is_alive() { Slot::A } else { Slot::B };
        let loser = winner.opponent();

        if self.config.survival && self.fighters[loser.index()].ai_enabled {
            self.survival_wave += 1;
            let tuning = &self.config.tuning;
            let pos = spawn_position(loser, tuning);
            let next = self.fighters[loser.index()].respawned(pos, tuning);
            info!(
                "survival wave {}: player {} returns with {} hp / {} attack",
                self.survival_wave,
                loser.player_number(),
                next.max_hp,
                next.attack_damage
            );
            self.fighters[loser.index()] = next;
            self.ai[loser.index()] = AiPolicy::new();
            self.events.push(MatchEvent::CombatantRespawned {
                combatant: loser,
                wave: self.survival_wave,
            });
            return;
        }

        self.concluded = true;
        self.winner = Some(winner);
        self.fighters[winner.index()].set_victorious();
        self.linger_ticks = self.config.tuning.victory_linger_ticks();
        if self.linger_ticks == 0 {
            self.game_over = true;
        }
        info!("player {} wins at tick {}", winner.player_number(), self.tick);
        self.events.push(MatchEvent::MatchEnded { winner });
    }

    // ── Controls ────────────────────────────────────────────

    /// Swap both combatants to hardcore stats or back to the tuned defaults, healing both.
    pub fn set_hardcore(&mut self, enabled: bool) {
        self.config.hardcore = enabled;
        let (max_hp, attack) = if enabled {
            (HARDCORE_MAX_HP, HARDCORE_ATTACK_DAMAGE)
        } else {
            (self.config.tuning.max_hp, self.config.tuning.attack_damage)
        };
        for f in &mut self.fighters {
            f.apply_base_stats(max_hp, attack);
        }
        info!("hardcore {}", if enabled { "on" } else { "off" });
        self.events.push(MatchEvent::ModeChanged {
            mode: Mode::Hardcore,
            enabled,
        });
    }

    pub fn toggle_hardcore(&mut self) {
        self.set_hardcore(!self.config.hardcore);
    }

    pub fn set_survival(&mut self, enabled: bool) {
        self.config.survival = enabled;
        info!("survival {}", if enabled { "on" } else { "off" });
        self.events.push(MatchEvent::ModeChanged {
            mode: Mode::Survival,
            enabled,
        });
    }

    pub fn toggle_survival(&mut self) {
        self.set_survival(!self.config.survival);
    }

    pub fn set_ai_enabled(&mut self, slot: Slot, enabled: bool) {
        self.config.ai_enabled[slot.index()] = enabled;
        self.fighters[slot.index()].ai_enabled = enabled;
        self.ai[slot.index()] = AiPolicy::new();
        info!(
            "player {} ai {}",
            slot.player_number(),
            if enabled { "on" } else { "off" }
        );
        self.events.push(MatchEvent::ModeChanged {
            mode: Mode::Ai,
            enabled,
        });
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            info!("{} at tick {}", if paused { "paused" } else { "resumed" }, self.tick);
        }
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    /// Start a fresh match with the current modes. The generator carries on, so the next match
    /// plays out differently.
    pub fn reset(&mut self) {
        info!("reset after {} ticks", self.tick);
        self.fighters = create_fighters(&self.config);
        self.ai = [AiPolicy::new(); 2];
        self.weapons.clear();
        self.drop_scheduler = WeaponDropScheduler::default();
        self.tick = 0;
        self.paused = false;
        self.concluded = false;
        self.linger_ticks = 0;
        self.game_over = false;
        self.winner = None;
        self.survival_wave = 0;
        self.events.clear();
        debug!("rng state {:#010x}", self.rng.state());
    }

    // ── Observation ─────────────────────────────────────────

    pub fn snapshot(&self) -> MatchSnapshot {
        let [a, b] = &self.fighters;
        MatchSnapshot {
            tick: self.tick,
            arena_width: self.config.tuning.arena_width,
            ground_y: self.config.tuning.ground_y(),
            fighters: [
                combatant_view(a, b, &self.ai[0]),
                combatant_view(b, a, &self.ai[1]),
            ],
            weapons: self.weapons.iter().map(weapon_view).collect(),
            weapon_drop_timer: self.drop_scheduler.timer,
            hardcore: self.config.hardcore,
            survival: self.config.survival,
            survival_wave: self.survival_wave,
            paused: self.paused,
            game_over: self.game_over,
            winner: self.winner,
        }
    }

    /// SHA-256 of the current snapshot.
    pub fn state_digest(&self) -> [u8; 32] {
        snapshot_digest(&self.snapshot())
    }
}
