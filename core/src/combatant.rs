use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::catalog::SpecialKind;
use crate::config::Tuning;
use crate::constants::*;
use crate::events::{EventLog, HitSource, MatchEvent};
use crate::physics::{apply_friction, apply_gravity, clamp_to_arena, direction_to, move_and_land};
use crate::prng::Prng;
use crate::status::StatusEffects;
use crate::types::{button, Action, AttackKind, PlayerInput, Slot, Strike, Tick, Vec2};
use crate::weapons::Weapon;

/// Shared, per-tick mutable context threaded through combatant updates.
pub struct TickCtx<'a> {
    pub tuning: &'a Tuning,
    pub rng: &'a mut Prng,
    pub events: &'a mut EventLog,
    pub tick: Tick,
}

/// Running totals shown on the end-of-match screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStats {
    pub hits: u32,
    pub damage_dealt: i32,
    pub max_combo: u32,
    pub weapons_collected: u32,
}

/// Attack kind and damage multiplier for a charge held `ticks` long.
pub fn charge_profile(ticks: u32) -> (AttackKind, f64) {
    if ticks < CHARGE_KICK_TICKS {
        (AttackKind::Punch, CHARGE_PUNCH_MULT)
    } else if ticks <= CHARGE_UPPERCUT_TICKS {
        (AttackKind::Kick, CHARGE_KICK_MULT)
    } else {
        (AttackKind::Uppercut, CHARGE_UPPERCUT_MULT)
    }
}

fn countdown(timer: &mut i32) {
    if *timer > 0 {
        *timer -= 1;
    }
}

fn scale(damage: i32, factor: f64) -> i32 {
    (damage as f64 * factor).floor() as i32
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub slot: Slot,
    /// Top-left corner of the hitbox.
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f64,
    pub height: f64,
    /// May go below zero on the killing blow; see [`Combatant::display_hp`].
    pub hp: i32,
    pub max_hp: i32,
    pub stamina: f64,
    pub max_stamina: f64,
    pub attack_damage: i32,
    pub attack_range: f64,
    pub weapon: Option<Weapon>,
    pub combo: u32,
    pub last_hit_tick: Option<Tick>,
    pub status: StatusEffects,

    pub airborne: bool,
    pub blocking: bool,
    pub attack_kind: AttackKind,
    /// Ticks left in the active attack window. Movement is locked while non-zero.
    pub attack_active_ticks: i32,
    pub attack_frame: i32,
    pub attack_cooldown: i32,
    pub charging: bool,
    pub charge_ticks: u32,
    pub rolling: bool,
    pub roll_tick: u32,
    pub roll_direction: f64,
    pub invincible: bool,
    pub hit_flash_ticks: i32,
    pub hurt_ticks: i32,
    pub victorious: bool,
    pub victory_timer: u32,
    pub victory_frame: u32,

    pub ai_enabled: bool,
    /// Buttons from the previous update, for edge-triggered actions.
    pub prev_buttons: u8,
    pub stats: CombatStats,
}

impl Combatant {
    pub fn new(slot: Slot, pos: Vec2, tuning: &Tuning, ai_enabled: bool) -> Self {
        Self {
            slot,
            pos,
            vel: Vec2::ZERO,
            width: COMBATANT_WIDTH,
            height: COMBATANT_HEIGHT,
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            stamina: tuning.max_stamina,
            max_stamina: tuning.max_stamina,
            attack_damage: tuning.attack_damage,
            attack_range: tuning.attack_range,
            weapon: None,
            combo: 0,
            last_hit_tick: None,
            status: StatusEffects::default(),
            airborne: false,
            blocking: false,
            attack_kind: AttackKind::Punch,
            attack_active_ticks: 0,
            attack_frame: 0,
            attack_cooldown: 0,
            charging: false,
            charge_ticks: 0,
            rolling: false,
            roll_tick: 0,
            roll_direction: match slot {
                Slot::A => 1.0,
                Slot::B => -1.0,
            },
            invincible: false,
            hit_flash_ticks: 0,
            hurt_ticks: 0,
            victorious: false,
            victory_timer: 0,
            victory_frame: 0,
            ai_enabled,
            prev_buttons: 0,
            stats: CombatStats::default(),
        }
    }

    // ── Queries ─────────────────────────────────────────────

    pub fn is_attacking(&self) -> bool {
        self.attack_active_ticks > 0
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn display_hp(&self) -> i32 {
        self.hp.clamp(0, self.max_hp)
    }

    /// Bottom-centre of the hitbox.
    pub fn feet(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.width / 2.0, self.pos.y + self.height)
    }

    /// +1 when facing right.
    pub fn facing(&self, opponent: &Combatant) -> f64 {
        direction_to(self.pos.x, opponent.pos.x)
    }

    pub fn can_collect_weapon(&self) -> bool {
        self.weapon.is_none() && !self.victorious
    }

    /// Animation state, highest priority first.
    pub fn current_action(&self) -> Action {
        if self.victorious {
            Action::Victory
        } else if self.hurt_ticks > 0 {
            Action::Hurt
        } else if self.rolling {
            Action::Roll
        } else if self.is_attacking() {
            Action::Attack
        } else if self.charging {
            Action::Charge
        } else if self.blocking {
            Action::Block
        } else if self.airborne {
            Action::Jump
        } else if self.vel.x.abs() > 4.0 {
            Action::Run
        } else if self.vel.x.abs() > 3.0 {
            Action::Walk
        } else {
            Action::Idle
        }
    }

    // ── Per-tick update ─────────────────────────────────────

    /// Advance this combatant by one tick under `input`. Hits land on `opponent` immediately.
    pub fn update(&mut self, input: &PlayerInput, opponent: &mut Combatant, ctx: &mut TickCtx) {
        if self.victorious {
            self.advance_victory();
            return;
        }

        let stunned = self.status.is_stunned();
        self.tick_timers(ctx);
        let prev_buttons = std::mem::replace(&mut self.prev_buttons, input.buttons);
        if stunned {
            return;
        }
        self.decay_combo(ctx);

        if self.rolling {
            self.advance_roll(ctx.tuning);
            return;
        }
        if self.charging {
            self.charge_ticks += 1;
            self.vel.x = 0.0;
        }

        self.apply_controls(input, prev_buttons, opponent, ctx);
        self.integrate(ctx.tuning);
        self.regen_stamina(ctx.tuning);
    }

    fn tick_timers(&mut self, ctx: &mut TickCtx) {
        if let Some(burn) = self.status.tick() {
            self.hp -= burn;
            trace!("player {} burns for {}", self.slot.player_number(), burn);
            ctx.events.push(MatchEvent::DamageTaken {
                defender: self.slot,
                amount: burn,
                show_as_crit: burn > CRIT_DISPLAY_THRESHOLD,
            });
        }
        countdown(&mut self.hit_flash_ticks);
        countdown(&mut self.hurt_ticks);
        countdown(&mut self.attack_cooldown);
        countdown(&mut self.attack_frame);
        countdown(&mut self.attack_active_ticks);
    }

    fn decay_combo(&mut self, ctx: &TickCtx) {
        let window = ctx.tuning.combo_window_ticks();
        let expired = self
            .last_hit_tick
            .map_or(true, |t| ctx.tick.saturating_sub(t) > window);
        if expired {
            self.combo = 0;
        }
    }

    fn apply_controls(
        &mut self,
        input: &PlayerInput,
        prev_buttons: u8,
        opponent: &mut Combatant,
        ctx: &mut TickCtx,
    ) {
        let tuning = ctx.tuning;
        let toward = direction_to(self.pos.x, opponent.pos.x);
        let intent = if input.pressed(button::LEFT) {
            -1.0
        } else if input.pressed(button::RIGHT) {
            1.0
        } else {
            0.0
        };
        let crouching = input.pressed(button::BLOCK) && !self.airborne;
        let can_move = !self.is_attacking() && !self.charging;
        // A guard may still back away from the opponent.
        let retreating = crouching && can_move && intent == -toward;

        let mut speed = tuning.move_speed;
        if self.status.is_slowed() {
            speed *= SLOW_FACTOR;
        }
        if input.pressed(button::WALK) {
            speed *= WALK_FACTOR;
        }
        if intent != 0.0 && can_move && (!crouching || retreating) {
            self.vel.x = intent * speed;
        } else {
            apply_friction(&mut self.vel);
        }

        if input.pressed(button::JUMP) && !self.airborne && !crouching {
            self.vel.y = -tuning.jump_power;
            self.airborne = true;
            self.spend_stamina(JUMP_STAMINA_COST);
        }

        if input.pressed(button::ATTACK)
            && self.attack_cooldown <= 0
            && self.stamina >= CHARGE_MIN_STAMINA
        {
            if !self.charging {
                self.charging = true;
                self.charge_ticks = 0;
            }
        } else if self.charging {
            self.release_charge(opponent, ctx);
        }

        if let Some(strike) = input.strike {
            if !self.charging {
                self.perform_strike(strike, opponent, ctx);
            }
        }

        if input.pressed(button::ROLL) && self.attack_cooldown <= 0 && !self.charging {
            self.start_roll();
        }

        self.blocking = crouching;
        if crouching {
            self.spend_stamina(BLOCK_STAMINA_DRAIN);
            if !retreating {
                self.vel.x = 0.0;
            }
        }

        if input.pressed(button::USE_WEAPON) && prev_buttons & button::USE_WEAPON == 0 {
            self.use_weapon(opponent, ctx);
        }
    }

    fn perform_strike(&mut self, strike: Strike, opponent: &mut Combatant, ctx: &mut TickCtx) {
        if self.attack_cooldown > 0 {
            return;
        }
        match strike {
            Strike::Quick(kind) => {
                if self.stamina >= ATTACK_STAMINA_COST {
                    self.attack_kind = kind;
                    self.attack(opponent, None, ctx);
                }
            }
            Strike::Charged { ticks } => {
                if self.stamina >= CHARGE_MIN_STAMINA {
                    self.charging = true;
                    self.charge_ticks = ticks;
                    self.release_charge(opponent, ctx);
                }
            }
        }
    }

    fn integrate(&mut self, tuning: &Tuning) {
        apply_gravity(&mut self.vel, tuning.gravity);
        let grounded = move_and_land(&mut self.pos, &mut self.vel, self.height, tuning.ground_y());
        self.airborne = !grounded;
        clamp_to_arena(&mut self.pos, self.width, tuning.arena_width);
    }

    fn regen_stamina(&mut self, tuning: &Tuning) {
        if self.stamina < self.max_stamina
            && !self.is_attacking()
            && !self.blocking
            && !self.charging
        {
            self.stamina = (self.stamina + tuning.stamina_regen).min(self.max_stamina);
        }
    }

    fn spend_stamina(&mut self, cost: f64) {
        self.stamina = (self.stamina - cost).max(0.0);
    }

    // ── Roll ────────────────────────────────────────────────

    /// Dodge roll: fixed direction per side, brief invulnerability. No-op if already rolling.
    pub fn start_roll(&mut self) {
        if self.rolling {
            return;
        }
        self.rolling = true;
        self.roll_tick = 0;
        self.invincible = true;
        self.charging = false;
        self.charge_ticks = 0;
        self.blocking = false;
        self.attack_cooldown = ROLL_COOLDOWN_TICKS;
        self.spend_stamina(ROLL_STAMINA_COST);
    }

    fn advance_roll(&mut self, tuning: &Tuning) {
        self.roll_tick += 1;
        self.vel.x = self.roll_direction * ROLL_SPEED;
        apply_gravity(&mut self.vel, tuning.gravity);
        self.airborne = !move_and_land(&mut self.pos, &mut self.vel, self.height, tuning.ground_y());
        clamp_to_arena(&mut self.pos, self.width, tuning.arena_width);
        self.invincible = self.roll_tick < ROLL_INVINCIBLE_TICKS;
        if self.roll_tick >= ROLL_TICKS {
            self.rolling = false;
            self.invincible = false;
            self.vel.x = 0.0;
        }
    }

    // ── Melee ───────────────────────────────────────────────

    /// Throw the current `attack_kind` at `opponent`. The swing always starts (cooldown, stamina,
    /// animation) once off cooldown; returns true only if it connected.
    pub fn attack(
        &mut self,
        opponent: &mut Combatant,
        damage_override: Option<i32>,
        ctx: &mut TickCtx,
    ) -> bool {
        if self.attack_cooldown > 0 {
            return false;
        }
        self.attack_active_ticks = ctx.tuning.attack_active_ticks();
        self.attack_frame = ATTACK_FRAME_TICKS;
        self.attack_cooldown = ATTACK_COOLDOWN_TICKS;
        self.spend_stamina(ATTACK_STAMINA_COST);

        let kind = self.attack_kind;
        let mut range = self.attack_range;
        let mut damage = damage_override.unwrap_or(self.attack_damage);
        match kind {
            AttackKind::Punch => {}
            AttackKind::Kick => {
                range += KICK_RANGE_BONUS;
                damage += KICK_DAMAGE_BONUS;
            }
            AttackKind::Uppercut => damage += UPPERCUT_DAMAGE_BONUS,
        }

        if (self.pos.x - opponent.pos.x).abs() > range || opponent.invincible {
            return false;
        }

        let is_crit = ctx.rng.chance(ctx.tuning.crit_chance);
        if is_crit {
            damage = scale(damage, CRIT_MULTIPLIER);
        }
        self.combo += 1;
        if self.combo > 1 {
            damage += scale(self.combo as i32, COMBO_BONUS_FACTOR);
        }
        if opponent.blocking && opponent.stamina > 0.0 {
            damage = scale(damage, BLOCK_DAMAGE_FACTOR);
            opponent.spend_stamina(BLOCK_CHIP_STAMINA);
        }
        self.last_hit_tick = Some(ctx.tick);

        opponent.receive_hit(damage, Some(self.pos.x), is_crit || self.combo > 1, ctx.events);
        ctx.events.push(MatchEvent::AttackLanded {
            attacker: self.slot,
            defender: opponent.slot,
            damage,
            is_crit,
            source: HitSource::Melee(kind),
        });
        self.vel.x = -direction_to(self.pos.x, opponent.pos.x) * ATTACK_RECOIL;
        self.record_hit(damage);
        trace!(
            "player {} {:?} hits for {} (combo {})",
            self.slot.player_number(),
            kind,
            damage,
            self.combo
        );
        true
    }

    /// Resolve a held charge. Beyond reach the charge is discarded without starting a swing.
    pub fn release_charge(&mut self, opponent: &mut Combatant, ctx: &mut TickCtx) -> bool {
        if !self.charging {
            return false;
        }
        self.charging = false;
        let ticks = std::mem::take(&mut self.charge_ticks);
        if (self.pos.x - opponent.pos.x).abs() > self.attack_range + REACH_BONUS {
            debug!("player {} charge of {} ticks out of reach", self.slot.player_number(), ticks);
            return false;
        }
        let (kind, mult) = charge_profile(ticks);
        self.attack_kind = kind;
        self.attack(opponent, Some(scale(self.attack_damage, mult)), ctx)
    }

    fn record_hit(&mut self, damage: i32) {
        self.stats.hits += 1;
        self.stats.damage_dealt += damage;
        self.stats.max_combo = self.stats.max_combo.max(self.combo);
    }

    // ── Receiving damage ────────────────────────────────────

    /// Apply an incoming hit, mitigated by an active guard. Returns the damage actually taken, or
    /// None if the hit passed through a rolling combatant.
    pub fn take_damage(
        &mut self,
        damage: i32,
        attacker_x: Option<f64>,
        is_crit: bool,
        ctx: &mut TickCtx,
    ) -> Option<i32> {
        if self.invincible {
            return None;
        }
        let mut damage = damage;
        if self.blocking && self.stamina > 0.0 {
            damage = scale(damage, BLOCK_DAMAGE_FACTOR);
            self.spend_stamina(GUARD_HIT_STAMINA);
        }
        self.receive_hit(damage, attacker_x, is_crit, ctx.events);
        Some(damage)
    }

    /// Deliver already-mitigated damage.
    fn receive_hit(
        &mut self,
        damage: i32,
        attacker_x: Option<f64>,
        show_as_crit: bool,
        events: &mut EventLog,
    ) {
        self.hp -= damage;
        self.hit_flash_ticks = HIT_FLASH_TICKS;
        self.hurt_ticks = HURT_TICKS;
        if let Some(ax) = attacker_x {
            let away = if self.pos.x < ax { -1.0 } else { 1.0 };
            self.vel.x = away * HIT_KNOCKBACK;
        }
        events.push(MatchEvent::DamageTaken {
            defender: self.slot,
            amount: damage,
            show_as_crit: show_as_crit || damage > CRIT_DISPLAY_THRESHOLD,
        });
    }

    // ── Weapons ─────────────────────────────────────────────

    /// Equip `weapon` if unarmed; hands it back otherwise.
    pub fn collect_weapon(&mut self, weapon: Weapon) -> Result<(), Weapon> {
        if self.weapon.is_some() {
            return Err(weapon);
        }
        self.weapon = Some(weapon);
        self.stats.weapons_collected += 1;
        Ok(())
    }

    /// Strike with the equipped weapon. Every use within reach costs one durability, even one
    /// that passes through a roll. Returns false when unarmed or out of reach.
    pub fn use_weapon(&mut self, opponent: &mut Combatant, ctx: &mut TickCtx) -> bool {
        let Some(weapon) = self.weapon.as_mut() else {
            return false;
        };
        if (self.pos.x - opponent.pos.x).abs() > self.attack_range + REACH_BONUS {
            return false;
        }

        let kind = weapon.kind;
        let archetype = weapon.archetype();
        let mut damage = archetype.damage_base;
        let mut is_crit = false;
        match archetype.special {
            SpecialKind::Crit => {
                if ctx.rng.chance(ctx.tuning.weapon_crit_chance) {
                    damage = scale(damage, WEAPON_CRIT_MULTIPLIER);
                    is_crit = true;
                }
            }
            SpecialKind::Boomerang => damage = scale(damage, BOOMERANG_MULTIPLIER),
            SpecialKind::Holy => damage += HOLY_BONUS,
            SpecialKind::Thunder => damage += THUNDER_BONUS,
            SpecialKind::Laser => damage = scale(damage, LASER_MULTIPLIER),
            _ => {}
        }
        weapon.durability -= 1;
        let broken = weapon.durability <= 0;

        if let Some(dealt) = opponent.take_damage(damage, Some(self.pos.x), is_crit, ctx) {
            match archetype.special {
                SpecialKind::Burn => opponent.status.apply_burn(BURN_DAMAGE, BURN_TICKS),
                SpecialKind::Poison => opponent.status.apply_burn(POISON_DAMAGE, POISON_TICKS),
                SpecialKind::Slow => opponent.status.apply_slow(SLOW_TICKS),
                SpecialKind::Stun => opponent.status.apply_stun(STUN_TICKS),
                SpecialKind::Knockback => {
                    opponent.vel.x = direction_to(self.pos.x, opponent.pos.x) * WEAPON_KNOCKBACK;
                }
                _ => {}
            }
            ctx.events.push(MatchEvent::AttackLanded {
                attacker: self.slot,
                defender: opponent.slot,
                damage: dealt,
                is_crit,
                source: HitSource::Weapon(kind),
            });
            self.record_hit(dealt);
        }

        if broken {
            self.weapon = None;
            debug!("player {}'s {} broke", self.slot.player_number(), archetype.name);
            ctx.events.push(MatchEvent::WeaponBroken {
                combatant: self.slot,
                weapon: kind,
            });
        }
        true
    }

    // ── Match flow ──────────────────────────────────────────

    /// Freeze combat for this combatant and start the victory animation.
    pub fn set_victorious(&mut self) {
        self.victorious = true;
        self.victory_timer = 0;
        self.victory_frame = 0;
        self.charging = false;
        self.charge_ticks = 0;
        self.blocking = false;
        self.rolling = false;
        self.invincible = false;
        self.vel = Vec2::ZERO;
    }

    pub fn advance_victory(&mut self) {
        self.victory_timer += 1;
        self.victory_frame = (self.victory_timer / VICTORY_FRAME_TICKS) % VICTORY_FRAME_COUNT;
    }

    /// Replace max hp and attack, healing to full. Used by the hardcore toggle.
    pub fn apply_base_stats(&mut self, max_hp: i32, attack_damage: i32) {
        self.max_hp = max_hp;
        self.hp = max_hp;
        self.attack_damage = attack_damage;
    }

    /// The next survival wave: a fresh AI-driven combatant at `pos`, a little tougher than this one.
    pub fn respawned(&self, pos: Vec2, tuning: &Tuning) -> Combatant {
        let mut next = Combatant::new(self.slot, pos, tuning, true);
        next.apply_base_stats(
            self.max_hp + SURVIVAL_HP_BONUS,
            self.attack_damage + SURVIVAL_ATTACK_BONUS,
        );
        next.stats = self.stats;
        next
    }
}

/// Split the pair into (`slot`'s combatant, its opponent).
pub fn pair_mut(fighters: &mut [Combatant; 2], slot: Slot) -> (&mut Combatant, &mut Combatant) {
    let (a, b) = fighters.split_at_mut(1);
    match slot {
        Slot::A => (&mut a[0], &mut b[0]),
        Slot::B => (&mut b[0], &mut a[0]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WeaponKind;
    use crate::init::spawn_combatant;
    use crate::types::NULL_INPUT;

    struct Rig {
        tuning: Tuning,
        rng: Prng,
        events: EventLog,
        tick: Tick,
    }

    impl Rig {
        fn new() -> Self {
            let mut tuning = Tuning::default();
            tuning.crit_chance = 0.0;
            tuning.weapon_crit_chance = 0.0;
            Self {
                tuning,
                rng: Prng::new(7),
                events: EventLog::new(),
                tick: 1,
            }
        }

        fn ctx(&mut self) -> TickCtx<'_> {
            TickCtx {
                tuning: &self.tuning,
                rng: &mut self.rng,
                events: &mut self.events,
                tick: self.tick,
            }
        }

        /// Player 1 at x=150, player 2 `dx` to the right, both standing.
        fn pair(&self, dx: f64) -> (Combatant, Combatant) {
            let a = spawn_combatant(Slot::A, &self.tuning, false);
            let mut b = spawn_combatant(Slot::B, &self.tuning, false);
            b.pos.x = a.pos.x + dx;
            (a, b)
        }

        fn step(&mut self, me: &mut Combatant, opp: &mut Combatant, input: PlayerInput) {
            let mut ctx = self.ctx();
            me.update(&input, opp, &mut ctx);
            self.tick += 1;
        }
    }

    fn equip(c: &mut Combatant, kind: WeaponKind) {
        let w = Weapon::new(0, kind, Vec2::ZERO, Vec2::ZERO, 300);
        assert!(c.collect_weapon(w).is_ok());
    }

    // ── Melee ───────────────────────────────────────────────

    #[test]
    fn punch_at_default_range_lands_base_damage() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(80.0);
        assert!(a.attack(&mut b, None, &mut rig.ctx()));
        assert_eq!(b.hp, 90);
        assert_eq!(a.attack_cooldown, 30);
        assert_eq!(a.attack_active_ticks, 12);
        assert_eq!(a.combo, 1);
        assert_eq!(b.hurt_ticks, HURT_TICKS);
        assert_eq!(b.vel.x, HIT_KNOCKBACK);
        assert_eq!(a.vel.x, -ATTACK_RECOIL);
        assert!(matches!(rig.events[0], MatchEvent::DamageTaken { amount: 10, .. }));
        assert!(matches!(rig.events[1], MatchEvent::AttackLanded { damage: 10, .. }));
    }

    #[test]
    fn whiff_still_pays_for_the_swing() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(81.0);
        assert!(!a.attack(&mut b, None, &mut rig.ctx()));
        assert_eq!(b.hp, 100);
        assert_eq!(a.attack_cooldown, 30);
        assert_eq!(a.stamina, 90.0);
        assert_eq!(a.combo, 0);
        assert!(rig.events.is_empty());
    }

    #[test]
    fn cooldown_prevents_attack() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(50.0);
        a.attack_cooldown = 5;
        assert!(!a.attack(&mut b, None, &mut rig.ctx()));
        assert_eq!(b.hp, 100);
        assert_eq!(a.stamina, 100.0);
    }

    #[test]
    fn kick_reaches_further_and_hits_harder() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(90.0);
        a.attack_kind = AttackKind::Kick;
        assert!(a.attack(&mut b, None, &mut rig.ctx()));
        assert_eq!(b.hp, 88);
    }

    #[test]
    fn uppercut_adds_bonus() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(40.0);
        a.attack_kind = AttackKind::Uppercut;
        a.attack(&mut b, None, &mut rig.ctx());
        assert_eq!(b.hp, 85);
    }

    #[test]
    fn guarded_hit_takes_thirty_percent() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        b.blocking = true;
        b.stamina = 50.0;
        assert!(a.attack(&mut b, None, &mut rig.ctx()));
        assert_eq!(b.hp, 97);
        assert_eq!(b.stamina, 45.0);
    }

    #[test]
    fn exhausted_guard_takes_full_damage() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        b.blocking = true;
        b.stamina = 0.0;
        a.attack(&mut b, None, &mut rig.ctx());
        assert_eq!(b.hp, 90);
    }

    #[test]
    fn third_combo_hit_adds_bonus() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        a.combo = 2;
        a.last_hit_tick = Some(0);
        a.attack(&mut b, None, &mut rig.ctx());
        assert_eq!(a.combo, 3);
        assert_eq!(b.hp, 100 - 14);
        assert_eq!(a.stats.max_combo, 3);
        assert!(matches!(
            rig.events[0],
            MatchEvent::DamageTaken {
                show_as_crit: true,
                ..
            }
        ));
    }

    #[test]
    fn guard_scales_the_whole_combo_total() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        a.combo = 2;
        a.last_hit_tick = Some(0);
        b.blocking = true;
        b.stamina = 50.0;
        assert!(a.attack(&mut b, None, &mut rig.ctx()));
        // floor((10 + floor(3 * 1.5)) * 0.3)
        assert_eq!(b.hp, 100 - 4);
        assert_eq!(b.stamina, 45.0);
    }

    #[test]
    fn crit_then_combo_then_guard() {
        let mut rig = Rig::new();
        rig.tuning.crit_chance = 1.0;
        let (mut a, mut b) = rig.pair(60.0);
        a.combo = 2;
        a.last_hit_tick = Some(0);
        b.blocking = true;
        b.stamina = 50.0;
        assert!(a.attack(&mut b, None, &mut rig.ctx()));
        // floor((15 + 4) * 0.3)
        assert_eq!(b.hp, 100 - 5);
        assert_eq!(b.stamina, 45.0);
        assert!(rig.events.contains(&MatchEvent::AttackLanded {
            attacker: Slot::A,
            defender: Slot::B,
            damage: 5,
            is_crit: true,
            source: HitSource::Melee(AttackKind::Punch),
        }));
    }

    #[test]
    fn guaranteed_crit_scales_damage() {
        let mut rig = Rig::new();
        rig.tuning.crit_chance = 1.0;
        let (mut a, mut b) = rig.pair(60.0);
        a.attack(&mut b, None, &mut rig.ctx());
        assert_eq!(b.hp, 85);
    }

    #[test]
    fn combo_resets_after_window() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(300.0);
        a.combo = 3;
        a.last_hit_tick = Some(0);
        rig.tick = 120;
        rig.step(&mut a, &mut b, NULL_INPUT);
        assert_eq!(a.combo, 3);
        rig.step(&mut a, &mut b, NULL_INPUT);
        assert_eq!(a.combo, 0);
    }

    #[test]
    fn attack_through_update_locks_movement() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        rig.step(
            &mut a,
            &mut b,
            PlayerInput {
                buttons: 0,
                strike: Some(Strike::Quick(AttackKind::Punch)),
            },
        );
        assert_eq!(b.hp, 90);
        assert_eq!(a.attack_cooldown, 30);
        let x = a.pos.x;
        rig.step(&mut a, &mut b, PlayerInput::held(button::RIGHT));
        assert!(a.vel.x <= 0.0, "moved while attacking: vx={}", a.vel.x);
        assert!(a.pos.x <= x);
    }

    // ── Charge ──────────────────────────────────────────────

    #[test]
    fn charge_thresholds() {
        assert_eq!(charge_profile(0), (AttackKind::Punch, 1.3));
        assert_eq!(charge_profile(29), (AttackKind::Punch, 1.3));
        assert_eq!(charge_profile(30), (AttackKind::Kick, 1.8));
        assert_eq!(charge_profile(50), (AttackKind::Kick, 1.8));
        assert_eq!(charge_profile(51), (AttackKind::Uppercut, 2.5));
    }

    #[test]
    fn held_attack_releases_as_charged_kick() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        for _ in 0..35 {
            rig.step(&mut a, &mut b, PlayerInput::held(button::ATTACK));
            assert!(a.charging);
            assert_eq!(b.hp, 100);
        }
        rig.step(&mut a, &mut b, NULL_INPUT);
        assert!(!a.charging);
        assert_eq!(a.attack_kind, AttackKind::Kick);
        assert_eq!(b.hp, 100 - (18 + KICK_DAMAGE_BONUS));
    }

    #[test]
    fn charge_released_out_of_reach_is_discarded() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(200.0);
        a.charging = true;
        a.charge_ticks = 40;
        assert!(!a.release_charge(&mut b, &mut rig.ctx()));
        assert!(!a.charging);
        assert_eq!(a.attack_cooldown, 0);
        assert_eq!(a.stamina, 100.0);
        assert_eq!(b.hp, 100);
    }

    #[test]
    fn charged_strike_command_resolves_immediately() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        rig.step(
            &mut a,
            &mut b,
            PlayerInput {
                buttons: 0,
                strike: Some(Strike::Charged { ticks: 60 }),
            },
        );
        assert_eq!(a.attack_kind, AttackKind::Uppercut);
        assert_eq!(b.hp, 100 - (25 + UPPERCUT_DAMAGE_BONUS));
    }

    // ── Guard and movement ──────────────────────────────────

    #[test]
    fn guard_holds_ground_but_may_retreat() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(100.0);
        rig.step(&mut b, &mut a, PlayerInput::held(button::BLOCK | button::LEFT));
        assert!(b.blocking);
        assert_eq!(b.vel.x, 0.0);
        assert_eq!(b.stamina, 99.5);

        rig.step(&mut b, &mut a, PlayerInput::held(button::BLOCK | button::RIGHT));
        assert!(b.blocking);
        assert_eq!(b.vel.x, MOVE_SPEED);
    }

    #[test]
    fn jump_costs_stamina_and_leaves_ground() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(300.0);
        let ground = a.pos.y;
        rig.step(&mut a, &mut b, PlayerInput::held(button::JUMP));
        assert!(a.airborne);
        assert!(a.pos.y < ground);
        // Cost, then one tick of regen.
        assert!((a.stamina - 95.3).abs() < 1e-9);
        for _ in 0..60 {
            rig.step(&mut a, &mut b, NULL_INPUT);
        }
        assert!(!a.airborne);
        assert_eq!(a.pos.y, ground);
    }

    #[test]
    fn slow_halves_walk_speed() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(300.0);
        a.status.apply_slow(SLOW_TICKS);
        rig.step(&mut a, &mut b, PlayerInput::held(button::RIGHT));
        assert_eq!(a.vel.x, MOVE_SPEED * SLOW_FACTOR);
    }

    #[test]
    fn walk_modifier_stacks_with_slow() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(300.0);
        rig.step(&mut a, &mut b, PlayerInput::held(button::LEFT | button::WALK));
        assert_eq!(a.vel.x, -MOVE_SPEED * WALK_FACTOR);

        a.status.apply_slow(SLOW_TICKS);
        rig.step(&mut a, &mut b, PlayerInput::held(button::LEFT | button::WALK));
        assert_eq!(a.vel.x, -MOVE_SPEED * SLOW_FACTOR * WALK_FACTOR);
    }

    #[test]
    fn stunned_combatant_ignores_input_and_physics() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        a.status.apply_stun(3);
        a.pos.y -= 50.0;
        let before = a.clone();
        rig.step(
            &mut a,
            &mut b,
            PlayerInput {
                buttons: button::RIGHT | button::JUMP | button::ATTACK,
                strike: Some(Strike::Quick(AttackKind::Kick)),
            },
        );
        assert_eq!(a.pos, before.pos);
        assert_eq!(a.vel, before.vel);
        assert_eq!(a.stamina, before.stamina);
        assert!(!a.charging);
        assert_eq!(a.status.stun_ticks_remaining, 2);
        assert_eq!(b.hp, 100);
    }

    #[test]
    fn stamina_regenerates_when_idle() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(300.0);
        a.stamina = 50.0;
        rig.step(&mut a, &mut b, NULL_INPUT);
        assert!((a.stamina - 50.3).abs() < 1e-9);
        a.stamina = a.max_stamina;
        rig.step(&mut a, &mut b, NULL_INPUT);
        assert_eq!(a.stamina, a.max_stamina);
    }

    #[test]
    fn burn_damages_through_update() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(300.0);
        a.status.apply_burn(BURN_DAMAGE, BURN_TICKS);
        rig.step(&mut a, &mut b, NULL_INPUT);
        assert_eq!(a.hp, 98);
        assert_eq!(
            rig.events,
            vec![MatchEvent::DamageTaken {
                defender: Slot::A,
                amount: 2,
                show_as_crit: false
            }]
        );
    }

    // ── Roll ────────────────────────────────────────────────

    #[test]
    fn roll_is_invincible_for_twelve_ticks() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(400.0);
        a.start_roll();
        assert!(a.invincible);
        assert_eq!(a.stamina, 85.0);
        assert_eq!(a.attack_cooldown, ROLL_COOLDOWN_TICKS);

        for _ in 0..11 {
            rig.step(&mut a, &mut b, NULL_INPUT);
        }
        assert_eq!(a.take_damage(10, None, false, &mut rig.ctx()), None);
        assert_eq!(a.hp, 100);

        rig.step(&mut a, &mut b, NULL_INPUT);
        rig.step(&mut a, &mut b, NULL_INPUT);
        assert_eq!(a.take_damage(10, None, false, &mut rig.ctx()), Some(10));
        assert_eq!(a.hp, 90);
    }

    #[test]
    fn roll_moves_in_fixed_direction_and_ends() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(400.0);
        let start_a = a.pos.x;
        let start_b = b.pos.x;
        a.start_roll();
        b.start_roll();
        a.start_roll();
        for _ in 0..ROLL_TICKS {
            rig.step(&mut a, &mut b, NULL_INPUT);
            rig.step(&mut b, &mut a, NULL_INPUT);
        }
        assert!(!a.rolling && !b.rolling);
        assert!(!a.invincible);
        assert_eq!(a.pos.x, start_a + ROLL_SPEED * ROLL_TICKS as f64);
        assert_eq!(b.pos.x, start_b - ROLL_SPEED * ROLL_TICKS as f64);
        assert_eq!(a.stamina, 85.0);
    }

    #[test]
    fn roll_stays_inside_arena() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(0.0);
        b.pos.x = rig.tuning.arena_width - b.width - 10.0;
        b.start_roll();
        b.roll_direction = 1.0;
        for _ in 0..ROLL_TICKS {
            rig.step(&mut b, &mut a, NULL_INPUT);
        }
        assert_eq!(b.pos.x, rig.tuning.arena_width - b.width);
    }

    // ── Weapons ─────────────────────────────────────────────

    #[test]
    fn last_durability_breaks_weapon() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        equip(&mut a, WeaponKind::HolySword);
        if let Some(w) = a.weapon.as_mut() {
            w.durability = 1;
        }
        assert!(a.use_weapon(&mut b, &mut rig.ctx()));
        assert_eq!(b.hp, 100 - (30 + HOLY_BONUS));
        assert!(a.weapon.is_none());
        assert!(rig.events.contains(&MatchEvent::WeaponBroken {
            combatant: Slot::A,
            weapon: WeaponKind::HolySword
        }));
    }

    #[test]
    fn flame_sword_sets_burn() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        equip(&mut a, WeaponKind::FlameSword);
        a.use_weapon(&mut b, &mut rig.ctx());
        assert_eq!(b.hp, 85);
        assert!(b.status.is_burning());
        assert_eq!(b.status.burn_damage_per_tick, BURN_DAMAGE);
        assert_eq!(a.weapon.as_ref().map(|w| w.durability), Some(4));
    }

    #[test]
    fn melee_and_weapon_hits_report_in_the_same_order() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        assert!(a.attack(&mut b, None, &mut rig.ctx()));
        equip(&mut a, WeaponKind::HolySword);
        assert!(a.use_weapon(&mut b, &mut rig.ctx()));

        let order: Vec<&str> = rig
            .events
            .iter()
            .map(|e| match e {
                MatchEvent::DamageTaken { .. } => "damage",
                MatchEvent::AttackLanded { .. } => "landed",
                _ => "other",
            })
            .collect();
        assert_eq!(order, ["damage", "landed", "damage", "landed"]);
    }

    #[test]
    fn hammer_knockback_overrides_hit_push() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(50.0);
        equip(&mut a, WeaponKind::LightningHammer);
        a.use_weapon(&mut b, &mut rig.ctx());
        assert_eq!(b.vel.x, WEAPON_KNOCKBACK);
    }

    #[test]
    fn battle_axe_stuns_and_light_saber_scales() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(50.0);
        equip(&mut a, WeaponKind::BattleAxe);
        a.use_weapon(&mut b, &mut rig.ctx());
        assert_eq!(b.status.stun_ticks_remaining, STUN_TICKS);

        let (mut c, mut d) = rig.pair(50.0);
        equip(&mut c, WeaponKind::LightSaber);
        c.use_weapon(&mut d, &mut rig.ctx());
        assert_eq!(d.hp, 100 - 14);
    }

    #[test]
    fn weapon_through_roll_still_wears() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        equip(&mut a, WeaponKind::PoisonDagger);
        b.start_roll();
        assert!(a.use_weapon(&mut b, &mut rig.ctx()));
        assert_eq!(b.hp, 100);
        assert!(!b.status.is_burning());
        assert_eq!(a.weapon.as_ref().map(|w| w.durability), Some(6));
    }

    #[test]
    fn weapon_out_of_reach_is_not_used() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(111.0);
        equip(&mut a, WeaponKind::FrostBow);
        assert!(!a.use_weapon(&mut b, &mut rig.ctx()));
        assert_eq!(a.weapon.as_ref().map(|w| w.durability), Some(6));
    }

    #[test]
    fn weapon_button_fires_on_press_only() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        equip(&mut a, WeaponKind::FrostBow);
        rig.step(&mut a, &mut b, PlayerInput::held(button::USE_WEAPON));
        rig.step(&mut a, &mut b, PlayerInput::held(button::USE_WEAPON));
        assert_eq!(a.weapon.as_ref().map(|w| w.durability), Some(5));
        assert!(b.status.is_slowed());
        rig.step(&mut a, &mut b, NULL_INPUT);
        rig.step(&mut a, &mut b, PlayerInput::held(button::USE_WEAPON));
        assert_eq!(a.weapon.as_ref().map(|w| w.durability), Some(4));
    }

    #[test]
    fn armed_combatant_refuses_second_weapon() {
        let tuning = Tuning::default();
        let mut a = spawn_combatant(Slot::A, &tuning, false);
        equip(&mut a, WeaponKind::Boomerang);
        let spare = Weapon::new(1, WeaponKind::FrostBow, Vec2::ZERO, Vec2::ZERO, 300);
        assert!(a.collect_weapon(spare).is_err());
        assert_eq!(a.stats.weapons_collected, 1);
    }

    // ── Presentation and match flow ─────────────────────────

    #[test]
    fn action_priority() {
        let tuning = Tuning::default();
        let mut a = spawn_combatant(Slot::A, &tuning, false);
        assert_eq!(a.current_action(), Action::Idle);
        a.vel.x = 3.5;
        assert_eq!(a.current_action(), Action::Walk);
        a.blocking = true;
        assert_eq!(a.current_action(), Action::Block);
        a.charging = true;
        assert_eq!(a.current_action(), Action::Charge);
        a.attack_active_ticks = 3;
        assert_eq!(a.current_action(), Action::Attack);
        a.rolling = true;
        assert_eq!(a.current_action(), Action::Roll);
        a.hurt_ticks = 1;
        assert_eq!(a.current_action(), Action::Hurt);
        a.set_victorious();
        assert_eq!(a.current_action(), Action::Victory);
    }

    #[test]
    fn victory_animation_cycles_and_freezes_combat() {
        let mut rig = Rig::new();
        let (mut a, mut b) = rig.pair(60.0);
        a.set_victorious();
        let pos = a.pos;
        for _ in 0..10 {
            rig.step(&mut a, &mut b, PlayerInput::held(button::RIGHT | button::ATTACK));
        }
        assert_eq!(a.victory_frame, 2);
        assert_eq!(a.pos, pos);
        assert!(!a.charging);
        for _ in 0..10 {
            rig.step(&mut a, &mut b, NULL_INPUT);
        }
        assert_eq!(a.victory_frame, 0);
    }

    #[test]
    fn respawn_is_tougher_and_ai_driven() {
        let tuning = Tuning::default();
        let mut b = spawn_combatant(Slot::B, &tuning, false);
        b.hp = -5;
        b.stats.hits = 4;
        let next = b.respawned(b.pos, &tuning);
        assert_eq!(next.max_hp, 110);
        assert_eq!(next.hp, 110);
        assert_eq!(next.attack_damage, 12);
        assert!(next.ai_enabled);
        assert_eq!(next.stats.hits, 4);
    }

    #[test]
    fn display_hp_is_clamped() {
        let tuning = Tuning::default();
        let mut a = spawn_combatant(Slot::A, &tuning, false);
        a.hp = -7;
        assert_eq!(a.display_hp(), 0);
    }

    #[test]
    fn pair_mut_orders_by_slot() {
        let tuning = Tuning::default();
        let mut fighters = [
            spawn_combatant(Slot::A, &tuning, false),
            spawn_combatant(Slot::B, &tuning, false),
        ];
        let (me, opp) = pair_mut(&mut fighters, Slot::B);
        assert_eq!(me.slot, Slot::B);
        assert_eq!(opp.slot, Slot::A);
    }
}
