// All values are per-tick at 60 Hz unless noted.

// Tick rate
pub const TICK_RATE: u32 = 60;

// Arena
pub const ARENA_WIDTH: f64 = 800.0;
pub const ARENA_HEIGHT: f64 = 500.0;
/// Distance from the bottom edge to the ground line.
pub const GROUND_MARGIN: f64 = 80.0;

// Combatant physics
pub const GRAVITY: f64 = 0.6;
pub const MOVE_SPEED: f64 = 4.0;
pub const JUMP_POWER: f64 = 12.0;
/// Horizontal velocity multiplier applied every tick without movement input.
pub const FRICTION: f64 = 0.8;
pub const SLOW_FACTOR: f64 = 0.5;
pub const WALK_FACTOR: f64 = 0.5;

// Combatant hitbox
pub const COMBATANT_WIDTH: f64 = 45.0;
pub const COMBATANT_HEIGHT: f64 = 90.0;

// Spawn x: player 1 from the left wall, player 2 from the right wall (620 in an 800 arena)
pub const SPAWN_INSET_LEFT: f64 = 150.0;
pub const SPAWN_INSET_RIGHT: f64 = 180.0;

// Resources
pub const MAX_HP: i32 = 100;
pub const MAX_STAMINA: f64 = 100.0;
pub const STAMINA_REGEN: f64 = 0.3;
pub const BLOCK_STAMINA_DRAIN: f64 = 0.5;
pub const JUMP_STAMINA_COST: f64 = 5.0;

// Melee
pub const ATTACK_DAMAGE: i32 = 10;
pub const ATTACK_RANGE: f64 = 80.0;
pub const ATTACK_STAMINA_COST: f64 = 10.0;
pub const ATTACK_COOLDOWN_TICKS: i32 = 30;
pub const ATTACK_FRAME_TICKS: i32 = 10;
pub const ATTACK_ACTIVE_MS: u32 = 200;
pub const KICK_RANGE_BONUS: f64 = 10.0;
pub const KICK_DAMAGE_BONUS: i32 = 2;
pub const UPPERCUT_DAMAGE_BONUS: i32 = 5;
pub const CRIT_CHANCE: f64 = 0.15;
pub const CRIT_MULTIPLIER: f64 = 1.5;
pub const COMBO_BONUS_FACTOR: f64 = 1.5;
pub const COMBO_WINDOW_MS: u32 = 2000;
pub const ATTACK_RECOIL: f64 = 2.0;

// Guard
pub const BLOCK_DAMAGE_FACTOR: f64 = 0.3;
pub const BLOCK_CHIP_STAMINA: f64 = 5.0;
pub const GUARD_HIT_STAMINA: f64 = 10.0;

// Being hit
pub const HIT_KNOCKBACK: f64 = 5.0;
pub const HIT_FLASH_TICKS: i32 = 10;
pub const HURT_TICKS: i32 = 15;
pub const CRIT_DISPLAY_THRESHOLD: i32 = 20;

// Charge attack
pub const CHARGE_MIN_STAMINA: f64 = 10.0;
pub const CHARGE_KICK_TICKS: u32 = 30;
pub const CHARGE_UPPERCUT_TICKS: u32 = 50;
pub const CHARGE_PUNCH_MULT: f64 = 1.3;
pub const CHARGE_KICK_MULT: f64 = 1.8;
pub const CHARGE_UPPERCUT_MULT: f64 = 2.5;
/// Extra reach granted to charged releases and weapon swings.
pub const REACH_BONUS: f64 = 30.0;

// Roll
pub const ROLL_SPEED: f64 = 6.0;
pub const ROLL_TICKS: u32 = 15;
pub const ROLL_INVINCIBLE_TICKS: u32 = 12;
pub const ROLL_STAMINA_COST: f64 = 15.0;
pub const ROLL_COOLDOWN_TICKS: i32 = 20;

// Status effects
pub const BURN_INTERVAL_TICKS: u32 = 30;
pub const BURN_DAMAGE: i32 = 2;
pub const BURN_TICKS: u32 = 150;
pub const POISON_DAMAGE: i32 = 1;
pub const POISON_TICKS: u32 = 100;
pub const SLOW_TICKS: u32 = 120;
pub const STUN_TICKS: u32 = 30;

// Weapon effects
pub const WEAPON_KNOCKBACK: f64 = 8.0;
pub const WEAPON_CRIT_CHANCE: f64 = 0.3;
pub const WEAPON_CRIT_MULTIPLIER: f64 = 2.0;
pub const BOOMERANG_MULTIPLIER: f64 = 1.2;
pub const HOLY_BONUS: i32 = 10;
pub const THUNDER_BONUS: i32 = 8;
pub const LASER_MULTIPLIER: f64 = 0.9;

// Weapon drops
pub const WEAPON_WIDTH: f64 = 20.0;
pub const WEAPON_HEIGHT: f64 = 20.0;
pub const WEAPON_GRAVITY: f64 = 0.3;
pub const WEAPON_LAUNCH_VY: f64 = -3.0;
/// Horizontal launch speed is drawn from [-WEAPON_DRIFT, WEAPON_DRIFT).
pub const WEAPON_DRIFT: f64 = 1.0;
pub const WEAPON_SPAWN_Y: f64 = 100.0;
pub const WEAPON_SPAWN_MARGIN: f64 = 50.0;
pub const WEAPON_LIFETIME_TICKS: i32 = 300;
pub const WEAPON_DROP_INTERVAL_TICKS: u32 = 300;
pub const PICKUP_DISTANCE: f64 = 40.0;

// AI
pub const AI_DEFEND_HP: i32 = 30;
pub const AI_APPROACH_DISTANCE: f64 = 150.0;
pub const AI_ATTACK_DISTANCE: f64 = 80.0;
pub const AI_BACKOFF_DISTANCE: f64 = 40.0;
pub const AI_JUMP_CHANCE: f64 = 0.02;
pub const AI_DRIFT_CHANCE: f64 = 0.01;
pub const AI_ROLL_CHANCE: f64 = 0.3;
pub const AI_CHARGE_CHANCE: f64 = 0.2;
/// Ticks the AI pretends to have charged before releasing.
pub const AI_CHARGE_TICKS: u32 = 40;

// Match rules
/// Victory pose linger before game over is reported.
pub const VICTORY_LINGER_MS: u32 = 2000;
pub const VICTORY_FRAME_TICKS: u32 = 5;
pub const VICTORY_FRAME_COUNT: u32 = 4;

// Modes
pub const HARDCORE_MAX_HP: i32 = 50;
pub const HARDCORE_ATTACK_DAMAGE: i32 = 20;
pub const SURVIVAL_ATTACK_BONUS: i32 = 2;
pub const SURVIVAL_HP_BONUS: i32 = 10;
