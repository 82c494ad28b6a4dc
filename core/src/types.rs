use serde::{Deserialize, Serialize};

// ── Primitives ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub type Tick = u64;
pub type Seed = u32;

/// Which side of the match a combatant plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    /// Player 1, spawns on the left.
    A,
    /// Player 2, spawns on the right.
    B,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::A, Slot::B];

    pub fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }

    /// 1-based player number as shown to players.
    pub fn player_number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn opponent(self) -> Slot {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    pub fn from_index(i: usize) -> Option<Slot> {
        match i {
            0 => Some(Slot::A),
            1 => Some(Slot::B),
            _ => None,
        }
    }
}

// ── Input ───────────────────────────────────────────────────

/// Button bitmask constants.
pub mod button {
    pub const LEFT: u8 = 1;
    pub const RIGHT: u8 = 2;
    pub const JUMP: u8 = 4;
    pub const ATTACK: u8 = 8;
    pub const BLOCK: u8 = 16;
    pub const USE_WEAPON: u8 = 32;
    pub const ROLL: u8 = 64;
    /// Halves horizontal speed while held.
    pub const WALK: u8 = 128;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    Punch,
    Kick,
    Uppercut,
}

/// A one-shot attack command, resolved immediately instead of through the held-button charge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strike {
    Quick(AttackKind),
    /// Release a charge as if the attack button had been held for `ticks`.
    Charged { ticks: u32 },
}

/// Normalized per-tick input for one combatant. Human controls and the AI both produce this.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub buttons: u8,
    #[serde(default)]
    pub strike: Option<Strike>,
}

pub const NULL_INPUT: PlayerInput = PlayerInput {
    buttons: 0,
    strike: None,
};

impl PlayerInput {
    pub fn held(buttons: u8) -> Self {
        Self {
            buttons,
            strike: None,
        }
    }

    pub fn pressed(&self, b: u8) -> bool {
        self.buttons & b != 0
    }
}

// ── Presentation ────────────────────────────────────────────

/// What a combatant is visibly doing; renderers map this to an animation clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Idle,
    Walk,
    Run,
    Jump,
    Block,
    Charge,
    Attack,
    Roll,
    Hurt,
    Victory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Hardcore,
    Survival,
    Ai,
}
