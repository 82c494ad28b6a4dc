use serde::{Deserialize, Serialize};

use crate::catalog::WeaponKind;
use crate::types::{AttackKind, Mode, Slot};

/// What delivered a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "kind")]
pub enum HitSource {
    Melee(AttackKind),
    Weapon(WeaponKind),
}

/// Discrete notifications for audio, VFX and UI collaborators. Emitted in the order they occur
/// within a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum MatchEvent {
    #[serde(rename_all = "camelCase")]
    AttackLanded {
        attacker: Slot,
        defender: Slot,
        damage: i32,
        is_crit: bool,
        source: HitSource,
    },
    /// Any hp loss, including burn ticks. `show_as_crit` drives the big damage number.
    #[serde(rename_all = "camelCase")]
    DamageTaken {
        defender: Slot,
        amount: i32,
        show_as_crit: bool,
    },
    WeaponDropped {
        weapon: WeaponKind,
        x: f64,
    },
    WeaponExpired {
        weapon: WeaponKind,
    },
    WeaponPickedUp {
        combatant: Slot,
        weapon: WeaponKind,
    },
    WeaponBroken {
        combatant: Slot,
        weapon: WeaponKind,
    },
    CombatantRespawned {
        combatant: Slot,
        wave: u32,
    },
    MatchEnded {
        winner: Slot,
    },
    ModeChanged {
        mode: Mode,
        enabled: bool,
    },
}

/// Per-tick event buffer. Cleared at the start of every tick, so nothing accumulates when
/// nobody drains it.
pub type EventLog = Vec<MatchEvent>;
