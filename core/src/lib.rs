pub mod ai;
pub mod catalog;
pub mod combatant;
pub mod config;
pub mod constants;
pub mod events;
pub mod hash;
pub mod init;
pub mod physics;
pub mod prng;
pub mod status;
pub mod step;
pub mod types;
pub mod weapons;

pub use ai::{AiPolicy, AiState, InputSource};
pub use catalog::{SpecialKind, WeaponArchetype, WeaponKind, CATALOG, WEAPON_KINDS};
pub use combatant::{charge_profile, CombatStats, Combatant, TickCtx};
pub use config::{default_config, ConfigError, MatchConfig, Tuning};
pub use constants::*;
pub use events::{EventLog, HitSource, MatchEvent};
pub use hash::*;
pub use init::*;
pub use prng::*;
pub use status::StatusEffects;
pub use step::{CombatantView, HeldWeaponView, MatchController, MatchSnapshot, WeaponView};
pub use types::*;
pub use weapons::{resolve_weapon_pickups, Weapon, WeaponDropScheduler};
