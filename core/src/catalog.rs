use serde::{Deserialize, Serialize};

/// A weapon's on-hit behaviour beyond plain damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpecialKind {
    Burn,
    Knockback,
    Slow,
    Crit,
    Stun,
    Boomerang,
    Holy,
    Poison,
    Thunder,
    Laser,
}

/// Immutable catalog row shared by every weapon instance of that kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponArchetype {
    pub name: &'static str,
    pub damage_base: i32,
    pub special: SpecialKind,
    pub durability_max: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum WeaponKind {
    FlameSword = 0,
    LightningHammer = 1,
    FrostBow = 2,
    DiamondDagger = 3,
    BattleAxe = 4,
    Boomerang = 5,
    HolySword = 6,
    PoisonDagger = 7,
    ThunderHammer = 8,
    LightSaber = 9,
}

pub const WEAPON_KINDS: [WeaponKind; 10] = [
    WeaponKind::FlameSword,
    WeaponKind::LightningHammer,
    WeaponKind::FrostBow,
    WeaponKind::DiamondDagger,
    WeaponKind::BattleAxe,
    WeaponKind::Boomerang,
    WeaponKind::HolySword,
    WeaponKind::PoisonDagger,
    WeaponKind::ThunderHammer,
    WeaponKind::LightSaber,
];

/// Indexed by `WeaponKind as usize`.
pub static CATALOG: [WeaponArchetype; 10] = [
    WeaponArchetype { name: "Flame Sword", damage_base: 15, special: SpecialKind::Burn, durability_max: 5 },
    WeaponArchetype { name: "Lightning Hammer", damage_base: 20, special: SpecialKind::Knockback, durability_max: 4 },
    WeaponArchetype { name: "Frost Bow", damage_base: 12, special: SpecialKind::Slow, durability_max: 6 },
    WeaponArchetype { name: "Diamond Dagger", damage_base: 25, special: SpecialKind::Crit, durability_max: 3 },
    WeaponArchetype { name: "Battle Axe", damage_base: 22, special: SpecialKind::Stun, durability_max: 4 },
    WeaponArchetype { name: "Boomerang", damage_base: 18, special: SpecialKind::Boomerang, durability_max: 5 },
    WeaponArchetype { name: "Holy Sword", damage_base: 30, special: SpecialKind::Holy, durability_max: 2 },
    WeaponArchetype { name: "Poison Dagger", damage_base: 8, special: SpecialKind::Poison, durability_max: 7 },
    WeaponArchetype { name: "Thunder Hammer", damage_base: 28, special: SpecialKind::Thunder, durability_max: 3 },
    WeaponArchetype { name: "Light Saber", damage_base: 16, special: SpecialKind::Laser, durability_max: 6 },
];

impl WeaponKind {
    pub fn archetype(self) -> &'static WeaponArchetype {
        &CATALOG[self as usize]
    }

    pub fn from_index(i: usize) -> Option<Self> {
        WEAPON_KINDS.get(i).copied()
    }
}
