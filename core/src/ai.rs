use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::constants::*;
use crate::prng::Prng;
use crate::types::{button, AttackKind, PlayerInput, Strike};

/// Anything that can drive a combatant for one tick.
pub trait InputSource {
    fn next_input(&mut self, me: &Combatant, opponent: &Combatant, rng: &mut Prng) -> PlayerInput;
}

/// A fixed input replays itself every tick.
impl InputSource for PlayerInput {
    fn next_input(&mut self, _me: &Combatant, _opponent: &Combatant, _rng: &mut Prng) -> PlayerInput {
        *self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AiState {
    #[default]
    Idle,
    Approach,
    Attack,
    Defend,
}

/// Pick the state for this tick. Low health overrides distance.
pub fn classify(hp: i32, distance: f64) -> AiState {
    if hp < AI_DEFEND_HP {
        AiState::Defend
    } else if distance > AI_APPROACH_DISTANCE {
        AiState::Approach
    } else if distance < AI_ATTACK_DISTANCE {
        AiState::Attack
    } else {
        AiState::Idle
    }
}

/// Distance-and-health driven opponent. Re-evaluated every tick; randomness comes from the
/// match generator so AI matches replay exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiPolicy {
    pub state: AiState,
}

impl AiPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSource for AiPolicy {
    fn next_input(&mut self, me: &Combatant, opponent: &Combatant, rng: &mut Prng) -> PlayerInput {
        let distance = (me.pos.x - opponent.pos.x).abs();
        self.state = classify(me.hp, distance);

        let (toward, away) = if me.pos.x < opponent.pos.x {
            (button::RIGHT, button::LEFT)
        } else {
            (button::LEFT, button::RIGHT)
        };

        let mut input = PlayerInput::default();
        match self.state {
            AiState::Defend => input.buttons = button::BLOCK | away,
            AiState::Approach => {
                input.buttons = toward;
                if rng.chance(AI_JUMP_CHANCE) && !me.airborne {
                    input.buttons |= button::JUMP;
                }
            }
            AiState::Attack => {
                if distance < AI_BACKOFF_DISTANCE {
                    input.buttons = away;
                } else if me.attack_cooldown <= 0 && me.stamina >= ATTACK_STAMINA_COST {
                    let r = rng.next_f64();
                    if r < AI_ROLL_CHANCE {
                        input.buttons = button::ROLL;
                    } else if r < AI_ROLL_CHANCE + AI_CHARGE_CHANCE {
                        input.strike = Some(Strike::Charged {
                            ticks: AI_CHARGE_TICKS,
                        });
                    } else {
                        let kind = if rng.chance(0.5) {
                            AttackKind::Kick
                        } else {
                            AttackKind::Punch
                        };
                        input.strike = Some(Strike::Quick(kind));
                    }
                }
            }
            AiState::Idle => {
                if rng.chance(AI_DRIFT_CHANCE) {
                    let side = if rng.chance(0.5) {
                        button::LEFT
                    } else {
                        button::RIGHT
                    };
                    input.buttons = side | button::WALK;
                }
            }
        }
        input
    }
}
