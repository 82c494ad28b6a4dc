use sha2::{Digest, Sha256};

use crate::step::MatchSnapshot;
use crate::types::{AttackKind, PlayerInput, Strike};

fn strike_bytes(strike: Option<Strike>) -> [u8; 5] {
    match strike {
        None => [0; 5],
        Some(Strike::Quick(kind)) => {
            let k = match kind {
                AttackKind::Punch => 0,
                AttackKind::Kick => 1,
                AttackKind::Uppercut => 2,
            };
            [1, k, 0, 0, 0]
        }
        Some(Strike::Charged { ticks }) => {
            let t = ticks.to_le_bytes();
            [2, t[0], t[1], t[2], t[3]]
        }
    }
}

/// SHA-256 of the inputs fed to a match, both sides per tick. Identifies which input script a
/// run consumed, so two reports can be checked for having replayed the same inputs.
pub fn hash_transcript(transcript: &[[PlayerInput; 2]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for tick_inputs in transcript {
        for input in tick_inputs {
            hasher.update([input.buttons]);
            hasher.update(strike_bytes(input.strike));
        }
    }
    hasher.finalize().into()
}

/// SHA-256 over the JSON encoding of a snapshot. Equal digests mean equal observable state.
pub fn snapshot_digest(snapshot: &MatchSnapshot) -> [u8; 32] {
    // Snapshots only contain plain fields and string-keyed structs, so encoding cannot fail.
    let bytes = serde_json::to_vec(snapshot).unwrap_or_default();
    Sha256::digest(&bytes).into()
}
