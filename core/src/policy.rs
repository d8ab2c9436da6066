use crate::*;

/// Bomb density above which the machine makes the player open the box.
pub const FORCE_THRESHOLD: f64 = 0.6;

/// Opponent heuristic: a pure function of the game state.
///
/// Only meaningful on the machine's turn, callers are expected to go through
/// [`TurnEngine::machine_decision`] which checks that.
pub fn decide(state: &GameState) -> Decision {
    let remaining_boxes = state.remaining_boxes();
    let remaining_bombs = state.remaining_bombs();

    if remaining_boxes == 0 || remaining_bombs == 0 {
        return Decision::OpenSelf;
    }

    let bomb_probability = f64::from(remaining_bombs) / f64::from(remaining_boxes);
    let decision = if bomb_probability > FORCE_THRESHOLD {
        Decision::ForceOpponent
    } else {
        Decision::OpenSelf
    };
    log::debug!(
        "{} bombs in {} boxes ({:.3}), machine chooses {:?}",
        remaining_bombs,
        remaining_boxes,
        bomb_probability,
        decision
    );
    decision
}
