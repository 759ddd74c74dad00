//! Point-of-interest replenishment

use rand::Rng;
use rescue_logic::constants::poi::ON_BOARD_TARGET;
use rescue_logic::rules::FireState;

use super::random_cell;
use crate::state::IncidentState;

/// Top the board back up to [`ON_BOARD_TARGET`] face-down markers plus
/// carried victims, while the bag lasts. Returns how many were placed.
///
/// A drawn cell that already holds a marker is redrawn. Fire and smoke on
/// the chosen cell are cleared first.
pub fn replenish_pois<R: Rng + ?Sized>(state: &mut IncidentState, rng: &mut R) -> usize {
    let mut placed = 0;
    loop {
        let pois = state.pois();
        if pois.unrevealed() + pois.on_board() >= ON_BOARD_TARGET || pois.is_exhausted() {
            break;
        }
        // every cell taken: nothing left to draw
        if pois.unrevealed() as usize >= state.size().cell_count() {
            break;
        }

        let cell = random_cell(state.size(), rng);
        if state.pois().kind_at(cell).is_some() {
            continue;
        }
        if state.fire_at(cell) != FireState::Clear {
            state.set_fire(cell, FireState::Clear);
        }
        let Some(kind) = state.pois_mut().draw(|total| rng.gen_range(0..total)) else {
            break;
        };
        state.pois_mut().place(cell, kind);
        placed += 1;
        log::debug!("placed {:?} marker at {}", kind, cell);
    }
    placed
}
