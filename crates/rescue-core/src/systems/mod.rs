//! Systems - logic that operates on the incident state and the crew

mod actions;
mod fire;
mod policy;
mod replenish;

pub use actions::*;
pub use fire::*;
pub use policy::*;
pub use replenish::*;

use rand::Rng;
use rescue_logic::geometry::{BoardSize, Cell};

/// Uniform cell draw. Successive draws are independent and may repeat.
pub(crate) fn random_cell<R: Rng + ?Sized>(size: BoardSize, rng: &mut R) -> Cell {
    let x = rng.gen_range(0..size.width);
    let y = rng.gen_range(0..size.height);
    Cell::new(x, y)
}
