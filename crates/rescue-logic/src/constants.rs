//! Game constants - AP economy, action costs, search penalties, end conditions.
//!
//! Plain numeric constants with no engine dependency. The engine and the
//! headless harness both read these.

pub mod ap {
    /// AP granted at the start of each of an agent's turns.
    pub const REFILL: u8 = 4;
    /// Unspent AP carries over but never beyond this.
    pub const CAP: u8 = 8;
}

pub mod costs {
    pub const MOVE: u8 = 1;
    pub const MOVE_INTO_FIRE: u8 = 2;
    pub const MOVE_CARRYING: u8 = 2;
    pub const OPEN_DOOR: u8 = 1;
    pub const HIT_WALL: u8 = 2;
    pub const EXTINGUISH: u8 = 2;
    pub const FIRE_TO_SMOKE: u8 = 1;
    pub const CLEAR_SMOKE: u8 = 1;
    /// Extra AP that must remain after stepping into fire.
    pub const FIRE_RESERVE: u8 = 1;
}

/// Route-planning bias. Discourages, never forbids.
pub mod penalties {
    pub const CLOSED_DOOR: u32 = 1;
    pub const STANDING_WALL: u32 = 4;
}

pub mod structure {
    /// Hits that bring a wall side down.
    pub const WALL_HITS_TO_DEMOLISH: u8 = 2;
}

pub mod end {
    pub const RESCUES_TO_WIN: u32 = 7;
    pub const LOSSES_TO_LOSE: u32 = 4;
    pub const DAMAGE_TO_COLLAPSE: u32 = 24;
}

pub mod poi {
    /// Unrevealed POIs plus carried victims kept on the board.
    pub const ON_BOARD_TARGET: u32 = 3;
}

/// Samples a reactive agent draws per turn.
pub const REACTIVE_SAMPLES: usize = 8;
