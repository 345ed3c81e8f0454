//! Semantic action IDs for battle click targets.

use super::combat::BattleAction;
use super::grid::{GridPos, GRID_H, GRID_W};
use crate::input::PointerTarget;

// ── Action menu ────────────────────────────────────────────────
pub const ACTION_DEFEND: u16 = 10;
pub const ACTION_ATTACK: u16 = 11;

// ── Play button (end the move phase) ───────────────────────────
pub const PLAY: u16 = 20;

// ── Sphere grid ────────────────────────────────────────────────
/// Cell base: + linear cell index (x + y * GRID_W).
pub const GRID_CELL_BASE: u16 = 100;

pub fn cell_id(pos: GridPos) -> u16 {
    GRID_CELL_BASE + pos.index() as u16
}

/// Map a hit-tested action ID to what the pointer is over.
pub fn pointer_target(id: u16) -> Option<PointerTarget> {
    match id {
        ACTION_DEFEND => Some(PointerTarget::Action(BattleAction::Defend)),
        ACTION_ATTACK => Some(PointerTarget::Action(BattleAction::Attack)),
        PLAY => Some(PointerTarget::Play),
        id if id >= GRID_CELL_BASE && ((id - GRID_CELL_BASE) as usize) < GRID_W * GRID_H => {
            let i = (id - GRID_CELL_BASE) as usize;
            Some(PointerTarget::Cell(GridPos::new(i % GRID_W, i / GRID_W)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_ids_round_trip() {
        let pos = GridPos::new(7, 8);
        assert_eq!(pointer_target(cell_id(pos)), Some(PointerTarget::Cell(pos)));
        assert_eq!(pointer_target(GRID_CELL_BASE + (GRID_W * GRID_H) as u16), None);
    }

    #[test]
    fn menu_and_play_ids() {
        assert_eq!(
            pointer_target(ACTION_ATTACK),
            Some(PointerTarget::Action(BattleAction::Attack))
        );
        assert_eq!(pointer_target(PLAY), Some(PointerTarget::Play));
        assert_eq!(pointer_target(0), None);
    }
}
