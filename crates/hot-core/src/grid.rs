//! Resolving resting reel positions into the visible 5×3 symbol grid

use serde::{Deserialize, Serialize};

use crate::config::{REEL_COUNT, ROW_COUNT, STRIP_LEN};
use crate::reel::Reel;
use crate::symbols::SymbolKind;

/// The visible symbol window: `REEL_COUNT` columns of `ROW_COUNT` rows.
/// Cells are `None` only when a strip slot failed to resolve; a settled
/// spin normally produces a fully populated grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Option<SymbolKind>; ROW_COUNT]; REEL_COUNT],
}

impl Grid {
    /// Build a grid directly from cells (column-major: `cells[reel][row]`).
    pub fn from_cells(cells: [[Option<SymbolKind>; ROW_COUNT]; REEL_COUNT]) -> Self {
        Self { cells }
    }

    /// Snap each reel's strip onto the visible rows. A slot's effective
    /// row is `(position + slot) mod 4`, folded into `(-0.5, 3.5]` so a
    /// slot hovering just above the window counts as near row 0 rather
    /// than far below row 2. Each visible row takes the nearest slot;
    /// ties go to the first slot in strip order.
    pub fn resolve(reels: &[Reel]) -> Self {
        let mut cells = [[None; ROW_COUNT]; REEL_COUNT];
        for (reel_index, reel) in reels.iter().enumerate().take(REEL_COUNT) {
            let mut effective = [0.0f64; STRIP_LEN];
            for (slot, eff) in effective.iter_mut().enumerate() {
                let mut row = (reel.position() + slot as f64).rem_euclid(STRIP_LEN as f64);
                if row > 3.5 {
                    row -= STRIP_LEN as f64;
                }
                *eff = row;
            }
            for row in 0..ROW_COUNT {
                let mut best: Option<(usize, f64)> = None;
                for slot in 0..STRIP_LEN {
                    if reel.slots()[slot].is_none() {
                        continue;
                    }
                    let distance = (effective[slot] - row as f64).abs();
                    let closer = match best {
                        Some((_, d)) => distance < d,
                        None => true,
                    };
                    if closer {
                        best = Some((slot, distance));
                    }
                }
                if let Some((slot, _)) = best {
                    cells[reel_index][row] = reel.slots()[slot];
                }
            }
        }
        Self { cells }
    }

    pub fn get(&self, reel: usize, row: usize) -> Option<SymbolKind> {
        self.cells[reel][row]
    }

    /// Coordinates of every unresolved cell, in column-major order.
    pub fn unresolved_cells(&self) -> Vec<(u8, u8)> {
        let mut missing = Vec::new();
        for (reel, column) in self.cells.iter().enumerate() {
            for (row, cell) in column.iter().enumerate() {
                if cell.is_none() {
                    missing.push((reel as u8, row as u8));
                }
            }
        }
        missing
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..ROW_COUNT {
            for reel in 0..REEL_COUNT {
                if reel > 0 {
                    f.write_str(" | ")?;
                }
                match self.cells[reel][row] {
                    Some(symbol) => write!(f, "{symbol:<10}")?,
                    None => f.write_str("?         ")?,
                }
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
