//! Payline and scatter evaluation over a settled grid

use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer};

use crate::config::{REEL_COUNT, ROW_COUNT};
use crate::grid::Grid;
use crate::symbols::SymbolKind;

/// The five fixed paylines, row index per reel, in evaluation order:
/// middle, top, bottom, then the two V shapes.
pub const PAYLINES: [[usize; REEL_COUNT]; 5] = [
    [1, 1, 1, 1, 1],
    [0, 0, 0, 0, 0],
    [2, 2, 2, 2, 2],
    [0, 1, 2, 1, 0],
    [2, 1, 0, 1, 2],
];

/// Why a cell lights up in a win presentation. A cell that is part of
/// both a jackpot scatter and a payline keeps the jackpot marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellProvenance {
    /// Part of the winning run on this payline index.
    Line(u8),
    /// A jackpot symbol contributing to a scatter win.
    Jackpot,
}

/// Everything a settled grid yields: the credited amount, the cells to
/// highlight, and the presentation flags.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EvaluationResult {
    /// Sum of all line wins and the jackpot scatter win, in credits.
    pub total_win: u32,
    /// Winning cells keyed by `(reel, row)`. Serialized as a sorted
    /// `[reel, row, provenance]` list; JSON has no tuple keys.
    #[serde(serialize_with = "serialize_winning_cells")]
    pub winning_cells: HashMap<(u8, u8), CellProvenance>,
    pub has_line_win: bool,
    pub has_jackpot_win: bool,
    /// Any run or scatter reached four symbols (distinct win cue).
    pub qualifies_bonus_cue: bool,
}

impl EvaluationResult {
    pub fn is_win(&self) -> bool {
        self.has_line_win || self.has_jackpot_win
    }
}

fn serialize_winning_cells<S: Serializer>(
    cells: &HashMap<(u8, u8), CellProvenance>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut entries: Vec<_> = cells.iter().collect();
    entries.sort_by_key(|(coords, _)| **coords);
    serializer.collect_seq(
        entries
            .into_iter()
            .map(|(&(reel, row), &provenance)| (reel, row, provenance)),
    )
}

/// Fixed multiplier tables for line runs and the jackpot scatter.
/// Multipliers apply to the payout unit of the active stake.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayoutTable;

impl PayoutTable {
    pub fn new() -> Self {
        Self
    }

    /// Shortest left-anchored run of `kind` that pays on a line.
    /// `Jackpot` pays only as a scatter, never on a line.
    pub fn min_run(&self, kind: SymbolKind) -> Option<usize> {
        match kind {
            SymbolKind::Cherries => Some(2),
            SymbolKind::Jackpot => None,
            _ => Some(3),
        }
    }

    /// Multiplier for a left-anchored run of `run` symbols of `kind`.
    pub fn line_multiplier(&self, kind: SymbolKind, run: usize) -> Option<u32> {
        let min = self.min_run(kind)?;
        if run < min {
            return None;
        }
        let multiplier = match kind {
            SymbolKind::Cherries => match run {
                2 => 1,
                3 => 4,
                4 => 10,
                _ => 40,
            },
            SymbolKind::Plum | SymbolKind::Lemon | SymbolKind::Orange => match run {
                3 => 4,
                4 => 10,
                _ => 40,
            },
            SymbolKind::Grape | SymbolKind::Watermelon => match run {
                3 => 10,
                4 => 40,
                _ => 100,
            },
            SymbolKind::Seven => match run {
                3 => 20,
                4 => 200,
                _ => 1000,
            },
            SymbolKind::Jackpot => return None,
        };
        Some(multiplier)
    }

    /// Multiplier for `count` jackpot symbols anywhere in the grid.
    pub fn scatter_multiplier(&self, count: usize) -> Option<u32> {
        match count {
            3 => Some(2),
            4 => Some(10),
            _ if count >= 5 => Some(50),
            _ => None,
        }
    }

    /// Evaluate a settled grid against every payline and the jackpot
    /// scatter. `payout` is the bet unit for the active stake; all
    /// multipliers scale it. Unresolved cells never match anything.
    pub fn evaluate(&self, grid: &Grid, payout: u32) -> EvaluationResult {
        let mut result = EvaluationResult::default();

        // Jackpot scatter first so its cells keep jackpot provenance.
        let mut jackpot_count = 0usize;
        for reel in 0..REEL_COUNT {
            for row in 0..ROW_COUNT {
                if grid.get(reel, row) == Some(SymbolKind::Jackpot) {
                    jackpot_count += 1;
                }
            }
        }
        if let Some(multiplier) = self.scatter_multiplier(jackpot_count) {
            result.has_jackpot_win = true;
            result.total_win += payout * multiplier;
            result.qualifies_bonus_cue |= jackpot_count >= 4;
            for reel in 0..REEL_COUNT {
                for row in 0..ROW_COUNT {
                    if grid.get(reel, row) == Some(SymbolKind::Jackpot) {
                        result
                            .winning_cells
                            .insert((reel as u8, row as u8), CellProvenance::Jackpot);
                    }
                }
            }
        }

        for (line_index, line) in PAYLINES.iter().enumerate() {
            let Some(first) = grid.get(0, line[0]) else {
                continue;
            };
            let mut run = 1;
            for reel in 1..REEL_COUNT {
                if grid.get(reel, line[reel]) == Some(first) {
                    run += 1;
                } else {
                    break;
                }
            }
            let Some(multiplier) = self.line_multiplier(first, run) else {
                continue;
            };
            result.has_line_win = true;
            result.total_win += payout * multiplier;
            result.qualifies_bonus_cue |= run >= 4;
            for (reel, row) in line.iter().copied().enumerate().take(run) {
                result
                    .winning_cells
                    .entry((reel as u8, row as u8))
                    .or_insert(CellProvenance::Line(line_index as u8));
            }
        }

        result
    }
}
