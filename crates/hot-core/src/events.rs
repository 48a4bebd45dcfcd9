//! Presentation events drained by the embedding frontend

use serde::Serialize;

use crate::gamble::GuessResult;
use crate::grid::Grid;
use crate::paytable::EvaluationResult;

/// Which win jingle a frontend should play for a resolved win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    /// Regular line or scatter win.
    Win,
    /// Four or more of a kind (run or scatter).
    Bonus,
}

/// Everything observable the session does, in occurrence order. The
/// session appends; the embedder drains once per frame and renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A spin began; the stake was already deducted.
    SpinStarted { stake: u32 },
    /// A reel's primary travel finished (stop thunk, bounce begins).
    ReelStopped { reel: u8 },
    /// All reels at rest; the visible window is final.
    GridSettled { grid: Grid },
    /// The settled grid was evaluated. `cue` is present only on a win.
    WinResolved {
        result: EvaluationResult,
        cue: Option<SoundCue>,
    },
    /// A malformed grid was discarded and the spin treated as no win.
    GridDiscarded { unresolved: Vec<(u8, u8)> },
    /// A win transfer to the balance began.
    CollectStarted { amount: u32 },
    /// Credits moved this tick and the cumulative amount moved so far.
    CollectProgress { credited: u32, transferred: u32 },
    /// The transfer completed; the win meter is empty.
    CollectFinished { amount: u32 },
    /// A gamble round opened on the pending win.
    GambleOpened { at_risk: u32, rounds_left: u8 },
    /// One card guess was resolved.
    GambleResolved { result: GuessResult },
    /// The gamble round ended; `banked` went back to the pending win.
    GambleClosed { banked: u32 },
    AutoplayChanged { enabled: bool },
    StakeChanged { stake: u32, payout: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::CellProvenance;
    use crate::symbols::SymbolKind;

    #[test]
    fn test_events_serialize_to_tagged_json() {
        let event = GameEvent::StakeChanged {
            stake: 10,
            payout: 50,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "stake_changed");
        assert_eq!(json["stake"], 10);
        assert_eq!(json["payout"], 50);
    }

    #[test]
    fn test_win_resolved_serializes_cells_as_list() {
        let mut result = EvaluationResult {
            total_win: 25,
            has_line_win: true,
            ..EvaluationResult::default()
        };
        result
            .winning_cells
            .insert((1, 2), CellProvenance::Line(0));
        result.winning_cells.insert((0, 0), CellProvenance::Jackpot);
        let event = GameEvent::WinResolved {
            result,
            cue: Some(SoundCue::Win),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["cue"], "win");
        let cells = json["result"]["winning_cells"].as_array().unwrap();
        assert_eq!(cells.len(), 2);
        // Sorted by coordinates, jackpot cell first.
        assert_eq!(cells[0][0], 0);
        assert_eq!(cells[0][2], "Jackpot");
    }

    #[test]
    fn test_grid_settled_serializes_symbols() {
        let grid = Grid::from_cells(
            [[Some(SymbolKind::Cherries); crate::config::ROW_COUNT];
                crate::config::REEL_COUNT],
        );
        let json = serde_json::to_value(GameEvent::GridSettled { grid }).unwrap();
        assert_eq!(json["grid"]["cells"][0][0], "cherries");
    }
}
