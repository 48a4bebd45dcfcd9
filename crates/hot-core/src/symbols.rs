//! Symbol kinds and the exclusion-aware symbol generator

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One of the eight reel symbols. Compared by kind, not identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Cherries,
    Grape,
    Jackpot,
    Lemon,
    Orange,
    Plum,
    Seven,
    Watermelon,
}

impl SymbolKind {
    /// Every symbol kind, in paytable order.
    pub const ALL: [SymbolKind; 8] = [
        SymbolKind::Cherries,
        SymbolKind::Grape,
        SymbolKind::Jackpot,
        SymbolKind::Lemon,
        SymbolKind::Orange,
        SymbolKind::Plum,
        SymbolKind::Seven,
        SymbolKind::Watermelon,
    ];

    /// Restricted kinds may appear at most once per reel strip.
    pub fn is_restricted(&self) -> bool {
        matches!(self, SymbolKind::Seven | SymbolKind::Jackpot)
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            SymbolKind::Cherries => "cherries",
            SymbolKind::Grape => "grape",
            SymbolKind::Jackpot => "jackpot",
            SymbolKind::Lemon => "lemon",
            SymbolKind::Orange => "orange",
            SymbolKind::Plum => "plum",
            SymbolKind::Seven => "seven",
            SymbolKind::Watermelon => "watermelon",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Draws random symbols for a reel strip while enforcing the strip
/// invariant: never more than one `Seven` and one `Jackpot` present
/// at the same time. Enforced at generation time, not retroactively.
#[derive(Debug, Clone, Copy)]
pub struct SymbolGenerator;

impl SymbolGenerator {
    /// Create a generator, verifying the candidate pool can never
    /// run dry (at least 6 unrestricted kinds must exist).
    pub fn new() -> Result<Self, EngineError> {
        let unrestricted = SymbolKind::ALL.iter().filter(|s| !s.is_restricted()).count();
        if unrestricted < 6 {
            return Err(EngineError::EmptySymbolPool);
        }
        Ok(Self)
    }

    /// Draw the next symbol for a strip currently holding `current`.
    /// `Seven` and `Jackpot` are excluded from the pool while an
    /// instance is already present; selection is uniform over the rest.
    pub fn next<R: Rng>(
        &self,
        current: &[Option<SymbolKind>],
        rng: &mut R,
    ) -> Result<SymbolKind, EngineError> {
        let has_seven = current.iter().flatten().any(|s| *s == SymbolKind::Seven);
        let has_jackpot = current.iter().flatten().any(|s| *s == SymbolKind::Jackpot);

        let pool: Vec<SymbolKind> = SymbolKind::ALL
            .into_iter()
            .filter(|s| {
                if has_seven && *s == SymbolKind::Seven {
                    return false;
                }
                if has_jackpot && *s == SymbolKind::Jackpot {
                    return false;
                }
                true
            })
            .collect();

        if pool.is_empty() {
            return Err(EngineError::EmptySymbolPool);
        }
        Ok(pool[rng.random_range(0..pool.len())])
    }
}
