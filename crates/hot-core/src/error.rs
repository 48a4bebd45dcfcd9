//! Engine error taxonomy

use thiserror::Error;

/// Fatal configuration-class errors raised at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The symbol candidate pool would be empty after exclusions.
    /// Cannot happen with the standard symbol set (6 unrestricted kinds).
    #[error("symbol candidate pool is empty")]
    EmptySymbolPool,
}

/// Reason a session request was refused. Never fatal: the session state
/// is left untouched and the reason is handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The requested action is not legal in the current phase
    /// (e.g. spin while collecting, gamble while spinning).
    #[error("{action} rejected while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    /// Balance is above zero but below the current payout.
    #[error("not enough credits for the current payout")]
    InsufficientCredits,

    /// Balance is exactly zero.
    #[error("no credits left")]
    NoCredits,
}

/// A malformed grid reached the evaluation boundary. Recovered by
/// treating the spin as a zero-win outcome and forcing the session
/// back to idle; never propagated as a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("grid cell ({reel}, {row}) has no resolved symbol")]
pub struct EvaluationFault {
    pub reel: u8,
    pub row: u8,
}
