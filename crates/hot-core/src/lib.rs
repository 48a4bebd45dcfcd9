//! # hot-core — Fruit Slot Resolution Engine
//!
//! Headless resolution engine for a classic 5×3 fruit slot machine.
//! Given a randomly populated grid it determines wins, computes payouts,
//! drives the collect/gamble features, and owns the session state machine.
//! Rendering, audio playback and button wiring live outside this crate;
//! the engine exposes state snapshots and emits [`GameEvent`] records.
//!
//! ## Architecture
//!
//! ```text
//! SlotSession
//!     │
//!     ├── ReelSet (5 reels × 4-slot strips, tween-driven spin/settle)
//!     │       └── SymbolGenerator (exclusion rules, seedable RNG)
//!     ├── Grid (resolved 5×3 snapshot per settle)
//!     ├── PayoutTable (5 paylines + jackpot scatter rule)
//!     ├── CollectAnimator (eased credit transfer)
//!     └── GambleRound (bounded double-or-nothing)
//!           │
//!           v
//!     SessionState snapshot + Vec<GameEvent>
//! ```

pub mod collect;
pub mod config;
pub mod error;
pub mod events;
pub mod gamble;
pub mod grid;
pub mod paytable;
pub mod reel;
pub mod session;
pub mod symbols;
pub mod tween;

pub use collect::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use gamble::*;
pub use grid::*;
pub use paytable::*;
pub use reel::*;
pub use session::*;
pub use symbols::*;
pub use tween::*;
