//! Game configuration: grid shape, stakes, spin timing, feature bounds

use serde::{Deserialize, Serialize};

use crate::tween::{Easing, TweenStep};

/// Number of reels (columns).
pub const REEL_COUNT: usize = 5;
/// Visible rows per reel.
pub const ROW_COUNT: usize = 3;
/// Strip slots per reel (visible rows + buffer).
pub const STRIP_LEN: usize = 4;

/// The fixed ordered stake list and its stake → payout mapping.
/// The payout is the per-spin bet unit every multiplier applies to.
pub const STAKE_TABLE: [(u32, u32); 6] = [
    (5, 25),
    (10, 50),
    (15, 75),
    (20, 100),
    (40, 200),
    (80, 400),
];

/// Look up the payout for a stake from the fixed table.
pub fn payout_for_stake(stake: u32) -> Option<u32> {
    STAKE_TABLE
        .iter()
        .find(|(s, _)| *s == stake)
        .map(|(_, p)| *p)
}

/// Spin trajectory timing. All durations in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpinTiming {
    /// Whole strip positions a reel travels before settling.
    pub base_spin_distance: u32,
    /// Upper bound (inclusive) of the random extra distance.
    pub random_extra_max: u32,
    /// Primary tween duration for reel 0.
    pub base_duration_ms: f64,
    /// Additional primary duration per reel index.
    pub per_reel_stagger_ms: f64,
    /// Reference duration for the three-stage bounce settle.
    pub bounce_duration_ms: f64,
}

impl SpinTiming {
    /// Normal gameplay timing.
    pub fn normal() -> Self {
        Self {
            base_spin_distance: 20,
            random_extra_max: 2,
            base_duration_ms: 1500.0,
            per_reel_stagger_ms: 300.0,
            bounce_duration_ms: 1000.0,
        }
    }

    /// Turbo mode (half-speed durations, same travel).
    pub fn turbo() -> Self {
        Self {
            base_duration_ms: 750.0,
            per_reel_stagger_ms: 150.0,
            bounce_duration_ms: 500.0,
            ..Self::normal()
        }
    }

    /// Primary tween duration for a reel.
    pub fn primary_duration_ms(&self, reel_index: usize) -> f64 {
        self.base_duration_ms + reel_index as f64 * self.per_reel_stagger_ms
    }

    /// The three-stage bounce settle described as data: overshoot,
    /// undershoot, then exact rest, each ease-out-quadratic. Deltas
    /// are relative to the reel's integral rest target.
    pub fn settle_steps(&self) -> [TweenStep; 3] {
        [
            TweenStep {
                target_delta: 0.25,
                duration_ms: self.bounce_duration_ms * 0.2,
                easing: Easing::OutQuad,
            },
            TweenStep {
                target_delta: -0.02,
                duration_ms: self.bounce_duration_ms * 0.25,
                easing: Easing::OutQuad,
            },
            TweenStep {
                target_delta: 0.0,
                duration_ms: self.bounce_duration_ms * 0.4,
                easing: Easing::OutQuad,
            },
        ]
    }
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self::normal()
    }
}

/// Complete session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Credits at session start.
    pub starting_credits: u32,
    /// Stake at session start (must be in the stake table).
    pub starting_stake: u32,
    /// Spin trajectory timing.
    pub timing: SpinTiming,
    /// Total collect transfer duration (ms).
    pub collect_duration_ms: f64,
    /// Minimum interval between applied collect increments (ms).
    pub collect_min_tick_ms: f64,
    /// Minimum delay between autoplay-triggered spins (ms).
    pub autoplay_delay_ms: f64,
    /// Maximum double-or-nothing rounds per win.
    pub max_gamble_rounds: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_credits: 10_000,
            starting_stake: 5,
            timing: SpinTiming::normal(),
            collect_duration_ms: 3000.0,
            collect_min_tick_ms: 16.0,
            autoplay_delay_ms: 1000.0,
            max_gamble_rounds: 5,
        }
    }
}
