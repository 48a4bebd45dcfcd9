//! Reel model: strip state, spin trajectory and the staged bounce settle

use std::collections::VecDeque;

use rand::prelude::*;

use crate::config::{REEL_COUNT, STRIP_LEN, SpinTiming};
use crate::error::EngineError;
use crate::grid::Grid;
use crate::symbols::{SymbolGenerator, SymbolKind};
use crate::tween::ActiveTween;

/// Per-tick progress report for one reel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReelProgress {
    /// The primary spin tween finished this tick (bounce begins).
    pub primary_just_finished: bool,
    /// The full settle chain finished this tick (reel at rest).
    pub settled_just_now: bool,
}

/// One reel: a circular 4-slot strip with a continuous scroll position.
///
/// `position` advances monotonically during the primary spin; the slot
/// that scrolls past the visible window on each whole-position step is
/// lazily re-populated through the symbol generator, so the strip is an
/// infinite restartable sequence. The strip invariant (at most one
/// `Seven`, at most one `Jackpot`) is enforced at generation time.
#[derive(Debug, Clone)]
pub struct Reel {
    index: usize,
    slots: [Option<SymbolKind>; STRIP_LEN],
    position: f64,
    previous_position: f64,
    rest_target: f64,
    active: Option<ActiveTween>,
    pending: VecDeque<crate::tween::TweenStep>,
    in_primary: bool,
}

impl Reel {
    pub fn new<R: Rng>(
        index: usize,
        generator: &SymbolGenerator,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        let mut slots = [None; STRIP_LEN];
        for index in 0..STRIP_LEN {
            // The generator sees the partially filled strip, so the
            // restriction rules hold from the very first population.
            slots[index] = Some(generator.next(&slots, rng)?);
        }
        Ok(Self {
            index,
            slots,
            position: 0.0,
            previous_position: 0.0,
            rest_target: 0.0,
            active: None,
            pending: VecDeque::new(),
            in_primary: false,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn previous_position(&self) -> f64 {
        self.previous_position
    }

    pub fn slots(&self) -> &[Option<SymbolKind>; STRIP_LEN] {
        &self.slots
    }

    /// Still moving (primary or settle chain in flight)?
    pub fn is_spinning(&self) -> bool {
        self.active.is_some() || !self.pending.is_empty()
    }

    /// Begin a spin: travel `base_spin_distance + random_extra` whole
    /// positions via a linear primary tween (staggered per reel index),
    /// then run the three-stage bounce settle onto the integral target.
    pub fn start_spin<R: Rng>(&mut self, timing: &SpinTiming, rng: &mut R, now_ms: f64) {
        let extra = rng.random_range(0..=timing.random_extra_max);
        let target = self.position.round() + (timing.base_spin_distance + extra) as f64;
        self.rest_target = target;
        self.in_primary = true;
        self.pending = timing.settle_steps().into_iter().collect();
        self.active = Some(ActiveTween::new(
            self.position,
            target,
            timing.primary_duration_ms(self.index),
            crate::tween::Easing::Linear,
            now_ms,
        ));
    }

    /// Manual stop: cancel the primary tween (if still running) and
    /// bounce-settle onto the nearest integral position immediately.
    /// A reel already in its settle chain is left alone — the chain
    /// always runs to completion. Returns whether anything changed.
    pub fn stop_early(&mut self, timing: &SpinTiming, now_ms: f64) -> bool {
        if !self.in_primary {
            return false;
        }
        self.in_primary = false;
        self.rest_target = self.position.round();
        self.pending = timing.settle_steps().into_iter().collect();
        self.active = None;
        self.begin_next_step(now_ms);
        true
    }

    /// Advance the reel's tween chain to `now_ms`.
    pub fn tick<R: Rng>(
        &mut self,
        now_ms: f64,
        generator: &SymbolGenerator,
        rng: &mut R,
    ) -> ReelProgress {
        let mut progress = ReelProgress::default();
        let Some(tween) = self.active else {
            return progress;
        };

        let (value, done) = tween.sample(now_ms);
        self.advance_to(value, generator, rng);

        if done {
            if self.in_primary {
                self.in_primary = false;
                progress.primary_just_finished = true;
            }
            self.begin_next_step(now_ms);
            if self.active.is_none() {
                progress.settled_just_now = true;
            }
        }
        progress
    }

    fn begin_next_step(&mut self, now_ms: f64) {
        self.active = self.pending.pop_front().map(|step| {
            ActiveTween::new(
                self.position,
                self.rest_target + step.target_delta,
                step.duration_ms,
                step.easing,
                now_ms,
            )
        });
    }

    /// Move to a new position, re-populating each strip slot that wraps
    /// past the visible window on the way. Only forward motion recycles;
    /// the short backward undershoot of the settle never does.
    fn advance_to<R: Rng>(&mut self, new_position: f64, generator: &SymbolGenerator, rng: &mut R) {
        let prev = self.position;
        self.previous_position = prev;
        self.position = new_position;

        if new_position <= prev {
            return;
        }
        // Integers n strictly passed by the move (prev inclusive when
        // leaving an integral rest position, endpoint exclusive).
        let lo = if prev.fract() == 0.0 {
            prev as i64
        } else {
            prev.floor() as i64 + 1
        };
        let hi = if new_position.fract() == 0.0 {
            new_position as i64 - 1
        } else {
            new_position.floor() as i64
        };
        for n in lo..=hi {
            let slot = (3 - n).rem_euclid(STRIP_LEN as i64) as usize;
            match generator.next(&self.slots, rng) {
                Ok(symbol) => self.slots[slot] = Some(symbol),
                Err(e) => log::warn!("reel {}: symbol re-population failed: {e}", self.index),
            }
        }
    }
}

/// Outcome of advancing all reels by one tick.
#[derive(Debug, Clone, Default)]
pub struct ReelSetProgress {
    /// Reels whose primary tween completed this tick (stop cue).
    pub stopped_reels: Vec<u8>,
    /// All reels reported settle completion; fires exactly once per spin.
    pub all_settled: bool,
}

/// The bank of five reels plus the completion counter that gates grid
/// resolution: resolution may fire only when every reel's settle chain
/// has reported completion, and exactly once per spin.
#[derive(Debug, Clone)]
pub struct ReelSet {
    reels: Vec<Reel>,
    generator: SymbolGenerator,
    settled_count: usize,
    spin_open: bool,
}

impl ReelSet {
    pub fn new<R: Rng>(rng: &mut R) -> Result<Self, EngineError> {
        let generator = SymbolGenerator::new()?;
        let mut reels = Vec::with_capacity(REEL_COUNT);
        for index in 0..REEL_COUNT {
            reels.push(Reel::new(index, &generator, rng)?);
        }
        Ok(Self {
            reels,
            generator,
            settled_count: 0,
            spin_open: false,
        })
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn is_spinning(&self) -> bool {
        self.reels.iter().any(Reel::is_spinning)
    }

    pub fn start_spin<R: Rng>(&mut self, timing: &SpinTiming, rng: &mut R, now_ms: f64) {
        self.settled_count = 0;
        self.spin_open = true;
        for reel in &mut self.reels {
            reel.start_spin(timing, rng, now_ms);
        }
    }

    /// Cancel every pending primary tween simultaneously; each reel
    /// begins its settle toward the nearest integral position, keeping
    /// the per-reel staggered completion semantics.
    pub fn stop_early(&mut self, timing: &SpinTiming, now_ms: f64) {
        for reel in &mut self.reels {
            reel.stop_early(timing, now_ms);
        }
    }

    pub fn tick<R: Rng>(&mut self, now_ms: f64, rng: &mut R) -> ReelSetProgress {
        let mut progress = ReelSetProgress::default();
        for reel in &mut self.reels {
            let p = reel.tick(now_ms, &self.generator, rng);
            if p.primary_just_finished {
                progress.stopped_reels.push(reel.index() as u8);
            }
            if p.settled_just_now {
                self.settled_count += 1;
            }
        }
        if self.spin_open && self.settled_count == self.reels.len() {
            self.spin_open = false;
            progress.all_settled = true;
        }
        progress
    }

    /// Resolve the 5×3 grid from the resting reel positions.
    pub fn resolve_grid(&self) -> Grid {
        Grid::resolve(&self.reels)
    }
}
