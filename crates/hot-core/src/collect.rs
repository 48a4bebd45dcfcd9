//! Incremental win transfer from the win meter to the credit balance

use crate::tween::Easing;

/// One tick of collect progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectTick {
    /// Credits moved to the balance this tick.
    pub credited: u32,
    /// The full amount has been transferred.
    pub finished: bool,
}

/// Transfers a win to the balance over a fixed duration with an
/// ease-in-quadratic ramp (slow start, fast finish). Increments are
/// throttled to a minimum interval; rounding never drops credits
/// because each delta is the eased cumulative total minus what has
/// already been moved.
#[derive(Debug, Clone, Copy)]
pub struct CollectAnimator {
    total: u32,
    transferred: u32,
    start_ms: f64,
    last_applied_ms: f64,
    duration_ms: f64,
    min_tick_ms: f64,
}

impl CollectAnimator {
    pub fn new(total: u32, duration_ms: f64, min_tick_ms: f64, now_ms: f64) -> Self {
        Self {
            total,
            transferred: 0,
            start_ms: now_ms,
            last_applied_ms: f64::NEG_INFINITY,
            duration_ms,
            min_tick_ms,
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn transferred(&self) -> u32 {
        self.transferred
    }

    pub fn remaining(&self) -> u32 {
        self.total - self.transferred
    }

    /// Advance the transfer to `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> CollectTick {
        let phase = if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
        };
        let finished = phase >= 1.0;

        if !finished && now_ms - self.last_applied_ms < self.min_tick_ms {
            return CollectTick::default();
        }

        let target = (Easing::InQuad.apply(phase) * self.total as f64).floor() as u32;
        let target = target.min(self.total);
        let credited = target.saturating_sub(self.transferred);
        if credited > 0 {
            self.transferred = target;
            self.last_applied_ms = now_ms;
        }
        CollectTick { credited, finished }
    }

    /// Move everything still pending in one step (skip / interrupt).
    pub fn flush(&mut self) -> u32 {
        let credited = self.remaining();
        self.transferred = self.total;
        credited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_conserves_total() {
        let mut collect = CollectAnimator::new(1234, 3000.0, 16.0, 0.0);
        let mut credited = 0;
        let mut now = 0.0;
        loop {
            now += 16.0;
            let tick = collect.tick(now);
            credited += tick.credited;
            if tick.finished {
                break;
            }
        }
        assert_eq!(credited, 1234);
        assert_eq!(collect.remaining(), 0);
    }

    #[test]
    fn test_ease_in_backloads_the_transfer() {
        let mut collect = CollectAnimator::new(1000, 3000.0, 16.0, 0.0);
        let mut first_half = 0;
        let mut now = 0.0;
        while now < 1500.0 {
            now += 16.0;
            first_half += collect.tick(now).credited;
        }
        loop {
            now += 16.0;
            let tick = collect.tick(now);
            if tick.finished {
                break;
            }
        }
        // Quadratic ramp: roughly a quarter lands in the first half.
        assert!(first_half < 300, "first half moved {first_half}");
    }

    #[test]
    fn test_ticks_are_throttled() {
        let mut collect = CollectAnimator::new(10_000, 3000.0, 16.0, 0.0);
        let first = collect.tick(2000.0);
        assert!(first.credited > 0);
        // 5 ms later: under the minimum interval, nothing applied.
        let second = collect.tick(2005.0);
        assert_eq!(second.credited, 0);
        let third = collect.tick(2016.0);
        assert!(third.credited > 0);
    }

    #[test]
    fn test_final_tick_ignores_throttle() {
        let mut collect = CollectAnimator::new(500, 3000.0, 16.0, 0.0);
        collect.tick(2999.0);
        // 1 ms later but past the full duration: remainder lands anyway.
        let tick = collect.tick(3000.0);
        assert!(tick.finished);
        assert_eq!(collect.remaining(), 0);
    }

    #[test]
    fn test_flush_moves_remainder() {
        let mut collect = CollectAnimator::new(800, 3000.0, 16.0, 0.0);
        let mut credited = 0;
        credited += collect.tick(1500.0).credited;
        credited += collect.flush();
        assert_eq!(credited, 800);
        assert_eq!(collect.remaining(), 0);
        assert!(collect.tick(4000.0).finished);
        assert_eq!(collect.tick(4000.0).credited, 0);
    }

    #[test]
    fn test_zero_win_finishes_immediately() {
        let mut collect = CollectAnimator::new(0, 3000.0, 16.0, 0.0);
        let tick = collect.tick(16.0);
        assert_eq!(tick.credited, 0);
        assert!(!tick.finished);
        let tick = collect.tick(3000.0);
        assert!(tick.finished);
    }
}
