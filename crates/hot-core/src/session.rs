//! Session state machine: requests, the tick loop and event emission

use log::{debug, warn};
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::collect::CollectAnimator;
use crate::config::{GameConfig, STAKE_TABLE};
use crate::error::{EngineError, EvaluationFault, Rejection};
use crate::events::{GameEvent, SoundCue};
use crate::gamble::{CardColor, GambleRound};
use crate::paytable::PayoutTable;
use crate::reel::ReelSet;

/// Where the session currently is. Exactly one of the busy phases is
/// ever active; every request checks the phase before touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Ready for a spin, stake change or autoplay.
    Idle,
    /// Reels in motion (primary travel or settle).
    Spinning,
    /// A win is on the meter, waiting for collect or gamble.
    WinPending,
    /// The win transfer to the balance is running.
    Collecting,
    /// A double-or-nothing round is open on the pending win.
    GambleOpen,
}

impl SessionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Spinning => "spinning",
            SessionPhase::WinPending => "win pending",
            SessionPhase::Collecting => "collecting",
            SessionPhase::GambleOpen => "gamble open",
        }
    }
}

/// A point-in-time view of the session, returned by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub credits: u32,
    pub stake: u32,
    pub payout: u32,
    pub pending_win: u32,
    pub is_spinning: bool,
    pub is_collecting: bool,
    pub is_gamble_open: bool,
    pub is_autoplay_active: bool,
    pub has_win: bool,
}

/// The complete game session. Single-threaded and tick-driven: call
/// `tick(now_ms)` once per frame with a monotonic millisecond clock,
/// issue requests between ticks, and drain events for presentation.
pub struct SlotSession {
    config: GameConfig,
    paytable: PayoutTable,
    reels: ReelSet,
    rng: StdRng,
    phase: SessionPhase,
    credits: u32,
    stake_index: usize,
    pending_win: u32,
    has_win: bool,
    autoplay: bool,
    last_autoplay_ms: f64,
    collect: Option<CollectAnimator>,
    gamble: Option<GambleRound>,
    events: Vec<GameEvent>,
    now_ms: f64,
}

impl SlotSession {
    /// Create a session with an OS-seeded RNG.
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        let rng = StdRng::from_os_rng();
        Self::with_rng(config, rng)
    }

    /// Create a fully deterministic session from a seed.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, EngineError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, EngineError> {
        let reels = ReelSet::new(&mut rng)?;
        let stake_index = STAKE_TABLE
            .iter()
            .position(|(stake, _)| *stake == config.starting_stake)
            .unwrap_or(0);
        Ok(Self {
            credits: config.starting_credits,
            config,
            paytable: PayoutTable::new(),
            reels,
            rng,
            phase: SessionPhase::Idle,
            stake_index,
            pending_win: 0,
            has_win: false,
            autoplay: false,
            last_autoplay_ms: f64::NEG_INFINITY,
            collect: None,
            gamble: None,
            events: Vec::new(),
            now_ms: 0.0,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn stake(&self) -> u32 {
        STAKE_TABLE[self.stake_index].0
    }

    /// Bet unit for the active stake; every multiplier applies to it
    /// and it is what a spin debits.
    pub fn payout(&self) -> u32 {
        STAKE_TABLE[self.stake_index].1
    }

    pub fn snapshot(&self) -> SessionState {
        SessionState {
            credits: self.credits,
            stake: self.stake(),
            payout: self.payout(),
            pending_win: self.pending_win,
            is_spinning: self.phase == SessionPhase::Spinning,
            is_collecting: self.phase == SessionPhase::Collecting,
            is_gamble_open: self.phase == SessionPhase::GambleOpen,
            is_autoplay_active: self.autoplay,
            has_win: self.has_win,
        }
    }

    /// Hand out everything emitted since the previous drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn reject(&self, rejection: Rejection) -> Rejection {
        debug!("request rejected: {rejection}");
        rejection
    }

    fn require_phase(&self, expected: SessionPhase, action: &'static str) -> Result<(), Rejection> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(self.reject(Rejection::InvalidTransition {
                action,
                phase: self.phase.name(),
            }))
        }
    }

    /// Debit the bet and set the reels in motion.
    pub fn request_spin(&mut self) -> Result<SessionState, Rejection> {
        self.require_phase(SessionPhase::Idle, "spin")?;
        if self.credits == 0 {
            return Err(self.reject(Rejection::NoCredits));
        }
        let payout = self.payout();
        if self.credits < payout {
            return Err(self.reject(Rejection::InsufficientCredits));
        }
        self.credits -= payout;
        self.phase = SessionPhase::Spinning;
        self.reels
            .start_spin(&self.config.timing, &mut self.rng, self.now_ms);
        self.events.push(GameEvent::SpinStarted {
            stake: self.stake(),
        });
        debug!("spin started, stake {} payout {payout}", self.stake());
        Ok(self.snapshot())
    }

    /// Cut the spin short: every reel still in primary travel settles
    /// onto its nearest integral position right away.
    pub fn request_stop(&mut self) -> Result<SessionState, Rejection> {
        self.require_phase(SessionPhase::Spinning, "stop")?;
        self.reels.stop_early(&self.config.timing, self.now_ms);
        Ok(self.snapshot())
    }

    /// Start collecting a pending win, or finish a running collect
    /// instantly on the second press.
    pub fn request_collect(&mut self) -> Result<SessionState, Rejection> {
        match self.phase {
            SessionPhase::WinPending => {
                let amount = self.pending_win;
                self.collect = Some(CollectAnimator::new(
                    amount,
                    self.config.collect_duration_ms,
                    self.config.collect_min_tick_ms,
                    self.now_ms,
                ));
                self.phase = SessionPhase::Collecting;
                self.events.push(GameEvent::CollectStarted { amount });
                Ok(self.snapshot())
            }
            SessionPhase::Collecting => {
                if let Some(mut collect) = self.collect.take() {
                    let credited = collect.flush();
                    self.credits += credited;
                    if credited > 0 {
                        self.events.push(GameEvent::CollectProgress {
                            credited,
                            transferred: collect.transferred(),
                        });
                    }
                    self.finish_collect(collect.total());
                }
                Ok(self.snapshot())
            }
            _ => Err(self.reject(Rejection::InvalidTransition {
                action: "collect",
                phase: self.phase.name(),
            })),
        }
    }

    fn finish_collect(&mut self, amount: u32) {
        self.events.push(GameEvent::CollectFinished { amount });
        self.pending_win = 0;
        self.has_win = false;
        self.collect = None;
        self.phase = SessionPhase::Idle;
        debug!("collect finished, {amount} credited, balance {}", self.credits);
    }

    /// Put the pending win at risk in a double-or-nothing round.
    pub fn request_gamble_open(&mut self) -> Result<SessionState, Rejection> {
        self.require_phase(SessionPhase::WinPending, "gamble")?;
        let round = GambleRound::new(self.pending_win, self.config.max_gamble_rounds);
        self.events.push(GameEvent::GambleOpened {
            at_risk: round.current_win(),
            rounds_left: round.rounds_left(),
        });
        self.gamble = Some(round);
        self.phase = SessionPhase::GambleOpen;
        Ok(self.snapshot())
    }

    /// Resolve one red/black guess.
    pub fn request_gamble_guess(&mut self, pick: CardColor) -> Result<SessionState, Rejection> {
        self.require_phase(SessionPhase::GambleOpen, "guess")?;
        let Some(round) = self.gamble.as_mut() else {
            return Err(self.reject(Rejection::InvalidTransition {
                action: "guess",
                phase: self.phase.name(),
            }));
        };
        let result = round.guess(pick, &mut self.rng);
        self.events.push(GameEvent::GambleResolved { result });
        if result.finished {
            self.bank_gamble(result.current_win);
        } else {
            self.pending_win = result.current_win;
        }
        Ok(self.snapshot())
    }

    /// Bank the amount currently at risk and close the round.
    pub fn request_gamble_take_win(&mut self) -> Result<SessionState, Rejection> {
        self.require_phase(SessionPhase::GambleOpen, "take win")?;
        let banked = self.gamble.take().map_or(0, GambleRound::take_win);
        self.bank_gamble(banked);
        Ok(self.snapshot())
    }

    fn bank_gamble(&mut self, amount: u32) {
        self.credits += amount;
        self.pending_win = 0;
        self.has_win = false;
        self.gamble = None;
        self.phase = SessionPhase::Idle;
        self.events.push(GameEvent::GambleClosed { banked: amount });
        debug!("gamble closed, {amount} banked, balance {}", self.credits);
    }

    pub fn set_autoplay(&mut self, enabled: bool) -> Result<SessionState, Rejection> {
        if self.autoplay != enabled {
            self.autoplay = enabled;
            self.events.push(GameEvent::AutoplayChanged { enabled });
        }
        Ok(self.snapshot())
    }

    pub fn stake_up(&mut self) -> Result<SessionState, Rejection> {
        self.shift_stake(1)
    }

    pub fn stake_down(&mut self) -> Result<SessionState, Rejection> {
        self.shift_stake(-1)
    }

    /// Move along the fixed stake list, clamped at both ends.
    fn shift_stake(&mut self, direction: i32) -> Result<SessionState, Rejection> {
        self.require_phase(SessionPhase::Idle, "stake change")?;
        let next = (self.stake_index as i32 + direction)
            .clamp(0, STAKE_TABLE.len() as i32 - 1) as usize;
        if next != self.stake_index {
            self.stake_index = next;
            self.events.push(GameEvent::StakeChanged {
                stake: self.stake(),
                payout: self.payout(),
            });
        }
        Ok(self.snapshot())
    }

    /// Advance the whole session to `now_ms`: reel tweens, the collect
    /// transfer and the autoplay timer, in that order.
    pub fn tick(&mut self, now_ms: f64) {
        self.now_ms = now_ms;

        if self.phase == SessionPhase::Spinning {
            let progress = self.reels.tick(now_ms, &mut self.rng);
            for reel in progress.stopped_reels {
                self.events.push(GameEvent::ReelStopped { reel });
            }
            if progress.all_settled {
                self.settle_spin();
            }
        }

        if self.phase == SessionPhase::Collecting {
            if let Some(collect) = self.collect.as_mut() {
                let tick = collect.tick(now_ms);
                if tick.credited > 0 {
                    self.credits += tick.credited;
                    self.events.push(GameEvent::CollectProgress {
                        credited: tick.credited,
                        transferred: collect.transferred(),
                    });
                }
                if tick.finished {
                    let total = collect.total();
                    self.finish_collect(total);
                }
            }
        }

        if self.autoplay
            && self.phase == SessionPhase::Idle
            && now_ms - self.last_autoplay_ms >= self.config.autoplay_delay_ms
        {
            match self.request_spin() {
                Ok(_) => self.last_autoplay_ms = now_ms,
                Err(Rejection::NoCredits) | Err(Rejection::InsufficientCredits) => {
                    // Out of money: stop retrying every delay window.
                    let _ = self.set_autoplay(false);
                }
                Err(_) => {}
            }
        }
    }

    /// All reels at rest: resolve the grid and evaluate it.
    fn settle_spin(&mut self) {
        let grid = self.reels.resolve_grid();
        self.events.push(GameEvent::GridSettled { grid });

        let unresolved = grid.unresolved_cells();
        if let Some((reel, row)) = unresolved.first().copied() {
            warn!("discarding spin: {}", EvaluationFault { reel, row });
            self.events.push(GameEvent::GridDiscarded { unresolved });
            self.pending_win = 0;
            self.has_win = false;
            self.phase = SessionPhase::Idle;
            return;
        }

        let result = self.paytable.evaluate(&grid, self.payout());
        let cue = if !result.is_win() {
            None
        } else if result.qualifies_bonus_cue {
            Some(SoundCue::Bonus)
        } else {
            Some(SoundCue::Win)
        };
        let is_win = result.is_win();
        let total_win = result.total_win;
        self.events.push(GameEvent::WinResolved { result, cue });

        if is_win {
            self.pending_win = total_win;
            self.has_win = true;
            self.phase = SessionPhase::WinPending;
            debug!("win {total_win} pending");
        } else {
            self.phase = SessionPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GameEvent;

    fn session(seed: u64) -> SlotSession {
        SlotSession::with_seed(GameConfig::default(), seed).unwrap()
    }

    /// Tick until the current spin fully resolves.
    fn run_spin(session: &mut SlotSession) {
        let mut now = session.now_ms;
        for _ in 0..10_000 {
            now += 16.0;
            session.tick(now);
            if session.phase() != SessionPhase::Spinning {
                return;
            }
        }
        panic!("spin never settled");
    }

    /// Spin with fresh seeds until one wins, then return the session.
    fn session_with_win() -> SlotSession {
        for seed in 0..500 {
            let mut s = session(seed);
            s.request_spin().unwrap();
            run_spin(&mut s);
            if s.phase() == SessionPhase::WinPending {
                return s;
            }
        }
        panic!("no winning seed found");
    }

    #[test]
    fn test_spin_debits_payout() {
        let mut s = session(1);
        let before = s.credits();
        let state = s.request_spin().unwrap();
        assert_eq!(state.credits, before - s.payout());
        assert!(state.is_spinning);
    }

    #[test]
    fn test_spin_rejected_while_spinning() {
        let mut s = session(2);
        s.request_spin().unwrap();
        let credits = s.credits();
        assert!(matches!(
            s.request_spin(),
            Err(Rejection::InvalidTransition { action: "spin", .. })
        ));
        assert_eq!(s.credits(), credits);
    }

    #[test]
    fn test_no_credits_vs_insufficient_credits() {
        let mut s = session(3);
        s.credits = 0;
        assert_eq!(s.request_spin(), Err(Rejection::NoCredits));
        s.credits = s.payout() - 1;
        assert_eq!(s.request_spin(), Err(Rejection::InsufficientCredits));
        assert_eq!(s.credits(), s.payout() - 1);
    }

    #[test]
    fn test_spin_resolves_to_idle_or_win_pending() {
        let mut s = session(4);
        s.request_spin().unwrap();
        run_spin(&mut s);
        assert!(matches!(
            s.phase(),
            SessionPhase::Idle | SessionPhase::WinPending
        ));
        let events = s.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::SpinStarted { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::GridSettled { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::WinResolved { .. })));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::ReelStopped { .. }))
                .count(),
            5
        );
    }

    #[test]
    fn test_manual_stop_still_resolves() {
        let mut s = session(5);
        s.request_spin().unwrap();
        s.tick(100.0);
        s.request_stop().unwrap();
        run_spin(&mut s);
        assert_ne!(s.phase(), SessionPhase::Spinning);
        assert!(s
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GridSettled { .. })));
    }

    #[test]
    fn test_collect_transfers_full_win() {
        let mut s = session_with_win();
        let win = s.snapshot().pending_win;
        let before = s.credits();
        s.request_collect().unwrap();
        assert_eq!(s.phase(), SessionPhase::Collecting);

        let mut now = s.now_ms;
        for _ in 0..1000 {
            now += 16.0;
            s.tick(now);
            if s.phase() == SessionPhase::Idle {
                break;
            }
        }
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(s.credits(), before + win);
        assert_eq!(s.snapshot().pending_win, 0);
        assert!(!s.snapshot().has_win);
    }

    #[test]
    fn test_second_collect_press_finishes_instantly() {
        let mut s = session_with_win();
        let win = s.snapshot().pending_win;
        let before = s.credits();
        s.request_collect().unwrap();
        s.tick(s.now_ms + 100.0);
        s.request_collect().unwrap();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(s.credits(), before + win);
    }

    #[test]
    fn test_spin_rejected_while_collecting() {
        let mut s = session_with_win();
        s.request_collect().unwrap();
        let credits = s.credits();
        assert!(s.request_spin().is_err());
        assert_eq!(s.credits(), credits);
    }

    #[test]
    fn test_gamble_requires_pending_win() {
        let mut s = session(6);
        assert!(matches!(
            s.request_gamble_open(),
            Err(Rejection::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_gamble_take_win_banks() {
        let mut s = session_with_win();
        let win = s.snapshot().pending_win;
        let before = s.credits();
        s.request_gamble_open().unwrap();
        assert_eq!(s.phase(), SessionPhase::GambleOpen);
        s.request_gamble_take_win().unwrap();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(s.credits(), before + win);
        assert_eq!(s.snapshot().pending_win, 0);
    }

    #[test]
    fn test_gamble_guess_resolves_round() {
        let mut s = session_with_win();
        let before = s.credits();
        let win = s.snapshot().pending_win;
        s.request_gamble_open().unwrap();
        // Guess until the round ends one way or the other.
        for _ in 0..10 {
            if s.phase() != SessionPhase::GambleOpen {
                break;
            }
            s.request_gamble_guess(CardColor::Red).unwrap();
        }
        assert_eq!(s.phase(), SessionPhase::Idle);
        let banked = s.credits() - before;
        assert!(banked == 0 || banked >= 2 * win);
        assert!(banked <= win * 32);
    }

    #[test]
    fn test_stake_clamps_on_fixed_list() {
        let mut s = session(7);
        for _ in 0..10 {
            s.stake_down().unwrap();
        }
        assert_eq!(s.stake(), 5);
        assert_eq!(s.payout(), 25);
        for _ in 0..10 {
            s.stake_up().unwrap();
        }
        assert_eq!(s.stake(), 80);
        assert_eq!(s.payout(), 400);
    }

    #[test]
    fn test_stake_change_rejected_mid_spin() {
        let mut s = session(8);
        s.request_spin().unwrap();
        assert!(s.stake_up().is_err());
    }

    #[test]
    fn test_autoplay_spins_from_idle() {
        let mut s = session(9);
        s.set_autoplay(true).unwrap();
        s.tick(16.0);
        assert_eq!(s.phase(), SessionPhase::Spinning);
        run_spin(&mut s);
        if s.phase() == SessionPhase::WinPending {
            // Autoplay stalls on a pending win; nothing more to check.
            return;
        }
        // A full spin outlasts the delay window, so the next tick fires.
        s.tick(s.now_ms + 16.0);
        assert_eq!(s.phase(), SessionPhase::Spinning);
    }

    #[test]
    fn test_autoplay_waits_out_delay_window() {
        // Stop the autoplay spin early so it settles inside the first
        // delay window, then watch the timer hold the next spin back.
        // Winning seeds park in WinPending; skip to the next seed.
        for seed in 0..100 {
            let mut s = session(seed);
            s.set_autoplay(true).unwrap();
            s.tick(16.0);
            assert_eq!(s.phase(), SessionPhase::Spinning);
            let mut now = 16.0;
            while now < 96.0 {
                now += 16.0;
                s.tick(now);
            }
            s.request_stop().unwrap();
            while s.phase() == SessionPhase::Spinning && now < 5000.0 {
                now += 16.0;
                s.tick(now);
            }
            if s.phase() != SessionPhase::Idle {
                continue;
            }
            assert!(now < 1000.0, "settle outlasted the delay window");
            s.tick(1000.0);
            assert_eq!(s.phase(), SessionPhase::Idle);
            s.tick(1032.0);
            assert_eq!(s.phase(), SessionPhase::Spinning);
            return;
        }
        panic!("every early-stopped spin won");
    }

    #[test]
    fn test_autoplay_waits_on_pending_win() {
        let mut s = session_with_win();
        s.set_autoplay(true).unwrap();
        let now = s.now_ms;
        s.tick(now + 5000.0);
        assert_eq!(s.phase(), SessionPhase::WinPending);
    }

    #[test]
    fn test_autoplay_disables_when_broke() {
        let mut s = session(10);
        s.credits = 3;
        s.set_autoplay(true).unwrap();
        s.tick(16.0);
        assert!(!s.snapshot().is_autoplay_active);
    }

    #[test]
    fn test_seeded_sessions_are_reproducible() {
        let run = |seed| {
            let mut s = session(seed);
            s.request_spin().unwrap();
            run_spin(&mut s);
            (s.credits(), s.snapshot().pending_win)
        };
        assert_eq!(run(77), run(77));
    }
}
