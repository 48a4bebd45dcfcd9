//! Headless demo driver: runs a slot session on a virtual clock and
//! prints every event the engine emits.

use clap::Parser;

use hot_core::{
    CardColor, EngineError, GameConfig, GameEvent, Rejection, SessionPhase, SlotSession,
    SpinTiming, payout_for_stake,
};

/// Virtual frame interval, matching a 60 fps presentation loop.
const TICK_MS: f64 = 16.0;

#[derive(Debug, Parser)]
#[command(name = "hot-cli", about = "Run a headless fruit-slot session")]
struct Args {
    /// RNG seed for a reproducible run (omit for OS entropy).
    #[arg(long)]
    seed: Option<u64>,

    /// Number of spins to play.
    #[arg(long, default_value_t = 10)]
    spins: u32,

    /// Stake to play at (one of 5, 10, 15, 20, 40, 80).
    #[arg(long)]
    stake: Option<u32>,

    /// Gamble each win for up to this many double-or-nothing rounds
    /// before banking (0 = always collect).
    #[arg(long, default_value_t = 0)]
    gamble: u8,

    /// Let the session's autoplay timer start the spins instead of
    /// requesting each one directly.
    #[arg(long)]
    autoplay: bool,

    /// Half-duration spin timing.
    #[arg(long)]
    turbo: bool,

    /// Print events as JSON lines instead of text.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("session failed: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), EngineError> {
    let mut config = GameConfig::default();
    if args.turbo {
        config.timing = SpinTiming::turbo();
    }
    let mut session = match args.seed {
        Some(seed) => SlotSession::with_seed(config, seed)?,
        None => SlotSession::new(config)?,
    };

    if let Some(stake) = args.stake {
        if payout_for_stake(stake).is_none() {
            log::warn!("unknown stake {stake}, keeping {}", session.stake());
        } else {
            while session.stake() < stake && session.stake_up().is_ok() {}
        }
    }

    if args.autoplay {
        let _ = session.set_autoplay(true);
    }

    let mut now = 0.0;
    let mut spins_started = 0;
    let mut guesses_left = 0;

    loop {
        now += TICK_MS;
        session.tick(now);
        spins_started += report(&mut session, args.json);

        match session.phase() {
            SessionPhase::Idle => {
                if spins_started >= args.spins {
                    break;
                }
                if args.autoplay {
                    if !session.snapshot().is_autoplay_active {
                        log::warn!("autoplay stopped after {spins_started} spins");
                        break;
                    }
                    continue;
                }
                match session.request_spin() {
                    Ok(_) => {}
                    Err(Rejection::NoCredits) | Err(Rejection::InsufficientCredits) => {
                        log::warn!("out of credits after {spins_started} spins");
                        break;
                    }
                    Err(e) => log::debug!("spin not started: {e}"),
                }
            }
            SessionPhase::WinPending => {
                if args.gamble > 0 {
                    guesses_left = args.gamble;
                    let _ = session.request_gamble_open();
                } else {
                    let _ = session.request_collect();
                }
            }
            SessionPhase::GambleOpen => {
                if guesses_left > 0 {
                    guesses_left -= 1;
                    let _ = session.request_gamble_guess(CardColor::Red);
                } else {
                    let _ = session.request_gamble_take_win();
                }
            }
            _ => {}
        }
        spins_started += report(&mut session, args.json);
    }

    let state = session.snapshot();
    println!(
        "finished: {} spins, {} credits left (stake {})",
        spins_started, state.credits, state.stake
    );
    Ok(())
}

/// Print drained events; returns how many spins started among them.
fn report(session: &mut SlotSession, json: bool) -> u32 {
    let mut spins = 0;
    for event in session.drain_events() {
        if matches!(event, GameEvent::SpinStarted { .. }) {
            spins += 1;
        }
        if json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => log::error!("event serialization failed: {e}"),
            }
        } else {
            describe(&event);
        }
    }
    spins
}

fn describe(event: &GameEvent) {
    match event {
        GameEvent::SpinStarted { stake } => println!("spin started at stake {stake}"),
        GameEvent::ReelStopped { reel } => println!("  reel {reel} stopped"),
        GameEvent::GridSettled { grid } => print!("{grid}"),
        GameEvent::WinResolved { result, cue } => {
            if result.is_win() {
                println!(
                    "win {} ({} cells lit, cue {:?})",
                    result.total_win,
                    result.winning_cells.len(),
                    cue
                );
            } else {
                println!("no win");
            }
        }
        GameEvent::GridDiscarded { unresolved } => {
            println!("spin discarded, unresolved cells: {unresolved:?}")
        }
        GameEvent::CollectStarted { amount } => println!("collecting {amount}..."),
        GameEvent::CollectProgress { .. } => {}
        GameEvent::CollectFinished { amount } => println!("collected {amount}"),
        GameEvent::GambleOpened {
            at_risk,
            rounds_left,
        } => println!("gamble opened: {at_risk} at risk, {rounds_left} rounds"),
        GameEvent::GambleResolved { result } => println!(
            "  drew {}: {} (now {})",
            result.drawn,
            if result.correct { "correct" } else { "wrong" },
            result.current_win
        ),
        GameEvent::GambleClosed { banked } => println!("gamble closed, banked {banked}"),
        GameEvent::AutoplayChanged { enabled } => println!("autoplay: {enabled}"),
        GameEvent::StakeChanged { stake, payout } => {
            println!("stake {stake} (payout unit {payout})")
        }
    }
}
