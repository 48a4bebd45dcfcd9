//! Double-or-nothing card gamble on a pending win

use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// A face-down card is either red or black, drawn fair at even odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardColor {
    Red,
    Black,
}

impl std::fmt::Display for CardColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CardColor::Red => "red",
            CardColor::Black => "black",
        })
    }
}

/// Outcome of a single guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuessResult {
    pub drawn: CardColor,
    pub correct: bool,
    /// Stake at risk after this guess (doubled, or zero on a miss).
    pub current_win: u32,
    /// The round is over: the win was lost, or the round cap was hit
    /// and the current amount banks automatically.
    pub finished: bool,
}

/// One gamble session over a pending win. A correct guess doubles the
/// amount at risk; a wrong guess forfeits it. After `max_rounds`
/// correct guesses the amount banks automatically.
#[derive(Debug, Clone, Copy)]
pub struct GambleRound {
    current_win: u32,
    rounds_played: u8,
    max_rounds: u8,
}

impl GambleRound {
    pub fn new(pending_win: u32, max_rounds: u8) -> Self {
        Self {
            current_win: pending_win,
            rounds_played: 0,
            max_rounds,
        }
    }

    /// Amount currently at risk.
    pub fn current_win(&self) -> u32 {
        self.current_win
    }

    pub fn rounds_played(&self) -> u8 {
        self.rounds_played
    }

    pub fn rounds_left(&self) -> u8 {
        self.max_rounds - self.rounds_played
    }

    /// Resolve one guess against a fair draw.
    pub fn guess<R: Rng>(&mut self, pick: CardColor, rng: &mut R) -> GuessResult {
        let drawn = if rng.random_bool(0.5) {
            CardColor::Red
        } else {
            CardColor::Black
        };
        let correct = drawn == pick;
        self.rounds_played += 1;
        if correct {
            self.current_win *= 2;
        } else {
            self.current_win = 0;
        }
        let finished = !correct || self.rounds_played >= self.max_rounds;
        GuessResult {
            drawn,
            correct,
            current_win: self.current_win,
            finished,
        }
    }

    /// Bank the current amount and end the round.
    pub fn take_win(self) -> u32 {
        self.current_win
    }
}
