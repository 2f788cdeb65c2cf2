//! Match (pairing), candidate evaluation, and recorded game results.

use crate::models::player::{Color, PlayerId};
use serde::{Deserialize, Serialize};

/// One board of a round: white against black, or a bye for `white`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub white: PlayerId,
    /// None for a bye.
    pub black: Option<PlayerId>,
    pub is_bye: bool,
}

impl Match {
    pub fn new(white: PlayerId, black: PlayerId) -> Self {
        Self {
            white,
            black: Some(black),
            is_bye: false,
        }
    }

    pub fn bye(player: PlayerId) -> Self {
        Self {
            white: player,
            black: None,
            is_bye: true,
        }
    }

    pub fn involves(&self, id: PlayerId) -> bool {
        self.white == id || self.black == Some(id)
    }

    /// Colour `id` got on this board, if present.
    pub fn color_of(&self, id: PlayerId) -> Option<Color> {
        if self.is_bye {
            return (self.white == id).then_some(Color::NoColor);
        }
        if self.white == id {
            Some(Color::White)
        } else if self.black == Some(id) {
            Some(Color::Black)
        } else {
            None
        }
    }
}

/// Candidate board built while pairing a score group, indexes into the working roster.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MatchEval {
    pub white: usize,
    pub black: usize,
    /// Violates an absolute criterion.
    pub problem: bool,
}

/// Result of a board between two players.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    WhiteWins,
    Draw,
    BlackWins,
    /// Black did not show up.
    WhiteWinsByForfeit,
    /// White did not show up.
    BlackWinsByForfeit,
    DoubleForfeit,
}

impl Outcome {
    /// Points for (white, black).
    pub fn points(self) -> (f64, f64) {
        match self {
            Outcome::WhiteWins | Outcome::WhiteWinsByForfeit => (1.0, 0.0),
            Outcome::Draw => (0.5, 0.5),
            Outcome::BlackWins | Outcome::BlackWinsByForfeit => (0.0, 1.0),
            Outcome::DoubleForfeit => (0.0, 0.0),
        }
    }

    /// Whether the game was actually played over the board.
    pub fn is_played(self) -> bool {
        matches!(self, Outcome::WhiteWins | Outcome::Draw | Outcome::BlackWins)
    }
}

/// One entry of a finished round, as fed to round application.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameResult {
    Game {
        white: PlayerId,
        black: PlayerId,
        outcome: Outcome,
    },
    /// Pairing-allocated bye: full point.
    Bye { player: PlayerId },
    /// Not paired this round (requested bye, withdrawal); scores `points`.
    Absent { player: PlayerId, points: f64 },
}

impl GameResult {
    pub fn players(&self) -> (PlayerId, Option<PlayerId>) {
        match *self {
            GameResult::Game { white, black, .. } => (white, Some(black)),
            GameResult::Bye { player } | GameResult::Absent { player, .. } => (player, None),
        }
    }

    /// The board this result was played on, absent players have none.
    pub fn pairing(&self) -> Option<Match> {
        match *self {
            GameResult::Game { white, black, .. } => Some(Match::new(white, black)),
            GameResult::Bye { player } => Some(Match::bye(player)),
            GameResult::Absent { .. } => None,
        }
    }
}
