//! Tournament roster, pairing configuration and errors.

use crate::models::game::GameResult;
use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Errors that can occur while validating input or pairing a round.
#[derive(Clone, Debug, PartialEq)]
pub enum PairingError {
    /// Two players share the same id.
    DuplicatePlayerId(PlayerId),
    /// A restriction or result refers to a player not in the roster.
    UnknownPlayer(PlayerId),
    /// A player was forbidden from playing themselves.
    SelfRestriction(PlayerId),
    /// Round number outside 1..=total_rounds, or not the next round to apply.
    InvalidRound { round: u32, total_rounds: u32 },
    /// A player appears twice in the results of one round.
    DuplicateResult(PlayerId),
    /// Fewer than two players available for pairing.
    NotEnoughPlayers,
    /// No assignment satisfies the absolute criteria.
    NoValidPairing,
    /// Every bye candidate was tried and the rest could not be paired.
    ByeCandidatesExhausted,
    /// The backtracking search exceeded its configured step limit.
    SearchLimitExceeded { limit: u64 },
    /// Round-robin tables only cover up to 16 slots.
    RoundRobinTooLarge { players: usize },
    /// A simulation was asked for an unsupported field or length.
    InvalidSimulation(String),
}

impl std::fmt::Display for PairingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairingError::DuplicatePlayerId(id) => write!(f, "Duplicate player id {}", id),
            PairingError::UnknownPlayer(id) => write!(f, "Unknown player id {}", id),
            PairingError::SelfRestriction(id) => {
                write!(f, "Player {} cannot be restricted from playing themselves", id)
            }
            PairingError::InvalidRound { round, total_rounds } => {
                write!(f, "Invalid round {} (tournament has {} rounds)", round, total_rounds)
            }
            PairingError::DuplicateResult(id) => {
                write!(f, "Player {} appears more than once in the round results", id)
            }
            PairingError::NotEnoughPlayers => write!(f, "Need at least 2 players to pair a round"),
            PairingError::NoValidPairing => write!(f, "No valid pairing exists for this round"),
            PairingError::ByeCandidatesExhausted => {
                write!(f, "No bye candidate leaves a pairable field")
            }
            PairingError::SearchLimitExceeded { limit } => {
                write!(f, "Pairing search exceeded {} attempts", limit)
            }
            PairingError::RoundRobinTooLarge { players } => {
                write!(f, "Round robin supports at most 16 players (got {})", players)
            }
            PairingError::InvalidSimulation(reason) => write!(f, "Invalid simulation: {}", reason),
        }
    }
}

impl std::error::Error for PairingError {}

/// Colour policy for the seeded first round.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOneColors {
    /// Every top-half player takes white.
    #[default]
    TopHalfWhite,
    /// Top-half player alternates white, black, white... by board.
    Alternating,
}

fn default_max_attempts() -> u64 {
    50_000
}

/// Knobs for the pairing search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairingConfig {
    /// Search steps allowed for one round before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u64,
    #[serde(default)]
    pub round_one_colors: RoundOneColors,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            round_one_colors: RoundOneColors::default(),
        }
    }
}

/// Full tournament state: roster, settings and applied rounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub total_rounds: u32,
    pub players: Vec<Player>,
    /// Baku acceleration.
    pub accelerated: bool,
    /// Players not to be paired next round (requested byes).
    pub absent: BTreeSet<PlayerId>,
    pub config: PairingConfig,
    /// Results of every applied round, in order.
    pub history: Vec<Vec<GameResult>>,
}

impl Tournament {
    /// Create an empty tournament of `total_rounds` rounds.
    pub fn new(total_rounds: u32) -> Self {
        Self {
            total_rounds,
            players: Vec::new(),
            accelerated: false,
            absent: BTreeSet::new(),
            config: PairingConfig::default(),
            history: Vec::new(),
        }
    }

    /// Create a tournament with the given players (ids must be unique).
    pub fn with_players(players: Vec<Player>, total_rounds: u32) -> Result<Self, PairingError> {
        let mut t = Self::new(total_rounds);
        for p in players {
            t.add_player(p)?;
        }
        Ok(t)
    }

    pub fn add_player(&mut self, player: Player) -> Result<(), PairingError> {
        if self.player(player.id).is_some() {
            return Err(PairingError::DuplicatePlayerId(player.id));
        }
        self.players.push(player);
        Ok(())
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Forbid `a` and `b` from ever being paired.
    pub fn add_restriction(&mut self, a: PlayerId, b: PlayerId) -> Result<(), PairingError> {
        if a == b {
            return Err(PairingError::SelfRestriction(a));
        }
        if self.player(b).is_none() {
            return Err(PairingError::UnknownPlayer(b));
        }
        let pa = self.player_mut(a).ok_or(PairingError::UnknownPlayer(a))?;
        pa.add_restriction(b);
        if let Some(pb) = self.player_mut(b) {
            pb.add_restriction(a);
        }
        Ok(())
    }

    /// Number of rounds already applied.
    pub fn rounds_played(&self) -> u32 {
        self.history.len() as u32
    }

    /// Next round to pair.
    pub fn next_round(&self) -> u32 {
        self.rounds_played() + 1
    }

    /// Check ids are unique and restrictions are well formed.
    pub fn validate(&self) -> Result<(), PairingError> {
        let mut seen = HashSet::new();
        for p in &self.players {
            if !seen.insert(p.id) {
                return Err(PairingError::DuplicatePlayerId(p.id));
            }
        }
        for p in &self.players {
            for &r in p.restrictions() {
                if r == p.id {
                    return Err(PairingError::SelfRestriction(r));
                }
                if !seen.contains(&r) {
                    return Err(PairingError::UnknownPlayer(r));
                }
            }
        }
        for id in &self.absent {
            if !seen.contains(id) {
                return Err(PairingError::UnknownPlayer(*id));
            }
        }
        Ok(())
    }
}
