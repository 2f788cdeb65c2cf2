//! Data structures for the pairing engine: players, matches, tournament state.

mod game;
mod player;
mod tournament;

pub use game::{GameResult, Match, MatchEval, Outcome};
pub use player::{Color, ColorPreference, Player, PlayerId};
pub use tournament::{PairingConfig, PairingError, RoundOneColors, Tournament};
