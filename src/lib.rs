//! FIDE Dubov System pairing engine: library with models, pairing logic and file formats.

pub mod io;
pub mod logic;
pub mod models;

pub use io::{pairings_to_csv, read_trf, write_trf, TrfDocument, TrfError, TrfHeader};
pub use logic::{
    apply_results, check_round, generate_pairings, generate_pairings_with, simulate_tournament, BlossomOracle,
    CheckReport, MatchingGraph, MatchingOracle, SimulationConfig,
};
pub use models::{
    Color, ColorPreference, GameResult, Match, MatchEval, Outcome, PairingConfig, PairingError, Player, PlayerId,
    RoundOneColors, Tournament,
};
