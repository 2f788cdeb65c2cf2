//! Pairing logic: the Swiss engine, alternate generators, round application and tooling.

mod baku;
mod blossom;
mod bye;
mod checker;
mod colors;
mod engine;
mod floaters;
pub(crate) mod groups;
mod matching;
mod repair;
pub(crate) mod results;
mod round_one;
mod round_robin;
mod simulate;

pub use baku::{accelerated_rounds, group_a_size, virtual_points};
pub use checker::{check_round, replay, CheckReport, Violation, ViolationKind};
pub use engine::{generate_pairings, generate_pairings_with, PairingEngine, SearchBudget};
pub use groups::{ScoreGroupChain, SeekerLists};
pub use matching::{BlossomOracle, MatchingGraph, MatchingOracle};
pub use results::{apply_results, BYE_POINTS};
pub use round_one::pair_round_one;
pub use round_robin::{berger_round, uses_round_robin, MAX_SLOTS};
pub use simulate::{simulate_tournament, SimulationConfig, MAX_SIMULATED_PLAYERS};
