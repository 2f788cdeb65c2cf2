//! Random tournament generator for regression runs.

use crate::logic::engine::generate_pairings;
use crate::logic::results::apply_results;
use crate::models::{GameResult, Outcome, PairingError, Player, PlayerId, Tournament};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

/// Largest field the simulator will generate.
pub const MAX_SIMULATED_PLAYERS: usize = 1000;

fn default_players() -> usize {
    24
}

fn default_rounds() -> u32 {
    7
}

fn default_draw_rate() -> f64 {
    0.25
}

/// Shape of a simulated event.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_players")]
    pub players: usize,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub accelerated: bool,
    /// Share of even games that end drawn.
    #[serde(default = "default_draw_rate")]
    pub draw_rate: f64,
}

impl SimulationConfig {
    /// Reject fields outside 2..=MAX_SIMULATED_PLAYERS, more rounds than
    /// players, and draw rates outside 0..=1.
    pub fn validate(&self) -> Result<(), PairingError> {
        let reason = if !(2..=MAX_SIMULATED_PLAYERS).contains(&self.players) {
            format!("players must be between 2 and {} (got {})", MAX_SIMULATED_PLAYERS, self.players)
        } else if self.rounds == 0 || self.rounds as usize > self.players {
            format!("rounds must be between 1 and {} (got {})", self.players, self.rounds)
        } else if !(0.0..=1.0).contains(&self.draw_rate) {
            format!("draw rate must be between 0 and 1 (got {})", self.draw_rate)
        } else {
            return Ok(());
        };
        Err(PairingError::InvalidSimulation(reason))
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            players: default_players(),
            rounds: default_rounds(),
            seed: 0,
            accelerated: false,
            draw_rate: default_draw_rate(),
        }
    }
}

/// Play a whole tournament with random ratings and Elo-weighted results.
pub fn simulate_tournament(config: &SimulationConfig) -> Result<Tournament, PairingError> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let players: Vec<Player> = (1..=config.players as PlayerId)
        .map(|id| Player::new(id, format!("Player {}", id), rng.gen_range(1000..=2700)))
        .collect();
    let mut t = Tournament::with_players(players, config.rounds)?;
    t.accelerated = config.accelerated;

    for round in 1..=config.rounds {
        let boards = generate_pairings(&t, round)?;
        let results: Vec<GameResult> = boards
            .iter()
            .map(|m| match m.black {
                None => GameResult::Bye { player: m.white },
                Some(black) => GameResult::Game {
                    white: m.white,
                    black,
                    outcome: random_outcome(&mut rng, rating(&t, m.white), rating(&t, black), config.draw_rate),
                },
            })
            .collect();
        apply_results(&mut t, &results)?;
        log::debug!("simulated round {}", round);
    }
    Ok(t)
}

fn rating(t: &Tournament, id: PlayerId) -> u32 {
    t.player(id).map(|p| p.rating).unwrap_or(0)
}

fn random_outcome(rng: &mut StdRng, white: u32, black: u32, draw_rate: f64) -> Outcome {
    let expected = 1.0 / (1.0 + 10f64.powf((f64::from(black) - f64::from(white)) / 400.0));
    // draws are likeliest between even players
    let draw = draw_rate * (1.0 - (expected - 0.5).abs() * 2.0);
    let roll: f64 = rng.gen();
    if roll < draw {
        Outcome::Draw
    } else if roll < draw + (1.0 - draw) * expected {
        Outcome::WhiteWins
    } else {
        Outcome::BlackWins
    }
}
