//! Swiss round pairing: validation, mode selection, bye loop and the
//! group-by-group search with floaters.
//!
//! The search works top-down. The head group is paired, taking floaters from
//! lower groups when it is odd or cannot pair alone, then the rest of the chain
//! is paired recursively. Before each level the remaining players are checked
//! for any perfect compatible matching, so a dead branch is cut immediately,
//! and chains already known to fail are remembered.

use crate::logic::baku;
use crate::logic::bye::bye_candidates;
use crate::logic::colors;
use crate::logic::floaters::{find_multi_upfloaters, find_upfloaters, float_queue, FloatContext};
use crate::logic::groups::{remove_member, sort_by_standing, ScoreGroupChain};
use crate::logic::matching::{has_perfect_matching, BlossomOracle, MatchingOracle};
use crate::logic::repair::{pair_group, GroupRules};
use crate::logic::round_one::pair_round_one;
use crate::logic::round_robin;
use crate::models::{Match, PairingError, Player, Tournament};
use log::{debug, info, warn};
use std::collections::HashSet;

/// Step counter enforcing the search ceiling.
#[derive(Clone, Debug)]
pub struct SearchBudget {
    used: u64,
    limit: u64,
}

impl SearchBudget {
    pub fn new(limit: u64) -> Self {
        Self { used: 0, limit }
    }

    pub fn tick(&mut self) -> Result<(), PairingError> {
        self.used += 1;
        if self.used > self.limit {
            warn!("pairing search gave up after {} steps", self.limit);
            return Err(PairingError::SearchLimitExceeded { limit: self.limit });
        }
        Ok(())
    }

    pub fn used(&self) -> u64 {
        self.used
    }
}

/// Pair `round` of the tournament with the default matching oracle.
pub fn generate_pairings(tournament: &Tournament, round: u32) -> Result<Vec<Match>, PairingError> {
    generate_pairings_with(tournament, round, &BlossomOracle)
}

/// Pair `round` of the tournament.
///
/// Absent players are left out. Round robin takes over when the field is too
/// small for the number of rounds; round 1 is seeded by rating. The returned
/// boards are ordered by score, the bye (if any) last.
pub fn generate_pairings_with(
    tournament: &Tournament,
    round: u32,
    oracle: &dyn MatchingOracle,
) -> Result<Vec<Match>, PairingError> {
    tournament.validate()?;
    if round == 0 || round > tournament.total_rounds {
        return Err(PairingError::InvalidRound {
            round,
            total_rounds: tournament.total_rounds,
        });
    }
    if round_robin::uses_round_robin(tournament.players.len(), tournament.total_rounds) {
        info!("round {}: {} players, using round robin tables", round, tournament.players.len());
        return round_robin::round_pairings(&tournament.players, &tournament.absent, round);
    }

    let mut roster: Vec<Player> = tournament
        .players
        .iter()
        .filter(|p| !tournament.absent.contains(&p.id))
        .cloned()
        .collect();
    if roster.len() < 2 {
        return Err(PairingError::NotEnoughPlayers);
    }
    if tournament.accelerated {
        baku::apply_virtual_points(&mut roster, round, tournament.total_rounds);
    }
    if round == 1 {
        if let Some(matches) = pair_round_one(&roster, tournament.config.round_one_colors) {
            info!("round 1: seeded {} boards", matches.len());
            return Ok(matches);
        }
        debug!("round 1 seeding blocked by restrictions, using the Swiss engine");
    }

    sort_by_standing(&mut roster);
    let mut engine = PairingEngine::new(&roster, round, tournament.total_rounds, tournament.config.max_attempts, oracle);
    let matches = engine.pair_round()?;
    info!(
        "round {}: {} boards after {} search steps",
        round,
        matches.len(),
        engine.budget.used()
    );
    Ok(matches)
}

/// Pairs per group, top group first.
type GroupPairs = Vec<Vec<(usize, usize)>>;

/// One pairing run over a working roster sorted by standing.
pub struct PairingEngine<'a> {
    players: &'a [Player],
    ctx: FloatContext,
    oracle: &'a dyn MatchingOracle,
    budget: SearchBudget,
    failed: HashSet<Vec<Vec<usize>>>,
}

impl<'a> PairingEngine<'a> {
    pub fn new(
        players: &'a [Player],
        round: u32,
        total_rounds: u32,
        max_attempts: u64,
        oracle: &'a dyn MatchingOracle,
    ) -> Self {
        Self {
            players,
            ctx: FloatContext { round, total_rounds },
            oracle,
            budget: SearchBudget::new(max_attempts),
            failed: HashSet::new(),
        }
    }

    /// Pair the whole roster, choosing a bye first when the count is odd.
    pub fn pair_round(&mut self) -> Result<Vec<Match>, PairingError> {
        let all: Vec<usize> = (0..self.players.len()).collect();
        if all.len() % 2 == 0 {
            let groups = self.pair_field(&all)?.ok_or(PairingError::NoValidPairing)?;
            return Ok(self.boards(&groups, None));
        }
        for candidate in bye_candidates(self.players, self.ctx.round) {
            let field: Vec<usize> = all.iter().copied().filter(|&i| i != candidate).collect();
            if let Some(groups) = self.pair_field(&field)? {
                debug!("bye to player {}", self.players[candidate].id);
                return Ok(self.boards(&groups, Some(candidate)));
            }
            debug!("bye to player {} leaves no valid pairing", self.players[candidate].id);
        }
        Err(PairingError::ByeCandidatesExhausted)
    }

    fn pair_field(&mut self, members: &[usize]) -> Result<Option<GroupPairs>, PairingError> {
        let chain = ScoreGroupChain::build(self.players, members);
        self.pair_chain(chain.into_groups())
    }

    fn pair_chain(&mut self, groups: Vec<Vec<usize>>) -> Result<Option<GroupPairs>, PairingError> {
        let groups: Vec<Vec<usize>> = groups.into_iter().filter(|g| !g.is_empty()).collect();
        if groups.is_empty() {
            return Ok(Some(Vec::new()));
        }
        if self.failed.contains(&groups) {
            return Ok(None);
        }
        self.budget.tick()?;
        let remaining: Vec<usize> = groups.iter().flatten().copied().collect();
        let players = self.players;
        if !has_perfect_matching(self.oracle, remaining.len(), |a, b| {
            players[remaining[a]].can_play(&players[remaining[b]])
        }) {
            self.failed.insert(groups);
            return Ok(None);
        }

        let head = &groups[0];
        let lower = &groups[1..];
        if head.len() % 2 == 0 {
            if let Some(paired) = self.attempt(head, lower, &[])? {
                return Ok(Some(paired));
            }
        } else {
            for floater in find_upfloaters(self.players, head, lower, self.ctx) {
                if let Some(paired) = self.attempt(head, lower, &[floater])? {
                    return Ok(Some(paired));
                }
            }
        }

        let queue = float_queue(self.players, lower, self.ctx);
        if let Some(floaters) = find_multi_upfloaters(self.players, head, &queue, self.oracle) {
            debug!("group of {}: {} floaters from the matching", head.len(), floaters.len());
            if let Some(paired) = self.attempt(head, lower, &floaters)? {
                return Ok(Some(paired));
            }
        }
        let mut batch = head.len() % 2 + 2;
        while batch <= queue.len() {
            debug!("group of {}: escalating to {} floaters", head.len(), batch);
            if let Some(paired) = self.attempt(head, lower, &queue[..batch])? {
                return Ok(Some(paired));
            }
            batch += 2;
        }

        self.failed.insert(groups);
        Ok(None)
    }

    /// Pair `head` plus `floaters`, then the rest of the chain.
    fn attempt(
        &mut self,
        head: &[usize],
        lower: &[Vec<usize>],
        floaters: &[usize],
    ) -> Result<Option<GroupPairs>, PairingError> {
        let mut group: Vec<usize> = head.iter().chain(floaters).copied().collect();
        group.sort_unstable();
        let rules = GroupRules {
            players: self.players,
            floaters,
        };
        let Some(pairs) = pair_group(&rules, &group, self.oracle, &mut self.budget)? else {
            return Ok(None);
        };
        let mut rest = lower.to_vec();
        for &f in floaters {
            remove_member(&mut rest, f);
        }
        let Some(mut paired) = self.pair_chain(rest)? else {
            return Ok(None);
        };
        if !floaters.is_empty() {
            debug!(
                "floated up: {:?}",
                floaters.iter().map(|&f| self.players[f].id).collect::<Vec<_>>()
            );
        }
        paired.insert(0, pairs);
        Ok(Some(paired))
    }

    /// Colour every group and order boards by top score, then best standing.
    fn boards(&self, groups: &GroupPairs, bye: Option<usize>) -> Vec<Match> {
        let mut boards: Vec<(f64, usize, Match)> = Vec::new();
        for pairs in groups {
            let matches = colors::allocate(self.players, pairs);
            for (&(a, b), m) in pairs.iter().zip(matches) {
                let top = self.players[a].score().max(self.players[b].score());
                boards.push((top, a.min(b), m));
            }
        }
        boards.sort_by(|x, y| y.0.total_cmp(&x.0).then_with(|| x.1.cmp(&y.1)));
        let mut out: Vec<Match> = boards.into_iter().map(|(_, _, m)| m).collect();
        if let Some(b) = bye {
            out.push(Match::bye(self.players[b].id));
        }
        out
    }
}
