//! Score groups and colour seeker lists.
//!
//! The working roster is sorted once per round; every other structure refers to
//! players by their index in it, which doubles as the 0-based standing.

use crate::models::{Color, Player};
use std::cmp::Ordering;

/// Standing order: score desc, rating desc, id asc.
pub fn standing_order(a: &Player, b: &Player) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| b.rating.cmp(&a.rating))
        .then_with(|| a.id.cmp(&b.id))
}

/// Seeding order ignoring score: rating desc, id asc.
pub fn rating_order(a: &Player, b: &Player) -> Ordering {
    b.rating.cmp(&a.rating).then_with(|| a.id.cmp(&b.id))
}

pub fn sort_by_standing(players: &mut [Player]) {
    players.sort_by(standing_order);
}

/// Ordered partition of a sorted roster into equal-score groups.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScoreGroupChain {
    groups: Vec<Vec<usize>>,
}

impl ScoreGroupChain {
    /// Partition `players`, already in standing order, into contiguous groups.
    pub fn build(players: &[Player], members: &[usize]) -> Self {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for &i in members {
            match groups.last_mut() {
                Some(group) if players[group[0]].score() == players[i].score() => group.push(i),
                _ => groups.push(vec![i]),
            }
        }
        Self { groups }
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<Vec<usize>> {
        self.groups
    }
}

/// Remove `idx` from whichever group holds it.
pub(crate) fn remove_member(groups: &mut [Vec<usize>], idx: usize) -> bool {
    for group in groups.iter_mut() {
        if let Some(pos) = group.iter().position(|&i| i == idx) {
            group.remove(pos);
            return true;
        }
    }
    false
}

/// White seekers and black seekers of one group.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SeekerLists {
    pub white: Vec<usize>,
    pub black: Vec<usize>,
}

impl SeekerLists {
    /// Due White goes to `white`; due Black and colourless players to `black`.
    pub fn split(players: &[Player], group: &[usize]) -> Self {
        let (white, black) = group
            .iter()
            .partition(|&&i| players[i].due_color() == Color::White);
        let mut lists = Self { white, black };
        lists.sort(players);
        lists
    }

    /// White seekers by ARO ascending, black seekers by rating descending; ties by id.
    pub fn sort(&mut self, players: &[Player]) {
        self.white.sort_by(|&a, &b| {
            players[a]
                .aro()
                .total_cmp(&players[b].aro())
                .then_with(|| players[a].id.cmp(&players[b].id))
        });
        self.black.sort_by(|&a, &b| {
            players[b]
                .rating
                .cmp(&players[a].rating)
                .then_with(|| players[a].id.cmp(&players[b].id))
        });
    }

    pub fn is_balanced(&self) -> bool {
        self.white.len() == self.black.len()
    }

    pub fn len(&self) -> usize {
        self.white.len() + self.black.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
