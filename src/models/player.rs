//! Player record: colour history, opponents and the derived due colour / preference.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unique identifier for a player (starting rank in TRF files).
pub type PlayerId = u32;

/// Colour a player had in a round, or is due next.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
    /// Bye, forfeit, absence, or no history yet.
    #[default]
    NoColor,
}

impl Color {
    /// The other colour. `NoColor` stays `NoColor`.
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
            Color::NoColor => Color::NoColor,
        }
    }

    pub fn is_colored(self) -> bool {
        self != Color::NoColor
    }
}

/// How strongly the due colour is owed, weakest first.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorPreference {
    #[default]
    NoPreference,
    Mild,
    Alternation,
    Absolute,
}

/// A player in the tournament.
///
/// History is append-only through [`Player::add_color`] and
/// [`Player::add_opponent`]; the derived values are recomputed there so reads
/// never need mutable access.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Elo rating, 0 when unrated.
    pub rating: u32,
    score: f64,
    opponents: BTreeSet<PlayerId>,
    opponent_order: Vec<PlayerId>,
    opponent_ratings: Vec<u32>,
    colors: Vec<Color>,
    /// Number of rounds this player was floated up into a higher score group.
    pub upfloats: u32,
    pub upfloated_last_round: bool,
    /// Pairing-allocated bye or forfeit win already received.
    pub received_bye: bool,
    restrictions: BTreeSet<PlayerId>,
    due_color: Color,
    preference: ColorPreference,
    aro: f64,
}

impl Player {
    /// Create a player with an empty history.
    pub fn new(id: PlayerId, name: impl Into<String>, rating: u32) -> Self {
        Self {
            id,
            name: name.into(),
            rating,
            score: 0.0,
            opponents: BTreeSet::new(),
            opponent_order: Vec::new(),
            opponent_ratings: Vec::new(),
            colors: Vec::new(),
            upfloats: 0,
            upfloated_last_round: false,
            received_bye: false,
            restrictions: BTreeSet::new(),
            due_color: Color::NoColor,
            preference: ColorPreference::NoPreference,
            aro: 0.0,
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Add points. Negative amounts are ignored: the score never decreases.
    pub fn add_points(&mut self, points: f64) {
        if points > 0.0 {
            self.score += points;
        }
    }

    pub(crate) fn set_pairing_score(&mut self, score: f64) {
        self.score = score;
    }

    /// Opponents in the order they were met.
    pub fn opponents(&self) -> &[PlayerId] {
        &self.opponent_order
    }

    pub fn has_played(&self, other: PlayerId) -> bool {
        self.opponents.contains(&other)
    }

    /// One entry per round the player took part in.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn restrictions(&self) -> &BTreeSet<PlayerId> {
        &self.restrictions
    }

    /// Forbid a pairing against `other` (both directions are checked by `can_play`).
    pub fn add_restriction(&mut self, other: PlayerId) {
        self.restrictions.insert(other);
    }

    /// Record a played game against `opponent` with the given rating.
    pub fn add_opponent(&mut self, opponent: PlayerId, rating: u32) {
        if self.opponents.insert(opponent) {
            self.opponent_order.push(opponent);
        }
        self.opponent_ratings.push(rating);
        self.aro = average(&self.opponent_ratings);
    }

    /// Append one round to the colour history.
    pub fn add_color(&mut self, color: Color) {
        self.colors.push(color);
        self.due_color = due_color_of(&self.colors);
        self.preference = preference_of(&self.colors);
    }

    pub fn due_color(&self) -> Color {
        self.due_color
    }

    pub fn preference_strength(&self) -> ColorPreference {
        self.preference
    }

    /// Average rating of opponents, 0.0 before the first game.
    pub fn aro(&self) -> f64 {
        self.aro
    }

    /// Games actually played over the board.
    pub fn games_played(&self) -> usize {
        self.colors.iter().filter(|c| c.is_colored()).count()
    }

    /// Float limit grows with tournament length: 2 plus one per 5 rounds.
    pub fn can_upfloat(&self, total_rounds: u32) -> bool {
        self.upfloats < 2 + total_rounds / 5
    }

    /// Absolute pairing criteria: no rematch, no restriction, no double absolute clash.
    pub fn can_play(&self, other: &Player) -> bool {
        if self.id == other.id {
            return false;
        }
        if self.opponents.contains(&other.id) || other.opponents.contains(&self.id) {
            return false;
        }
        if self.restrictions.contains(&other.id) || other.restrictions.contains(&self.id) {
            return false;
        }
        !(self.due_color == other.due_color
            && self.preference == ColorPreference::Absolute
            && other.preference == ColorPreference::Absolute)
    }
}

fn average(ratings: &[u32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / ratings.len() as f64
}

fn counts(colors: &[Color]) -> (usize, usize) {
    colors.iter().fold((0, 0), |(w, b), c| match c {
        Color::White => (w + 1, b),
        Color::Black => (w, b + 1),
        Color::NoColor => (w, b),
    })
}

fn due_color_of(colors: &[Color]) -> Color {
    let (white, black) = counts(colors);
    if white == 0 && black == 0 {
        return Color::NoColor;
    }
    if white == black {
        return colors
            .iter()
            .rev()
            .find(|c| c.is_colored())
            .map(|c| c.opposite())
            .unwrap_or(Color::NoColor);
    }
    if white < black {
        Color::White
    } else {
        Color::Black
    }
}

fn preference_of(colors: &[Color]) -> ColorPreference {
    let (white, black) = counts(colors);
    if white + black == 0 {
        return ColorPreference::NoPreference;
    }
    if white + black == 1 {
        return ColorPreference::Mild;
    }
    let mut recent = colors.iter().rev().filter(|c| c.is_colored());
    if recent.next() == recent.next() {
        return ColorPreference::Absolute;
    }
    match white.abs_diff(black) {
        0 => ColorPreference::Alternation,
        1 => ColorPreference::Mild,
        _ => ColorPreference::Absolute,
    }
}
