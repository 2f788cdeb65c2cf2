//! Pairing table as CSV: a `White,Black` header and one row per board.

use crate::models::{Match, PlayerId, Tournament};

/// Label in the black column for a bye.
pub const BYE_LABEL: &str = "BYE";

fn display_name(tournament: &Tournament, id: PlayerId) -> String {
    match tournament.player(id) {
        Some(p) if !p.name.is_empty() => p.name.clone(),
        _ => id.to_string(),
    }
}

/// Render `matches` with player names (ids for unnamed players).
pub fn pairings_to_csv(tournament: &Tournament, matches: &[Match]) -> Result<String, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["White", "Black"])?;
    for m in matches {
        let white = display_name(tournament, m.white);
        let black = match m.black {
            Some(id) => display_name(tournament, id),
            None => BYE_LABEL.to_string(),
        };
        wtr.write_record([white, black])?;
    }
    let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
