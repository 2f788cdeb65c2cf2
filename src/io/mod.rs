//! File formats around the engine: TRF tournament reports and CSV pairing tables.

mod csv_export;
mod trf;

pub use csv_export::{pairings_to_csv, BYE_LABEL};
pub use trf::{read_trf, write_trf, TrfDocument, TrfError, TrfHeader};
