use serde::{Deserialize, Serialize};

/// One row of the prices sheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: u64,
    pub city: String,
    #[serde(default)]
    pub iata_code: String,
    /// Reference price a new fare has to beat.
    pub lowest_price: f64,
}

impl Destination {
    pub fn needs_code(&self) -> bool {
        self.iata_code.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub email: String,
}

/// A backfilled airport code to write to the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeUpdate {
    #[serde(skip)]
    pub id: u64,
    #[serde(skip)]
    pub city: String,
    pub iata_code: String,
}

/// Builds the run's working copy: the fetched snapshot with the
/// backfilled codes filled in. The snapshot itself is left untouched.
pub fn apply_code_updates(snapshot: &[Destination], updates: &[CodeUpdate]) -> Vec<Destination> {
    snapshot
        .iter()
        .map(|dest| match updates.iter().find(|u| u.id == dest.id) {
            Some(update) => Destination {
                iata_code: update.iata_code.clone(),
                ..dest.clone()
            },
            None => dest.clone(),
        })
        .collect()
}
