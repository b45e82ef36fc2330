mod models;
mod sheety;

pub use models::{apply_code_updates, CodeUpdate, Customer, Destination};
pub use sheety::{SheetyClient, SheetyConfig};

use crate::errors::AppError;

/// The spreadsheet-backed store of destinations and customers.
pub trait DestinationStore {
    /// Snapshot of every destination row, in sheet order.
    fn fetch_destinations(&self) -> Result<Vec<Destination>, AppError>;

    /// Writes back the IATA codes in `updates`, one request per row.
    fn update_iata_codes(&self, updates: &[CodeUpdate]) -> Result<(), AppError>;

    fn fetch_customers(&self) -> Result<Vec<Customer>, AppError>;
}
