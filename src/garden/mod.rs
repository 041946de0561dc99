pub mod ledger;
pub mod store;

pub use ledger::{GardenLedger, GardenSnapshot, GardenSummary, TierCounts};
pub use store::{calendar_streak, GardenStore};
