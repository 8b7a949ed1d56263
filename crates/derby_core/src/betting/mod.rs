//! Wager settlement
//!
//! `resolve` is a pure function of an outcome and a wager list; applying the
//! resulting payouts to wallets is the ledger's job (see `repository`).

pub mod odds;
pub mod resolver;
pub mod summary;

pub use odds::{calculate_odds, place_odds};
pub use resolver::{resolve, settle};
pub use summary::RaceSummary;
