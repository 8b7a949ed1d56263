//! # derby_core - Deterministic Racing League Engine
//!
//! Simulates races between racers with attributes over segmented maps,
//! progresses a league between races, and settles wagers.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same outcome, events included)
//! - Structured commentary events for any presentation layer
//! - Aging, retirement and successor newcomers on every progression tick
//! - Fixed-point odds and pure, parallel wager resolution
//!
//! The core performs no I/O. Storage and wallets sit behind the traits in
//! [`repository`].

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Simulation entry points take seed, ids and inputs together
#![allow(clippy::too_many_arguments)]

pub mod betting;
pub mod config;
pub mod engine;
pub mod error;
pub mod league;
pub mod models;
pub mod repository;

pub use betting::{calculate_odds, place_odds, resolve, RaceSummary};
pub use config::DerbyConfig;
pub use engine::{draw_field, simulate, RaceSimulator};
pub use error::{ConfigError, DerbyError, RepositoryError, Result, SetupIssue};
pub use league::{advance, LeagueManager, ProgressionReport};
pub use models::{
    Map, Odds, Payout, RaceId, RaceOutcome, Racer, RacerId, Segment, Wager, WagerKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
