//! Storage seams
//!
//! The core never does I/O itself. Callers load racers through a
//! `RacerRepository`, run the pure engine, then persist through the same
//! repository and hand payouts to a `Ledger`.

use crate::config::BettingParams;
use crate::error::RepositoryError;
use crate::models::{BettorId, Payout, Racer, RacerId, Wager, WagerId};
use std::collections::{BTreeMap, HashSet};
use std::fs::{rename, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub trait RacerRepository {
    /// Load the given racers, failing on the first unknown id.
    fn load(&self, ids: &[RacerId]) -> Result<Vec<Racer>, RepositoryError>;

    /// Insert or replace racers by id.
    fn save(&mut self, racers: &[Racer]) -> Result<(), RepositoryError>;

    fn all(&self) -> Result<Vec<Racer>, RepositoryError>;
}

pub trait Ledger {
    /// Credit every payout. Either all are applied or none are.
    fn apply(&mut self, payouts: &[Payout]) -> Result<(), RepositoryError>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRacerRepository {
    racers: BTreeMap<RacerId, Racer>,
}

impl InMemoryRacerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_racers(racers: impl IntoIterator<Item = Racer>) -> Self {
        Self {
            racers: racers.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    pub fn active(&self) -> Vec<Racer> {
        self.racers.values().filter(|r| r.is_active()).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.racers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.racers.is_empty()
    }
}

impl RacerRepository for InMemoryRacerRepository {
    fn load(&self, ids: &[RacerId]) -> Result<Vec<Racer>, RepositoryError> {
        ids.iter()
            .map(|id| {
                self.racers
                    .get(id)
                    .cloned()
                    .ok_or(RepositoryError::RacerNotFound(*id))
            })
            .collect()
    }

    fn save(&mut self, racers: &[Racer]) -> Result<(), RepositoryError> {
        for racer in racers {
            self.racers.insert(racer.id, racer.clone());
        }
        log::debug!("Saved {} racers ({} stored)", racers.len(), self.racers.len());
        Ok(())
    }

    fn all(&self) -> Result<Vec<Racer>, RepositoryError> {
        Ok(self.racers.values().cloned().collect())
    }
}

/// Whole roster kept in one JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileRacerRepository {
    path: PathBuf,
}

impl JsonFileRacerRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<RacerId, Racer>, RepositoryError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = std::fs::read(&self.path)?;
        let racers: Vec<Racer> = serde_json::from_slice(&data)?;
        log::debug!("Loaded {} racers from {:?}", racers.len(), self.path);
        Ok(racers.into_iter().map(|r| (r.id, r)).collect())
    }

    fn write_all(&self, racers: &BTreeMap<RacerId, Racer>) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let list: Vec<&Racer> = racers.values().collect();
        let data = serde_json::to_vec_pretty(&list)?;

        // write to temp file, then rename over the target
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, &self.path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), self.path);
        Ok(())
    }
}

impl RacerRepository for JsonFileRacerRepository {
    fn load(&self, ids: &[RacerId]) -> Result<Vec<Racer>, RepositoryError> {
        let stored = self.read_all()?;
        ids.iter()
            .map(|id| {
                stored
                    .get(id)
                    .cloned()
                    .ok_or(RepositoryError::RacerNotFound(*id))
            })
            .collect()
    }

    fn save(&mut self, racers: &[Racer]) -> Result<(), RepositoryError> {
        let mut stored = self.read_all()?;
        for racer in racers {
            stored.insert(racer.id, racer.clone());
        }
        self.write_all(&stored)?;
        log::info!("Roster saved to {:?} ({} racers)", self.path, stored.len());
        Ok(())
    }

    fn all(&self) -> Result<Vec<Racer>, RepositoryError> {
        Ok(self.read_all()?.into_values().collect())
    }
}

/// Coin wallets keyed by bettor. Unknown bettors start at `default_wallet`.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    default_wallet: u64,
    wallets: BTreeMap<BettorId, u64>,
    applied: HashSet<WagerId>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::from_params(&BettingParams::default())
    }
}

impl InMemoryLedger {
    pub fn new(default_wallet: u64) -> Self {
        Self {
            default_wallet,
            wallets: BTreeMap::new(),
            applied: HashSet::new(),
        }
    }

    pub fn from_params(params: &BettingParams) -> Self {
        Self::new(params.default_wallet)
    }

    pub fn balance(&self, bettor: BettorId) -> u64 {
        self.wallets
            .get(&bettor)
            .copied()
            .unwrap_or(self.default_wallet)
    }

    pub fn is_applied(&self, wager: WagerId) -> bool {
        self.applied.contains(&wager)
    }

    /// Debit the stake when a wager is placed.
    pub fn stake(&mut self, wager: &Wager) -> Result<(), RepositoryError> {
        let balance = self.balance(wager.bettor);
        if balance < wager.amount {
            log::warn!(
                "Bettor {} cannot stake {} on wager {} (balance {})",
                wager.bettor,
                wager.amount,
                wager.id,
                balance
            );
            return Err(RepositoryError::InsufficientFunds {
                bettor: wager.bettor,
                balance,
                amount: wager.amount,
            });
        }
        self.wallets.insert(wager.bettor, balance - wager.amount);
        Ok(())
    }
}

impl Ledger for InMemoryLedger {
    fn apply(&mut self, payouts: &[Payout]) -> Result<(), RepositoryError> {
        let mut batch = HashSet::with_capacity(payouts.len());
        for payout in payouts {
            if self.applied.contains(&payout.wager_id) || !batch.insert(payout.wager_id) {
                return Err(RepositoryError::AlreadyApplied(payout.wager_id));
            }
        }

        for payout in payouts {
            let balance = self.balance(payout.bettor);
            self.wallets
                .insert(payout.bettor, balance.saturating_add(payout.amount));
            self.applied.insert(payout.wager_id);
        }

        log::info!(
            "Applied {} payouts ({} coins)",
            payouts.len(),
            payouts.iter().map(|p| p.amount).sum::<u64>()
        );
        Ok(())
    }
}
