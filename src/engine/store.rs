//! Versioned game storage.
//!
//! A store holds one record per game with a monotonically increasing
//! version. Writes are conditional on the version the writer read, so two
//! transactions racing on the same game cannot both commit.

use std::sync::Mutex;

use rustc_hash::FxHashMap;

use crate::core::{Game, GameId};
use crate::error::StoreError;

/// A value read together with the version it was read at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

/// Conditional-write storage for game records.
pub trait GameStore: Send + Sync {
    /// Store a new game at version 1.
    fn insert(&self, game: &Game) -> Result<(), StoreError>;

    /// Read the latest record.
    fn load(&self, id: &GameId) -> Result<Versioned<Game>, StoreError>;

    /// Replace the record if it is still at `expected_version`.
    /// Returns the new version.
    fn commit(&self, id: &GameId, expected_version: u64, game: &Game) -> Result<u64, StoreError>;
}

/// In-process store keeping bincode-encoded records.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<FxHashMap<GameId, (u64, Vec<u8>)>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().map_or(0, |records| records.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GameStore for MemoryStore {
    fn insert(&self, game: &Game) -> Result<(), StoreError> {
        let bytes = bincode::serialize(game)?;
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        if records.contains_key(game.id()) {
            return Err(StoreError::Exists(game.id().clone()));
        }
        records.insert(game.id().clone(), (1, bytes));
        Ok(())
    }

    fn load(&self, id: &GameId) -> Result<Versioned<Game>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let (version, bytes) = records.get(id).ok_or_else(|| StoreError::Missing(id.clone()))?;
        Ok(Versioned {
            version: *version,
            value: bincode::deserialize(bytes)?,
        })
    }

    fn commit(&self, id: &GameId, expected_version: u64, game: &Game) -> Result<u64, StoreError> {
        let bytes = bincode::serialize(game)?;
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let (version, record) = records.get_mut(id).ok_or_else(|| StoreError::Missing(id.clone()))?;
        if *version != expected_version {
            return Err(StoreError::Conflict {
                expected: expected_version,
                found: *version,
            });
        }
        *version += 1;
        *record = bytes;
        Ok(*version)
    }
}
