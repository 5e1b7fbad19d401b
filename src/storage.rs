//! Storage collaborator contract.
//!
//! The engine persists the full light state after every mutation and loads it
//! once at startup. Radio settings go through the same contract.

use core::fmt;

/// Storage failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Backend cannot be reached
    Unavailable,
    /// Stored bytes could not be decoded
    Corrupted,
    /// Backend is handling another request
    Busy,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => f.write_str("storage unavailable"),
            Self::Corrupted => f.write_str("stored data is corrupted"),
            Self::Busy => f.write_str("storage busy"),
        }
    }
}

impl core::error::Error for StorageError {}

/// Persistent storage for a single value of type `T`.
pub trait Store<T> {
    /// Load the stored value, `Ok(None)` when nothing was stored yet
    fn load(&mut self) -> Result<Option<T>, StorageError>;

    /// Replace the stored value
    fn save(&mut self, value: &T) -> Result<(), StorageError>;
}

impl<T, S: Store<T> + ?Sized> Store<T> for &mut S {
    fn load(&mut self) -> Result<Option<T>, StorageError> {
        (**self).load()
    }

    fn save(&mut self, value: &T) -> Result<(), StorageError> {
        (**self).save(value)
    }
}

/// In-memory store, for hosts without flash and for tests
#[derive(Debug, Clone, Default)]
pub struct RamStore<T> {
    value: Option<T>,
    saves: usize,
}

impl<T: Clone> RamStore<T> {
    pub const fn new() -> Self {
        Self {
            value: None,
            saves: 0,
        }
    }

    /// Store pre-filled with `value`
    pub const fn with_value(value: T) -> Self {
        Self {
            value: Some(value),
            saves: 0,
        }
    }

    /// Last saved value
    pub const fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Number of successful saves
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl<T: Clone> Store<T> for RamStore<T> {
    fn load(&mut self) -> Result<Option<T>, StorageError> {
        Ok(self.value.clone())
    }

    fn save(&mut self, value: &T) -> Result<(), StorageError> {
        self.value = Some(value.clone());
        self.saves += 1;
        Ok(())
    }
}
