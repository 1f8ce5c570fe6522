//! Backend pool management.
//!
//! # Responsibilities
//! - Hold the ordered rotation of live backends
//! - Track consecutive failures per backend
//! - Decide which backend serves the next request
//! - Evict a backend once it reaches the failure threshold
//!
//! All state sits behind one mutex. Every operation takes the lock for a
//! handful of instructions and never across an outbound call.

use std::collections::HashMap;

use parking_lot::Mutex;
use thiserror::Error;

use crate::load_balancer::backend::BackendAddress;

/// Consecutive failures that evict a backend unless configured otherwise.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Errors returned by the pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Every backend has been evicted.
    #[error("all servers down")]
    Exhausted,
    /// The pool was seeded with no usable addresses.
    #[error("no backend servers configured")]
    EmptySeed,
}

/// Result of reporting a failed request against a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// The failure was counted; the value is the current streak.
    Counted(u32),
    /// The failure hit the threshold and the backend left the rotation.
    Evicted,
}

/// Point-in-time copy of the pool state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub backends: Vec<BackendAddress>,
    pub error_counts: HashMap<BackendAddress, u32>,
    pub cursor: usize,
}

#[derive(Debug)]
struct PoolState {
    backends: Vec<BackendAddress>,
    error_counts: HashMap<BackendAddress, u32>,
    cursor: usize,
}

/// The shared round-robin pool.
#[derive(Debug)]
pub struct BackendPool {
    state: Mutex<PoolState>,
    failure_threshold: u32,
}

impl BackendPool {
    /// Build a pool from an ordered seed of addresses.
    ///
    /// Blank entries are skipped. A seed with nothing left is rejected.
    pub fn new<I, S>(seed: I, failure_threshold: u32) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let backends: Vec<BackendAddress> = seed
            .into_iter()
            .filter_map(|s| {
                let trimmed = s.as_ref().trim();
                (!trimmed.is_empty()).then(|| BackendAddress::new(trimmed))
            })
            .collect();

        if backends.is_empty() {
            return Err(PoolError::EmptySeed);
        }

        Ok(Self {
            state: Mutex::new(PoolState {
                backends,
                error_counts: HashMap::new(),
                cursor: 0,
            }),
            failure_threshold: failure_threshold.max(1),
        })
    }

    /// Backend selected for the next request.
    pub fn current(&self) -> Result<BackendAddress, PoolError> {
        let state = self.state.lock();
        state
            .backends
            .get(state.cursor)
            .cloned()
            .ok_or(PoolError::Exhausted)
    }

    /// Move the cursor to the next backend in rotation.
    pub fn advance(&self) {
        let mut state = self.state.lock();
        let len = state.backends.len();
        state.cursor = if len == 0 { 0 } else { (state.cursor + 1) % len };
    }

    /// Count a failure against `addr`, evicting it at the threshold.
    ///
    /// A backend that is no longer in rotation still has its count bumped but
    /// never triggers another removal.
    pub fn report_failure(&self, addr: &BackendAddress) -> FailureOutcome {
        let mut state = self.state.lock();
        let count = {
            let entry = state.error_counts.entry(addr.clone()).or_insert(0);
            *entry = entry.saturating_add(1);
            *entry
        };

        if count < self.failure_threshold {
            return FailureOutcome::Counted(count);
        }

        match state.backends.iter().position(|b| b == addr) {
            Some(index) => {
                state.evict(index);
                state.error_counts.remove(addr);
                FailureOutcome::Evicted
            }
            None => FailureOutcome::Counted(count),
        }
    }

    /// Reset the failure streak of `addr`.
    pub fn report_success(&self, addr: &BackendAddress) {
        let mut state = self.state.lock();
        if let Some(count) = state.error_counts.get_mut(addr) {
            *count = 0;
        }
    }

    /// Number of backends still in rotation.
    pub fn len(&self) -> usize {
        self.state.lock().backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> PoolSnapshot {
        let state = self.state.lock();
        PoolSnapshot {
            backends: state.backends.clone(),
            error_counts: state.error_counts.clone(),
            cursor: state.cursor,
        }
    }
}

impl PoolState {
    /// Remove `backends[index]` keeping the survivors in order.
    ///
    /// The cursor keeps naming the same backend when the removal happens after
    /// it. Otherwise it steps back one slot so the next `advance` lands on the
    /// successor of whatever the cursor pointed at.
    fn evict(&mut self, index: usize) {
        self.backends.remove(index);
        let len = self.backends.len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        if index <= self.cursor {
            self.cursor = self.cursor.checked_sub(1).unwrap_or(len - 1);
        }
        if self.cursor >= len {
            self.cursor = len - 1;
        }
    }
}
