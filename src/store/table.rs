//! Append-only digest table with delayed visibility.
//!
//! # Responsibilities
//! - Assign dense, 1-based ids in submission order
//! - Hold each digest alongside the instant its secret was accepted
//! - Answer lookups only once the visibility delay has elapsed
//!
//! # Design Decisions
//! - `RwLock` so concurrent lookups never block each other
//! - Monotonic `Instant`s: wall-clock adjustments cannot hide a visible record

use parking_lot::RwLock;
use std::time::{Duration, Instant};

use crate::store::digest::compute_digest;

/// Delay between submission and the digest becoming retrievable.
pub const DEFAULT_VISIBILITY_DELAY: Duration = Duration::from_secs(5);

/// A single accepted submission.
#[derive(Debug, Clone)]
pub struct DigestRecord {
    /// 1-based id, equal to the record's position in the table plus one.
    pub id: u64,
    /// When the secret was accepted, before hashing.
    pub requested_at: Instant,
    /// Base64-encoded SHA-512 of the secret.
    pub digest: String,
}

impl DigestRecord {
    /// Time left before this record becomes visible at `now`.
    ///
    /// Zero once visible.
    pub fn remaining(&self, delay: Duration, now: Instant) -> Duration {
        delay.saturating_sub(now.saturating_duration_since(self.requested_at))
    }

    /// Whether the record may be returned at `now`.
    pub fn is_visible(&self, delay: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.requested_at) >= delay
    }
}

/// Outcome of looking up an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestLookup {
    /// No record was ever assigned this id.
    Unknown,
    /// The record exists but is still inside its visibility window.
    Pending { remaining: Duration },
    /// The digest is available.
    Ready(String),
}

/// Thread-safe sequential digest table.
#[derive(Debug)]
pub struct DigestStore {
    records: RwLock<Vec<DigestRecord>>,
    visibility_delay: Duration,
}

impl DigestStore {
    /// Create an empty store with the default 5 second visibility delay.
    pub fn new() -> Self {
        Self::with_visibility_delay(DEFAULT_VISIBILITY_DELAY)
    }

    /// Create an empty store with a custom visibility delay.
    pub fn with_visibility_delay(visibility_delay: Duration) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            visibility_delay,
        }
    }

    /// Hash `secret`, append it as a new record and return its id.
    ///
    /// Never fails. An empty secret is hashed like any other input; rejecting
    /// it is the caller's decision.
    pub fn submit(&self, secret: impl AsRef<[u8]>, requested_at: Instant) -> u64 {
        let digest = compute_digest(secret);

        let mut records = self.records.write();
        let id = records.len() as u64 + 1;
        records.push(DigestRecord {
            id,
            requested_at,
            digest,
        });
        drop(records);

        tracing::debug!(id, "Digest stored");
        id
    }

    /// Return the digest for `id` if it exists and is visible at `now`.
    pub fn retrieve(&self, id: u64, now: Instant) -> Option<String> {
        match self.lookup(id, now) {
            DigestLookup::Ready(digest) => Some(digest),
            DigestLookup::Unknown | DigestLookup::Pending { .. } => None,
        }
    }

    /// Classify `id` at `now`.
    pub fn lookup(&self, id: u64, now: Instant) -> DigestLookup {
        let Some(index) = id.checked_sub(1) else {
            return DigestLookup::Unknown;
        };
        let Ok(index) = usize::try_from(index) else {
            return DigestLookup::Unknown;
        };

        let records = self.records.read();
        match records.get(index) {
            None => DigestLookup::Unknown,
            Some(record) if record.is_visible(self.visibility_delay, now) => {
                DigestLookup::Ready(record.digest.clone())
            }
            Some(record) => DigestLookup::Pending {
                remaining: record.remaining(self.visibility_delay, now),
            },
        }
    }

    /// Number of records accepted so far.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured visibility delay.
    pub fn visibility_delay(&self) -> Duration {
        self.visibility_delay
    }
}

impl Default for DigestStore {
    fn default() -> Self {
        Self::new()
    }
}
