//! Domain primitives: TimeMs, Slot, Signature.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Time in milliseconds since Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeMs(pub i64);

impl TimeMs {
    /// Create a TimeMs from milliseconds.
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        TimeMs(chrono::Utc::now().timestamp_millis())
    }

    /// Get the underlying milliseconds value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Discrete regeneration time-step.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Slot(pub u64);

impl Slot {
    /// Nominal chain slot duration.
    pub const DURATION_MS: i64 = 400;

    pub fn new(slot: u64) -> Self {
        Slot(slot)
    }

    /// Slot containing the given wall-clock time.
    pub fn at(time: TimeMs) -> Self {
        Slot((time.as_i64().max(0) / Self::DURATION_MS) as u64)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Slot(self.0 + 1)
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction signature (short uppercase identifier).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Signature(pub String);

impl Signature {
    const LEN: usize = 10;

    pub fn new(sig: String) -> Self {
        Signature(sig)
    }

    /// Random signature drawn from a v4 UUID.
    pub fn random() -> Self {
        let raw = uuid::Uuid::new_v4().simple().to_string();
        Signature(raw[..Self::LEN].to_ascii_uppercase())
    }

    /// Random signature drawn from the given rng, for reproducible batches.
    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        let raw = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
        Signature(raw.simple().to_string()[..Self::LEN].to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
