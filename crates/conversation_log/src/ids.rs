use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use uuid::Builder;

/// Opaque identifier for one conversation turn.
///
/// Semantics:
/// - IDs are unique within a session.
/// - IDs are never reused or mutated once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(String);

impl TurnId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of turn identifiers for one log instance.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> TurnId;
}

/// UUIDv4 identifiers from OS entropy.
///
/// The first time OS entropy is unavailable the generator switches permanently
/// to [`FallbackIdGenerator`].
#[derive(Debug, Default)]
pub struct RandomIdGenerator {
    fallback: Option<FallbackIdGenerator>,
}

impl RandomIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.fallback.is_some()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self) -> TurnId {
        if self.fallback.is_none() {
            let mut bytes = [0_u8; 16];
            match OsRng.try_fill_bytes(&mut bytes) {
                Ok(()) => {
                    return TurnId(Builder::from_random_bytes(bytes).into_uuid().to_string());
                }
                Err(error) => {
                    tracing::warn!(%error, "os entropy unavailable, using composite turn ids");
                }
            }
        }

        self.fallback
            .get_or_insert_with(FallbackIdGenerator::new)
            .next_id()
    }
}

/// Time + sequence + pseudo-random composite identifiers.
///
/// Format: `<epoch millis hex>-<sequence hex>-<64 random bits hex>`. The
/// sequence makes ids from one generator distinct regardless of clock or rng
/// quality.
#[derive(Debug)]
pub struct FallbackIdGenerator {
    sequence: u64,
    rng: StdRng,
}

impl FallbackIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(nanos ^ u64::from(std::process::id()).rotate_left(32))
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            sequence: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for FallbackIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for FallbackIdGenerator {
    fn next_id(&mut self) -> TurnId {
        self.sequence = self.sequence.wrapping_add(1);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        TurnId(format!(
            "{millis:x}-{:x}-{:016x}",
            self.sequence,
            self.rng.next_u64()
        ))
    }
}

/// Deterministic `<prefix>-<n>` identifiers for tests and replayable runs.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("turn")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> TurnId {
        let id = TurnId(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}
