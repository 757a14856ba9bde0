use rand::rngs::OsRng;
use rand::RngCore;
use tracing::warn;

use crate::domain::relation::RelationId;

use super::relations::RelationStore;

/// Number of draws before allocation gives up.
pub const MAX_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("failed to generate a relation id in {attempts} attempts")]
    Exhausted { attempts: usize },
}

/// Generates relation ids by drawing random 63-bit non-negative integers and
/// retrying on collision.
///
/// Ids are unpredictable so they do not reveal creation order or record counts.
/// Zero is never handed out: it is the unset value on the wire.
pub struct IdAllocator {
    rng: Box<dyn RngCore + Send + Sync>,
    max_attempts: usize,
}

impl IdAllocator {
    /// Allocator backed by the operating system's cryptographic RNG.
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }

    pub fn with_rng(rng: impl RngCore + Send + Sync + 'static) -> Self {
        Self {
            rng: Box::new(rng),
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Returns an id not currently present in `relations`.
    pub fn allocate(&mut self, relations: &RelationStore) -> Result<RelationId, AllocationError> {
        for _ in 0..self.max_attempts {
            let id = (self.rng.next_u64() >> 1) as RelationId;
            if id != 0 && !relations.contains(id) {
                return Ok(id);
            }
        }

        warn!("failed to generate relation id in {} attempts", self.max_attempts);
        Err(AllocationError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdAllocator")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}
