//! Deterministic, per-colonist random streams for spawn-time assembly.
use hmac::{Hmac, Mac};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

use crate::colonist::ColonistId;

/// RNG wrapper that counts draw calls, for replay diagnostics.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// Source of spawn streams derived from one user-visible seed.
///
/// Each colonist gets its own stream keyed by its id, so the injuries a
/// colonist receives do not depend on how many colonists spawned before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnRng {
    seed: u64,
}

impl SpawnRng {
    #[must_use]
    pub const fn from_user_seed(seed: u64) -> Self {
        Self { seed }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Stream dedicated to assembling `colonist`'s injuries.
    #[must_use]
    pub fn colonist_stream(&self, colonist: ColonistId) -> CountingRng<ChaCha20Rng> {
        let mut tag = *b"colonist:\0\0\0\0";
        tag[9..].copy_from_slice(&colonist.raw().to_le_bytes());
        self.stream(&tag)
    }

    /// Stream for an arbitrary domain tag.
    #[must_use]
    pub fn stream(&self, domain_tag: &[u8]) -> CountingRng<ChaCha20Rng> {
        CountingRng::new(derive_stream_seed(self.seed, domain_tag))
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
