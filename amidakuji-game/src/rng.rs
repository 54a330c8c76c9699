//! Seeded random source shared by every stochastic decision in the engine.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    /// Uniform float in `[0, 1)`.
    pub fn unit_float(&mut self) -> f32 {
        self.r#gen::<f32>()
    }

    /// Bernoulli trial succeeding with `probability`.
    pub fn chance(&mut self, probability: f32) -> bool {
        self.unit_float() < probability
    }

    /// Uniform index in `[0, bound)`; `bound` must be non-zero.
    pub fn index_below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "index bound must be non-zero");
        let scaled = crate::numbers::floor_f32_to_usize(
            self.unit_float() * crate::numbers::usize_to_f32(bound),
        );
        scaled.min(bound.saturating_sub(1))
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
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

/// Deterministic bundle of RNG streams segregated by engine concern.
///
/// Each stream is seeded independently from the user seed, so drawing more
/// values in one concern (say, redrawing a dense rail) never shifts the
/// values another concern sees.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    layout: RefCell<CountingRng<SmallRng>>,
    solver: RefCell<CountingRng<SmallRng>>,
    checkpoint: RefCell<CountingRng<SmallRng>>,
    board: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            layout: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"layout"))),
            solver: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"solver"))),
            checkpoint: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"checkpoint"))),
            board: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"board"))),
        }
    }

    /// Seed this bundle was derived from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Rung bitmap generation stream.
    #[must_use]
    pub fn layout(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.layout.borrow_mut()
    }

    /// Candidate reference offset stream.
    #[must_use]
    pub fn solver(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.solver.borrow_mut()
    }

    /// Checkpoint and trigger thinning stream.
    #[must_use]
    pub fn checkpoint(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.checkpoint.borrow_mut()
    }

    /// Start/end track selection stream.
    #[must_use]
    pub fn board(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.board.borrow_mut()
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}
