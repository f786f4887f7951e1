//! Domain-separated RNG streams for the accident pipeline.
//!
//! Each accident family draws from its own stream so that, for a fixed seed,
//! one family's activity cannot perturb another family's rolls.

use std::cell::{RefCell, RefMut};

use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use sha2::Sha256;

/// Derive a per-stream seed from the user seed and a domain tag.
fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

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

/// Bundle of per-family RNG streams derived from one user seed.
#[derive(Debug, Clone)]
pub struct RngBundle {
    cooking: RefCell<CountingRng<SmallRng>>,
    butchering: RefCell<CountingRng<SmallRng>>,
    eating: RefCell<CountingRng<SmallRng>>,
    movement: RefCell<CountingRng<SmallRng>>,
    work: RefCell<CountingRng<SmallRng>>,
    sleep: RefCell<CountingRng<SmallRng>>,
    animals: RefCell<CountingRng<SmallRng>>,
    storm: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            cooking: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"cooking"))),
            butchering: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"butchering"))),
            eating: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"eating"))),
            movement: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"movement"))),
            work: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"work"))),
            sleep: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"sleep"))),
            animals: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"animals"))),
            storm: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"storm"))),
        }
    }

    /// Access the cooking RNG stream.
    #[must_use]
    pub fn cooking(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.cooking.borrow_mut()
    }

    /// Access the butchering RNG stream.
    #[must_use]
    pub fn butchering(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.butchering.borrow_mut()
    }

    /// Access the eating RNG stream.
    #[must_use]
    pub fn eating(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.eating.borrow_mut()
    }

    /// Access the movement RNG stream.
    #[must_use]
    pub fn movement(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.movement.borrow_mut()
    }

    /// Access the work RNG stream.
    #[must_use]
    pub fn work(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.work.borrow_mut()
    }

    /// Access the sleep RNG stream.
    #[must_use]
    pub fn sleep(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.sleep.borrow_mut()
    }

    /// Access the animal-handling RNG stream.
    #[must_use]
    pub fn animals(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.animals.borrow_mut()
    }

    /// Access the accident-storm RNG stream.
    #[must_use]
    pub fn storm(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.storm.borrow_mut()
    }
}
