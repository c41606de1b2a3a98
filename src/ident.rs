//! Random public identifiers.
//!
//! Every page, the homepage, and every asset directory is published under an
//! opaque identifier such as `k3v9q0x2mz7a` instead of its human name. The
//! human name only survives in the route table.
//!
//! Identifiers are drawn uniformly from `a-z0-9`. The generator remembers
//! what it has handed out during a build and draws again on a repeat, so two
//! artifacts of one build can never share a path.

use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};
use std::collections::HashSet;

/// Characters an identifier is drawn from.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Identifier length used when the config does not override it.
pub const DEFAULT_LENGTH: usize = 12;

/// Draw one identifier of `length` characters from `rng`.
///
/// No uniqueness guarantee; see [`IdGenerator`] for that.
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Issues identifiers that are unique within one build.
pub struct IdGenerator<R = StdRng> {
    rng: R,
    length: usize,
    issued: HashSet<String>,
}

impl IdGenerator<StdRng> {
    /// Generator seeded from the operating system.
    pub fn from_entropy(length: usize) -> Self {
        Self::new(StdRng::from_rng(&mut rand::rng()), length)
    }

    /// Deterministic generator: the same seed yields the same identifiers.
    pub fn seeded(seed: u64, length: usize) -> Self {
        Self::new(StdRng::seed_from_u64(seed), length)
    }
}

impl<R: Rng> IdGenerator<R> {
    pub fn new(rng: R, length: usize) -> Self {
        Self {
            rng,
            length,
            issued: HashSet::new(),
        }
    }

    /// Return a fresh identifier that was not issued before by this generator.
    pub fn next_id(&mut self) -> String {
        loop {
            let id = random_string(&mut self.rng, self.length);
            if self.issued.insert(id.clone()) {
                return id;
            }
            tracing::debug!(%id, "identifier collision, drawing again");
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of identifiers issued so far.
    pub fn issued(&self) -> usize {
        self.issued.len()
    }
}
