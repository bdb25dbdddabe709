//! Deterministic RNG based on splitmix64/32, reseedable from a string key.

use xxhash_rust::xxh32::xxh32;

const SALT_PRNG: u64 = 0x5EED_F00D_0BAD_CAFE;
const SALT_NOISE: u64 = 0x2015_E5EE_D000_F1E1;
const SALT_FORK: u64 = 0xF0CC_ACC1_A5ED_0001;

/// 2^-32, the fine-draw scale.
const INV_2_32: f64 = 1.0 / 4_294_967_296.0;

#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[inline]
pub fn splitmix32(mut x: u32) -> u32 {
    x = x.wrapping_add(0x9E3779B9);
    let mut z = x;
    z = (z ^ (z >> 16)).wrapping_mul(0x7FEB352D);
    z = (z ^ (z >> 15)).wrapping_mul(0x846CA68B);
    z ^ (z >> 16)
}

#[inline]
pub fn seed_u32(seed: u64, salt: u64) -> u32 {
    splitmix64(seed ^ salt) as u32
}

#[inline]
pub fn hash2(ix: i32, iy: i32, seed: u32) -> u32 {
    let x = ix as u32;
    let y = iy as u32;
    let mut h = seed ^ 0x9E3779B9;
    h = splitmix32(h ^ x.wrapping_mul(0x85EBCA6B));
    h = splitmix32(h ^ y.wrapping_mul(0xC2B2AE35));
    h
}

#[inline]
pub fn hash3(ix: i32, iy: i32, iz: i32, seed: u32) -> u32 {
    splitmix32(hash2(ix, iy, seed) ^ (iz as u32).wrapping_mul(0x27D4EB2F))
}

#[inline]
pub fn hash4(ix: i32, iy: i32, iz: i32, iw: i32, seed: u32) -> u32 {
    splitmix32(hash3(ix, iy, iz, seed) ^ (iw as u32).wrapping_mul(0x165667B1))
}

/// Fold an arbitrary string key into 64 bits. Two xxh32 lanes with distinct seeds.
pub fn key_digest(key: &str) -> u64 {
    let lo = xxh32(key.as_bytes(), 0x7E44_A1B0) as u64;
    let hi = xxh32(key.as_bytes(), 0x0C0F_FEE5) as u64;
    (hi << 32) | lo
}

/// Stateful generator consumed by the subdivision passes.
///
/// Reproducibility depends on strict call order: two sources with the same
/// seed yield the same terrain only if they are asked for draws in the same
/// sequence.
#[derive(Clone, Debug)]
pub struct RandomSource {
    state: u64,
    noise_seed: u32,
}

impl RandomSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            state: splitmix64(seed ^ SALT_PRNG),
            noise_seed: seed_u32(seed, SALT_NOISE),
        }
    }

    pub fn from_key(key: &str) -> Self {
        Self::from_seed(key_digest(key))
    }

    /// Derive PRNG and noise state from `key`. Identical keys reproduce identical output.
    pub fn reseed(&mut self, key: &str) {
        *self = Self::from_key(key);
    }

    /// Seed for the gradient-noise collaborator, derived alongside the PRNG state.
    pub fn noise_seed(&self) -> u32 {
        self.noise_seed
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = splitmix64(self.state);
        self.state
    }

    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Child generator for independent work (one continent, one tile).
    /// Consumes exactly one draw from `self`.
    pub fn fork(&mut self) -> Self {
        Self::from_seed(self.next_u64() ^ SALT_FORK)
    }

    /// Float in `[min, max]`: a coarse draw plus a fine sub-draw folded below its
    /// last bit, so the result carries more resolution than one 32-bit draw.
    pub fn uniform(&mut self, min: f32, max: f32) -> f32 {
        let base = self.next_u32() as f64 * INV_2_32;
        let fine = self.next_u32() as f64 * INV_2_32;
        let r = (base + fine * INV_2_32).abs();
        (r * (max as f64 - min as f64) + min as f64) as f32
    }
}
