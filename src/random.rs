/*
 * ==========================================================================
 * AUTUMN - Reactive Grid Runtime
 * ==========================================================================
 *
 * Author:   Sam Wilcox
 *
 * License:
 * This file is part of the AUTUMN runtime project.
 *
 * AUTUMN is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use rand::{RngCore, SeedableRng};

const MULTIPLIER: u64 = 48_271;
const MODULUS: u64 = 2_147_483_647;

/// Park-Miller "minimal standard" linear congruential generator.
///
/// Replays are deterministic per seed, which is what `uniformChoice` and
/// `randomPositions` rely on for reproducible runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinStdRng {
    seed: u64,
    state: u64,
}

impl MinStdRng {
    pub fn new(seed: u64) -> Self {
        let state = seed % MODULUS;
        Self {
            seed,
            // zero is a fixed point of the recurrence
            state: if state == 0 { 1 } else { state },
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    fn advance(&mut self) -> u64 {
        self.state = (MULTIPLIER * self.state) % MODULUS;
        self.state
    }

    /// Uniform-ish integer in `0..max`; `0` when `max` is zero.
    pub fn next_below(&mut self, max: u64) -> u64 {
        if max == 0 {
            return 0;
        }
        self.advance() % max
    }

    /// Integer in `min..=max`.
    pub fn next_in_range(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        let span = (max - min) as u64 + 1;
        min + self.next_below(span) as i64
    }
}

impl RngCore for MinStdRng {
    fn next_u32(&mut self) -> u32 {
        self.advance() as u32
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.next_u32()) << 32) | u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for MinStdRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_replays_the_same_sequence() {
        let mut a = MinStdRng::new(42);
        let mut b = MinStdRng::seed_from_u64(42);
        let xs: Vec<u64> = (0..8).map(|_| a.next_below(16)).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.next_below(16)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|x| *x < 16));
    }

    #[test]
    fn first_draw_follows_the_recurrence() {
        let mut rng = MinStdRng::new(1);
        assert_eq!(rng.next_below(u64::MAX), 48_271);
        assert_eq!(rng.next_below(u64::MAX), 48_271 * 48_271 % MODULUS);
    }

    #[test]
    fn zero_bound_and_zero_seed_are_safe() {
        let mut rng = MinStdRng::new(0);
        assert_eq!(rng.next_below(0), 0);
        assert_ne!(rng.next_below(1_000_000), rng.next_below(1_000_000));
    }

    #[test]
    fn plugs_into_the_rand_traits() {
        let mut rng = MinStdRng::new(7);
        let roll: u8 = rng.gen_range(1..=6);
        assert!((1..=6).contains(&roll));
        assert_eq!(rng.next_in_range(3, 3), 3);
    }
}
