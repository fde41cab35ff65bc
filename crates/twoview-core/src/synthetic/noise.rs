//! Seeded randomness for synthetic two-view scenes.
//!
//! Scene points and pixel jitter are drawn from [`SplitMix64`] streams so a
//! `(seed, stream)` pair always reproduces the same data on every platform.

use crate::{Pt2, Real};

/// Sequential splitmix64 generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Independent stream `stream` of the generator seeded with `seed`.
    pub fn with_stream(seed: u64, stream: u64) -> Self {
        let mut base = Self::new(stream);
        Self::new(seed ^ base.next_u64())
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(Self::GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform draw in `[0, 1)` built from the 53 high bits.
    pub fn next_unit(&mut self) -> Real {
        const SCALE: Real = 1.0 / (1u64 << 53) as Real;
        (self.next_u64() >> 11) as Real * SCALE
    }

    /// Uniform draw in `[lo, hi)`.
    pub fn uniform(&mut self, lo: Real, hi: Real) -> Real {
        lo + (hi - lo) * self.next_unit()
    }
}

/// Uniform pixel jitter in `[-amplitude_px, amplitude_px)` on each axis.
///
/// Every image is perturbed from its own stream, so the jitter of image B
/// does not depend on how many points image A holds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelJitter {
    pub seed: u64,
    pub amplitude_px: Real,
}

impl PixelJitter {
    /// Jittered copy of `points`, drawn from stream `image`.
    pub fn perturb(&self, image: u64, points: &[Pt2]) -> Vec<Pt2> {
        let amp = self.amplitude_px.abs();
        if amp == 0.0 {
            return points.to_vec();
        }
        let mut rng = SplitMix64::with_stream(self.seed, image);
        points
            .iter()
            .map(|p| {
                let dx = rng.uniform(-amp, amp);
                let dy = rng.uniform(-amp, amp);
                Pt2::new(p.x + dx, p.y + dy)
            })
            .collect()
    }
}
