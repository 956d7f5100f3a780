// Picks one color per stroke: fixed low alpha, random RGB.
// The random source is owned here (not global) so a fixed seed reproduces a session exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{argb, Pixel};

/// Visual: every stroke gets its own faint tint; overlapping strokes mix into new hues.
pub struct StrokePalette {
    rng: StdRng,
    alpha: u8,
}

impl StrokePalette {
    /// `seed: None` draws the seed from OS entropy.
    pub fn new(alpha: u8, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, alpha }
    }

    /// Alpha shared by every stroke color.
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Color for the next stroke. Each RGB channel is uniform in 0..255 (255 itself never comes up).
    pub fn next_color(&mut self) -> Pixel {
        let r = self.rng.gen_range(0..255);
        let g = self.rng.gen_range(0..255);
        let b = self.rng.gen_range(0..255);
        argb(self.alpha, r, g, b)
    }
}
