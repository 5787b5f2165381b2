// Perceptual color blending for ink.
//
// Blending is done on squared channel values, an approximation of linear
// light, then mapped back through a `round(sqrt(v))` lookup table. Plain
// linear-RGB interpolation darkens the midpoint and shows a visible band where
// fresh ink meets old paint; the squared domain does not.
//
//   out = table[(a² · (256 − w) + b² · w + 128) >> 8]
//
// The table has 255² + 1 entries and is built once per `ColorBlender`, which
// the match state constructs at start-up.

use crate::types::Rgb;

/// Largest squared channel value.
const MAX_SQUARED: usize = 255 * 255;

/// Squared-domain RGB blender with a precomputed inverse-square-root table.
#[derive(Clone, Debug)]
pub struct ColorBlender {
    sqrt_table: Vec<u8>,
}

impl Default for ColorBlender {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorBlender {
    pub fn new() -> Self {
        let sqrt_table = (0..=MAX_SQUARED)
            .map(|v| ((v as f64).sqrt() + 0.5) as u8)
            .collect();
        Self { sqrt_table }
    }

    /// Blend `a` toward `b`. `weight` is out of 256: 0 keeps `a`, 256 would
    /// give `b`.
    pub fn blend(&self, a: Rgb, b: Rgb, weight: u8) -> Rgb {
        Rgb::new(
            self.blend_channel(a.r, b.r, weight),
            self.blend_channel(a.g, b.g, weight),
            self.blend_channel(a.b, b.b, weight),
        )
    }

    fn blend_channel(&self, a: u8, b: u8, weight: u8) -> u8 {
        let (a, b, w) = (u32::from(a), u32::from(b), u32::from(weight));
        let v = (a * a * (256 - w) + b * b * w + 128) >> 8;
        self.sqrt_table[v as usize]
    }
}

/// Team color scaled by a brightness out of 256 (`channel * brightness >> 8`).
/// Used to tint freshly built blocks.
pub fn shade(color: Rgb, brightness: u8) -> Rgb {
    let scale = |c: u8| ((u32::from(c) * u32::from(brightness)) >> 8) as u8;
    Rgb::new(scale(color.r), scale(color.g), scale(color.b))
}
