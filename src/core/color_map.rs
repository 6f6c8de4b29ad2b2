use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::core::{error::ConfigError, lookup_table::LookupTable};

/// Number of samples used to discretize a hue ramp before it is quantized to 8 bits.
pub const HUE_RAMP_SAMPLE_COUNT: usize = 256;

/// Trailing entries removed from the tiled hue cycle before it is reversed.
/// Purely cosmetic: it shifts where the seam of the hue cycle lands in the image.
pub const DEFAULT_PALETTE_TRIM_COUNT: usize = 38;

/**
 * A continuous color ramp over [0, 1], described independently per channel by
 * piecewise-linear `[query, value]` keyframes. Values are on [0, 1].
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HueRamp {
    pub red: Vec<[f64; 2]>,
    pub green: Vec<[f64; 2]>,
    pub blue: Vec<[f64; 2]>,
}

impl Default for HueRamp {
    fn default() -> Self {
        HueRamp::hsv()
    }
}

impl HueRamp {
    /**
     * The classical cyclic "hsv" ramp: red -> yellow -> green -> cyan -> blue ->
     * magenta -> (almost) red again.
     */
    pub fn hsv() -> HueRamp {
        HueRamp {
            red: vec![
                [0.0, 1.0],
                [0.158730, 1.0],
                [0.174603, 0.968750],
                [0.333333, 0.031250],
                [0.349206, 0.0],
                [0.666667, 0.0],
                [0.682540, 0.031250],
                [0.841270, 0.968750],
                [0.857143, 1.0],
                [1.0, 1.0],
            ],
            green: vec![
                [0.0, 0.0],
                [0.158730, 0.937500],
                [0.174603, 1.0],
                [0.507937, 1.0],
                [0.666667, 0.062500],
                [0.682540, 0.0],
                [1.0, 0.0],
            ],
            blue: vec![
                [0.0, 0.0],
                [0.333333, 0.0],
                [0.349206, 0.062500],
                [0.507937, 1.0],
                [0.841270, 1.0],
                [0.857143, 0.937500],
                [1.0, 0.09375],
            ],
        }
    }

    fn channels(&self) -> [(&'static str, &[[f64; 2]]); 3] {
        [
            ("red", self.red.as_slice()),
            ("green", self.green.as_slice()),
            ("blue", self.blue.as_slice()),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (channel, keyframes) in self.channels() {
            let malformed = |reason| ConfigError::MalformedHueRamp {
                channel,
                reason,
            };
            let (first, last) = match (keyframes.first(), keyframes.last()) {
                (Some(first), Some(last)) => (first, last),
                _ => return Err(malformed("keyframes must not be empty")),
            };
            if first[0] != 0.0 || last[0] != 1.0 {
                return Err(malformed("keyframe queries must span [0, 1]"));
            }
            if keyframes.windows(2).any(|pair| pair[0][0] >= pair[1][0]) {
                return Err(malformed("keyframe queries must be strictly increasing"));
            }
            if keyframes
                .iter()
                .any(|keyframe| !(0.0..=1.0).contains(&keyframe[1]))
            {
                return Err(malformed("keyframe values must be on [0, 1]"));
            }
        }
        Ok(())
    }

    /// Evaluates all three channels, each on [0, 1].
    pub fn evaluate(&self, query: f64) -> [f64; 3] {
        [
            interpolate_channel(&self.red, query),
            interpolate_channel(&self.green, query),
            interpolate_channel(&self.blue, query),
        ]
    }

    /**
     * Samples the ramp at `HUE_RAMP_SAMPLE_COUNT` evenly spaced queries and
     * converts each sample to 8-bit color (truncating, not rounding).
     */
    pub fn lookup_table(&self) -> LookupTable<Rgb<u8>> {
        LookupTable::new(HUE_RAMP_SAMPLE_COUNT, |query| {
            let [red, green, blue] = self.evaluate(query);
            Rgb([
                to_channel_byte(red),
                to_channel_byte(green),
                to_channel_byte(blue),
            ])
        })
    }
}

fn to_channel_byte(value: f64) -> u8 {
    (value * 255.0) as u8
}

/// Keyframes must already be validated (non-empty, sorted, spanning [0, 1]).
fn interpolate_channel(keyframes: &[[f64; 2]], query: f64) -> f64 {
    let last = keyframes.len() - 1;
    if query <= 0.0 {
        return keyframes[0][1];
    }
    if query >= 1.0 {
        return keyframes[last][1];
    }
    let idx_upp = keyframes.partition_point(|keyframe| keyframe[0] < query);
    let [x_low, y_low] = keyframes[idx_upp - 1];
    let [x_upp, y_upp] = keyframes[idx_upp];
    let distance = (query - x_low) / (x_upp - x_low);
    (distance * (y_upp - y_low) + y_low).clamp(0.0, 1.0)
}

/**
 * Palette indexed by escape depth. A short cycle of `repeat_depth` evenly
 * spaced hues is tiled to cover every escape depth, the last `trim_count`
 * entries are dropped, and the order is reversed. Shallow escape depths
 * therefore start partway into the cycle and walk backward through it,
 * which produces the banding of the final image.
 */
#[derive(Clone, Debug)]
pub struct CyclicPalette {
    colors: Vec<Rgb<u8>>,
}

impl CyclicPalette {
    pub fn new(
        hue_ramp: &HueRamp,
        repeat_depth: u32,
        limit_depth: u32,
        trim_count: usize,
    ) -> CyclicPalette {
        assert!(repeat_depth > 0);
        let cycle = hue_cycle(hue_ramp, repeat_depth);
        let tile_count = tile_count(repeat_depth, limit_depth, trim_count);

        let mut colors: Vec<Rgb<u8>> = Vec::with_capacity(cycle.len() * tile_count);
        for _ in 0..tile_count {
            colors.extend_from_slice(&cycle);
        }
        colors.truncate(colors.len() - trim_count);
        colors.reverse();
        CyclicPalette { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Panics if `depth` is beyond the palette; construction guarantees every
    /// depth below `limit_depth` is covered.
    pub fn color(&self, depth: u32) -> Rgb<u8> {
        self.colors[depth as usize]
    }

    pub fn colors(&self) -> &[Rgb<u8>] {
        &self.colors
    }
}

/// `repeat_depth` hues evenly spaced over the ramp, starting at query 0.
pub fn hue_cycle(hue_ramp: &HueRamp, repeat_depth: u32) -> Vec<Rgb<u8>> {
    let table = hue_ramp.lookup_table();
    (0..repeat_depth)
        .map(|depth| table.lookup(depth as f64 / repeat_depth as f64))
        .collect()
}

/**
 * Number of copies of the hue cycle needed so that, after trimming, the palette
 * still covers `limit_depth` entries. The first term is the historical tiling
 * count (it fixes the phase of the banding); the second only matters when the
 * trim would otherwise eat into the required depth range.
 */
pub fn tile_count(repeat_depth: u32, limit_depth: u32, trim_count: usize) -> usize {
    let repeat = repeat_depth as usize;
    let limit = limit_depth as usize;
    let historical = 1 + limit / repeat;
    let required = (limit + trim_count + repeat - 1) / repeat;
    historical.max(required)
}
