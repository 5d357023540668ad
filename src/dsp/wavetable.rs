#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f32::consts::PI;

/// Number of harmonic amplitudes in a Fourier recipe.
pub const HARMONICS: usize = 9;

/// Harmonic recipes for the eight timbre levels, from pure fundamental
/// (level 0) to bright, upper-harmonic-heavy spectra (level 7). Hand-tuned;
/// each row sums to roughly unity so levels sit at comparable loudness.
const TIMBRE_RECIPES: [[f32; HARMONICS]; 8] = [
    [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.8, 0.2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.6, 0.3, 0.05, 0.05, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.4, 0.35, 0.1, 0.05, 0.04, 0.0, 0.0, 0.0, 0.0],
    [0.2, 0.4, 0.15, 0.1, 0.05, 0.04, 0.0, 0.0, 0.0],
    [0.15, 0.3, 0.3, 0.2, 0.025, 0.02, 0.005, 0.0, 0.0],
    [0.1, 0.15, 0.15, 0.3, 0.05, 0.03, 0.02, 0.005, 0.005],
    [0.05, 0.08, 0.1, 0.15, 0.2, 0.1, 0.08, 0.02, 0.01],
];

/// A fixed-length buffer holding exactly one cycle of a waveform.
///
/// Tables are immutable after generation and shared between voices through
/// an `Arc` — a voice reads its table by phase index, it never copies or
/// mutates it. Samples are nominally in [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct WaveTable {
    samples: Vec<f32>,
}

impl WaveTable {
    /// One cycle of a sine wave.
    pub fn sine(len: usize) -> Self {
        let step = 2.0 * PI / len as f32;
        Self {
            samples: (0..len).map(|i| (step * i as f32).sin()).collect(),
        }
    }

    /// One cycle of a square wave: +1 for the first half, -1 for the rest.
    pub fn square(len: usize) -> Self {
        let samples = (0..len)
            .map(|i| if i < len / 2 { 1.0 } else { -1.0 })
            .collect();
        Self { samples }
    }

    /// One cycle of a triangle wave: a linear ramp from -1 up to 1 over the
    /// first half, then back down over the second.
    pub fn triangle(len: usize) -> Self {
        let half = len / 2;
        let mut samples = Vec::with_capacity(len);
        for i in 0..half {
            samples.push(-1.0 + 2.0 * i as f32 / (half - 1) as f32);
        }
        for i in half..len {
            samples.push(1.0 - 2.0 * (i - half) as f32 / half as f32);
        }
        Self { samples }
    }

    /// A band-limited sawtooth approximation: the sum of the first 100
    /// harmonics with alternating-sign amplitudes proportional to 1/n.
    /// Not a literal ramp — summing a finite series keeps the top end from
    /// aliasing as hard as a naive sawtooth would.
    pub fn sawtooth(len: usize) -> Self {
        let mut samples = Vec::with_capacity(len);
        for i in 0..len {
            let mut acc = 0.0;
            for n in 1..=100 {
                let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
                let amp = -(2.0 / (PI * n as f32)) * sign;
                acc += amp * (2.0 * PI * n as f32 * i as f32 / len as f32).sin();
            }
            samples.push(acc);
        }
        Self { samples }
    }

    /// Generic additive synthesis: one cycle of the sum of nine harmonics
    /// at the given amplitudes, harmonic j+1 weighted by `amps[j]`.
    pub fn fourier(len: usize, amps: &[f32; HARMONICS]) -> Self {
        let mut samples = Vec::with_capacity(len);
        for i in 0..len {
            let mut acc = 0.0;
            for (j, &amp) in amps.iter().enumerate() {
                let harmonic = (j + 1) as f32;
                acc += amp * (2.0 * PI * harmonic * i as f32 / len as f32).sin();
            }
            samples.push(acc);
        }
        Self { samples }
    }

    /// A wave whose harmonic content is selected by a brightness level.
    ///
    /// Levels 0–7 pick one of the fixed recipes above; higher levels carry
    /// more upper-harmonic energy and sound colder. Any level past 7 falls
    /// back to the pure fundamental, same as level 0.
    pub fn timbre(len: usize, level: u8) -> Self {
        let recipe = TIMBRE_RECIPES
            .get(level as usize)
            .unwrap_or(&TIMBRE_RECIPES[0]);
        Self::fourier(len, recipe)
    }

    /// Sample at a table index. The caller keeps the index in range by
    /// wrapping its phase accumulator modulo `len()`.
    #[inline]
    pub fn at(&self, index: usize) -> f32 {
        self.samples[index]
    }

    /// Length of the table: the number of samples in one cycle.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }
}

/// Which generator to build a table from. Handy for configuration and for
/// callers that pick waveforms by name rather than calling generators
/// directly.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformKind {
    Sine,
    Square,
    Triangle,
    Sawtooth,
    /// Additive wave at the given brightness level (0–7).
    Timbre(u8),
}

impl WaveformKind {
    pub fn generate(self, len: usize) -> WaveTable {
        match self {
            WaveformKind::Sine => WaveTable::sine(len),
            WaveformKind::Square => WaveTable::square(len),
            WaveformKind::Triangle => WaveTable::triangle(len),
            WaveformKind::Sawtooth => WaveTable::sawtooth(len),
            WaveformKind::Timbre(level) => WaveTable::timbre(len, level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEN: usize = 1024;

    #[test]
    fn sine_covers_one_cycle() {
        let table = WaveTable::sine(LEN);
        assert_eq!(table.len(), LEN);
        assert_eq!(table.at(0), 0.0);
        // Quarter cycle is the positive peak, three quarters the negative.
        assert!((table.at(LEN / 4) - 1.0).abs() < 1e-5);
        assert!((table.at(3 * LEN / 4) + 1.0).abs() < 1e-5);
    }

    #[test]
    fn square_splits_at_the_half() {
        let table = WaveTable::square(LEN);
        assert!(table.as_slice()[..LEN / 2].iter().all(|&s| s == 1.0));
        assert!(table.as_slice()[LEN / 2..].iter().all(|&s| s == -1.0));
    }

    #[test]
    fn triangle_ramps_up_then_down() {
        let table = WaveTable::triangle(LEN);
        assert_eq!(table.at(0), -1.0);
        assert_eq!(table.at(LEN / 2 - 1), 1.0);
        assert_eq!(table.at(LEN / 2), 1.0);
        // Strictly monotonic on each half.
        assert!(table.as_slice()[..LEN / 2].windows(2).all(|w| w[1] > w[0]));
        assert!(table.as_slice()[LEN / 2..].windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn sawtooth_is_band_limited_additive() {
        let table = WaveTable::sawtooth(LEN);
        assert_eq!(table.len(), LEN);
        assert_eq!(table.at(0), 0.0);
        // The series approximates a ramp that peaks just before the cycle
        // midpoint and drops across it.
        assert!(table.at(LEN / 2 - 8) > 0.9);
        assert!(table.at(LEN / 2 + 8) < -0.9);
        assert!((table.at(LEN / 4) - 0.5).abs() < 0.05);
    }

    #[test]
    fn fourier_single_harmonic_matches_sine() {
        let mut amps = [0.0; HARMONICS];
        amps[0] = 1.0;
        let fourier = WaveTable::fourier(LEN, &amps);
        let sine = WaveTable::sine(LEN);
        for (a, b) in fourier.as_slice().iter().zip(sine.as_slice()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn fourier_weights_each_harmonic() {
        let mut amps = [0.0; HARMONICS];
        amps[2] = 0.5; // third harmonic only
        let table = WaveTable::fourier(LEN, &amps);
        // Third harmonic peaks a twelfth of the way into the cycle.
        assert!((table.at(LEN / 12) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn timbre_levels_are_deterministic_and_full_length() {
        for level in 0..=7 {
            let a = WaveTable::timbre(LEN, level);
            let b = WaveTable::timbre(LEN, level);
            assert_eq!(a.len(), LEN, "level {level} table length");
            assert_eq!(a, b, "level {level} should be deterministic");
        }
    }

    #[test]
    fn timbre_out_of_range_falls_back_to_fundamental() {
        let fallback = WaveTable::timbre(LEN, 42);
        assert_eq!(fallback, WaveTable::timbre(LEN, 0));

        let mut fundamental = [0.0; HARMONICS];
        fundamental[0] = 1.0;
        assert_eq!(fallback, WaveTable::fourier(LEN, &fundamental));
    }

    #[test]
    fn timbre_levels_differ_from_each_other() {
        let warm = WaveTable::timbre(LEN, 1);
        let bright = WaveTable::timbre(LEN, 7);
        assert_ne!(warm, bright);
    }

    #[test]
    fn kind_generates_the_matching_table() {
        assert_eq!(WaveformKind::Sine.generate(LEN), WaveTable::sine(LEN));
        assert_eq!(
            WaveformKind::Timbre(3).generate(LEN),
            WaveTable::timbre(LEN, 3)
        );
    }
}
