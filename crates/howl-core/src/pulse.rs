//! The four-value output sample consumed by transport and rendering layers.

/// One tick of output: an amplitude and a frequency per channel, each nominally in [0, 1].
///
/// Fields:
/// - `amp_a` / `amp_b`: channel intensity, 0 is silent
/// - `freq_a` / `freq_b`: normalized pulse frequency, mapped to device units downstream
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pulse {
    pub amp_a: f32,
    pub amp_b: f32,
    pub freq_a: f32,
    pub freq_b: f32,
}

impl Pulse {
    /// Narrows simulation values to a pulse. Values are passed through unclamped.
    pub fn new(amp_a: f64, amp_b: f64, freq_a: f64, freq_b: f64) -> Self {
        Self {
            amp_a: amp_a as f32,
            amp_b: amp_b as f32,
            freq_a: freq_a as f32,
            freq_b: freq_b as f32,
        }
    }

    /// Copy with every component clamped into [0, 1]; NaN becomes 0.
    pub fn clamped(self) -> Self {
        let unit = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            amp_a: unit(self.amp_a),
            amp_b: unit(self.amp_b),
            freq_a: unit(self.freq_a),
            freq_b: unit(self.freq_b),
        }
    }

    /// Channels A and B exchanged.
    pub fn swapped(self) -> Self {
        Self {
            amp_a: self.amp_b,
            amp_b: self.amp_a,
            freq_a: self.freq_b,
            freq_b: self.freq_a,
        }
    }
}
