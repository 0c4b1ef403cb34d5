use std::f32::consts::PI;

/// Band-pass biquad used as the heavy-duty DSSS front end.
///
/// Direct-form-I with coefficients
/// `b0 = α, b1 = 0, b2 = −α, a0 = 1+α, a1 = −2cos(ω₀), a2 = 1−α`
/// where `ω₀ = 2πf_c/F_s` and `α = sin(ω₀)/(2Q)`, `Q = f_c / bandwidth`.
///
/// Each decode attempt is independent, so the filter state starts from zero
/// for every window; callers go through [`Biquad::filter`] rather than
/// keeping an instance around.
pub struct Biquad {
    b0: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Band-pass centered on `center_hz` with the given `bandwidth_hz`,
    /// designed for `sample_rate` Hz input.
    pub fn band_pass(center_hz: f32, bandwidth_hz: f32, sample_rate: f32) -> Self {
        let q = center_hz / bandwidth_hz;
        let w0 = 2.0 * PI * center_hz / sample_rate;
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;

        Self {
            b0: alpha / a0,
            b2: -alpha / a0,
            a1: -2.0 * w0.cos() / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Push one sample through the section.
    pub fn process(&mut self, x: f32) -> f32 {
        // b1 is identically zero for this design
        let y = self.b0 * x + self.b2 * self.x2 - self.a1 * self.y1 - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    /// Filter a whole window with fresh state.
    pub fn filter(center_hz: f32, bandwidth_hz: f32, sample_rate: f32, window: &[f32]) -> Vec<f32> {
        let mut section = Self::band_pass(center_hz, bandwidth_hz, sample_rate);
        window.iter().map(|&x| section.process(x)).collect()
    }
}
