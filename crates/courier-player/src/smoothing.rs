/// Reference frame rate the blend coefficients are tuned at.
const REFERENCE_FPS: f64 = 60.0;

/// Frame-rate-independent exponential blend.
///
/// `blend` is the fraction of the remaining gap closed per frame at 60 Hz
/// (0.0 = never moves, 1.0 = instant snap). For any `dt` the result is
/// `1 - (1 - blend)^(dt * 60)`, so two half-length frames close the same
/// gap as one full frame. Invalid `dt` yields 0 (hold state).
pub fn blend_factor(blend: f64, dt: f64) -> f64 {
    if !dt.is_finite() || dt <= 0.0 || !blend.is_finite() {
        return 0.0;
    }
    let blend = blend.clamp(0.0, 1.0);
    1.0 - (1.0 - blend).powf(dt * REFERENCE_FPS)
}
