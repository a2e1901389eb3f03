use ndarray::par_azip;
use ndarray::prelude::*;
use ndrustfft::Complex;

/// Synthesize the unit-magnitude complex field that cancels a fitted
/// phase ramp when multiplied pointwise against a reconstructed field.
///
/// `h_fit` and `v_fit` are constant-stripped ramp fits: index 0 holds the
/// linear term and index 1 the quadratic term, which contributes as its
/// square. Missing coefficients read as zero, so a degree-1 fit simply
/// has no curvature contribution. `dim` is `(height, width)` in pixels.
pub fn synthesize(h_fit: &[f64], v_fit: &[f64], dim: (usize, usize)) -> Array2<Complex<f64>> {
    let hx = h_fit.first().copied().unwrap_or(0.);
    let vy = v_fit.first().copied().unwrap_or(0.);
    let hq = h_fit.get(1).copied().unwrap_or(0.);
    let vq = v_fit.get(1).copied().unwrap_or(0.);

    let mut out = Array2::zeros(dim);

    par_azip!((index (i, j), c in &mut out) {
        let (x, y) = (j as f64, i as f64);
        let val = -(hx * x + vy * y + hq * hq * x * x + vq * vq * y * y);

        *c = Complex::new(val.cos(), val.sin());
    });

    out
}
