use ndarray::par_azip;
use ndarray::prelude::*;
use ndrustfft::{nddct2_par, nddct3_par, DctHandler};
use std::f64::consts::{PI, TAU};

/// Unwrap a full phase image by solving the discrete Poisson equation of
/// its wrapped gradients with cosine transforms (Ghiglia & Romero 1994,
/// algorithm 1).
///
/// Exact when the wrapped gradients are consistent (no residues), which
/// is the case for the smooth tilt-corrected phase maps this is applied
/// to. The result is determined up to an additive constant.
pub fn unwrap_phase(wrapped: ArrayView2<f64>) -> Array2<f64> {
    let (h, w) = wrapped.dim();
    let mut handler_x = DctHandler::<f64>::new(w);
    let mut handler_y = DctHandler::<f64>::new(h);

    let mut rho = wrapped_laplacian(wrapped);
    let mut out = Array2::<f64>::zeros((h, w));

    // 2d dct of `rho` into itself using `out` as temp storage
    nddct2_par(&rho, &mut out, &mut handler_x, 1);
    nddct2_par(&out, &mut rho, &mut handler_y, 0);

    let icos: Vec<f64> = (0..h).map(|i| (i as f64 * PI / h as f64).cos()).collect();
    let jcos: Vec<f64> = (0..w).map(|j| (j as f64 * PI / w as f64).cos()).collect();

    par_azip!((index (i, j), out in &mut out, &rho in &rho) {
        *out = 0.5 * rho / (icos[i] + jcos[j] - 2.);
    });

    // The (0, 0) mode carries the arbitrary constant
    out[[0, 0]] = rho[[0, 0]];

    // inverse 2d dct of `out` into itself using `rho` as temp storage
    nddct3_par(&out, &mut rho, &mut handler_x, 1);
    nddct3_par(&rho, &mut out, &mut handler_y, 0);

    out
}

// Second differences of the phase with every first difference wrapped to
// [-pi, pi] before differencing again. Boundary differences are zero
// (Neumann), matching the cosine-transform solver.
fn wrapped_laplacian(phase: ArrayView2<f64>) -> Array2<f64> {
    let (h, w) = phase.dim();

    let wrap = |v: f64| v - TAU * (v / TAU).round();

    Array2::from_shape_fn((h, w), |(i, j)| {
        let here = phase[[i, j]];
        let dy0 = if i > 0 { wrap(here - phase[[i - 1, j]]) } else { 0. };
        let dy1 = if i + 1 < h { wrap(phase[[i + 1, j]] - here) } else { 0. };
        let dx0 = if j > 0 { wrap(here - phase[[i, j - 1]]) } else { 0. };
        let dx1 = if j + 1 < w { wrap(phase[[i, j + 1]] - here) } else { 0. };

        dy1 - dy0 + dx1 - dx0
    })
}
