use crate::fit::{self, FitError};
use crate::line::{self, Line};
use ndarray::prelude::*;

/// Fit a polynomial to the unwrapped phase along `line` and drop the
/// constant term, leaving the ramp coefficients `[c1, .., c_degree]`.
///
/// The constant is irrelevant to a phase-ramp correction, which only
/// cancels position-dependent terms.
pub fn fit_line(
    phase: ArrayView2<f64>,
    line: &Line,
    degree: usize,
) -> Result<Vec<f64>, FitError> {
    best_fit(phase, std::slice::from_ref(line), degree)
}

/// Fit every candidate line and keep the one whose fit has the smallest
/// residual sum of squares, constant term stripped. Ties go to the
/// earliest candidate.
///
/// A candidate with too few in-bounds samples is passed over; if every
/// candidate fails, the first failure propagates. The least-residual line
/// is the one least disturbed by image content, which makes it the most
/// trustworthy ramp estimate.
pub fn best_fit(
    phase: ArrayView2<f64>,
    lines: &[Line],
    degree: usize,
) -> Result<Vec<f64>, FitError> {
    let mut best: Option<(f64, Vec<f64>)> = None;
    let mut failure = None;

    for line in lines {
        let series = line::unwrap_along(phase, line);

        let coeffs = match fit::fit(&series, degree) {
            Ok(coeffs) => coeffs,
            Err(err) => {
                failure.get_or_insert(err);
                continue;
            }
        };

        let residual = fit::residual_sum_of_squares(&coeffs, &series);

        if best.as_ref().map_or(true, |(r, _)| residual < *r) {
            best = Some((residual, coeffs));
        }
    }

    match best {
        Some((_, mut coeffs)) => {
            coeffs.remove(0);
            Ok(coeffs)
        }
        None => Err(failure.unwrap_or(FitError::InsufficientData {
            found: 0,
            required: degree + 1,
        })),
    }
}

/// Best ramp fit over `num_lines` horizontal candidates.
///
/// Candidates span the central 6/8 of the image width and sit at evenly
/// spaced interior rows, keeping them clear of the border where hologram
/// content and edge artefacts disturb the ramp.
pub fn auto_horizontal(
    phase: ArrayView2<f64>,
    num_lines: usize,
    degree: usize,
) -> Result<Vec<f64>, FitError> {
    let (h, w) = phase.dim();
    let (x0, x1) = ((w / 8) as isize, (7 * w / 8) as isize);

    let lines: Vec<Line> = (1..=num_lines)
        .map(|k| (k * h / (num_lines + 1)) as isize)
        .map(|y| Line::horizontal(y, x0, x1))
        .collect();

    best_fit(phase, &lines, degree)
}

/// Best ramp fit over `num_lines` vertical candidates, the transpose of
/// [`auto_horizontal`].
pub fn auto_vertical(
    phase: ArrayView2<f64>,
    num_lines: usize,
    degree: usize,
) -> Result<Vec<f64>, FitError> {
    let (h, w) = phase.dim();
    let (y0, y1) = ((h / 8) as isize, (7 * h / 8) as isize);

    let lines: Vec<Line> = (1..=num_lines)
        .map(|k| (k * w / (num_lines + 1)) as isize)
        .map(|x| Line::vertical(x, y0, y1))
        .collect();

    best_fit(phase, &lines, degree)
}
