use ndarray::prelude::*;
use std::f64::consts::{PI, TAU};

/// An ordered scan path of `(x, y)` pixel coordinates over a phase image.
///
/// Coordinates may fall outside the image; out-of-bounds points are
/// skipped when sampling, never an error, so paths can be defined
/// generously past the image edges.
#[derive(Clone, Debug)]
pub struct Line {
    points: Vec<(isize, isize)>,
}

impl Line {
    pub fn from_points(points: Vec<(isize, isize)>) -> Self {
        Self { points }
    }

    /// Horizontal span at row `y` covering columns `x0..=x1`.
    pub fn horizontal(y: isize, x0: isize, x1: isize) -> Self {
        Self {
            points: (x0..=x1).map(|x| (x, y)).collect(),
        }
    }

    /// Vertical span at column `x` covering rows `y0..=y1`.
    pub fn vertical(x: isize, y0: isize, y1: isize) -> Self {
        Self {
            points: (y0..=y1).map(|y| (x, y)).collect(),
        }
    }

    pub fn points(&self) -> &[(isize, isize)] {
        &self.points
    }
}

/// Sample `phase` along `line` and greedily unwrap the resulting sequence.
///
/// Causal single-pass unwrap: a jump of more than pi between consecutive
/// in-bounds samples is taken as a wrap and compensated with a 2 pi step.
/// Only valid while the true phase changes by less than pi per sample,
/// which holds for the smooth ramps this feeds into a tilt fit. Each
/// emitted pair is `(sample_index, unwrapped value)` where the index
/// counts in-bounds samples only.
pub fn unwrap_along(phase: ArrayView2<f64>, line: &Line) -> Vec<(usize, f64)> {
    let (h, w) = phase.dim();
    let mut series = Vec::with_capacity(line.points().len());
    let mut offset = 0.;
    let mut last = 0.;

    for &(x, y) in line.points() {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            continue;
        }

        let raw = phase[[y as usize, x as usize]];

        if raw > last + PI {
            offset -= TAU;
        } else if raw < last - PI {
            offset += TAU;
        }

        // The wrap detector compares raw neighbours, not unwrapped ones
        last = raw;

        series.push((series.len(), raw + offset));
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndrustfft::Complex;

    // Wrap a true phase into (-pi, pi] the way a complex argument would
    fn wrap(v: f64) -> f64 {
        Complex::new(0., v).exp().arg()
    }

    #[test]
    fn constant_zero_phase_unwraps_to_zeros() {
        let phase = Array2::<f64>::zeros((3, 5));
        let series = unwrap_along(phase.view(), &Line::horizontal(1, 0, 4));

        assert_eq!(series.len(), 5);
        for (i, &(idx, value)) in series.iter().enumerate() {
            assert_eq!(idx, i);
            assert_abs_diff_eq!(value, 0.);
        }
    }

    #[test]
    fn constant_phase_stays_constant() {
        let phase = Array2::<f64>::from_elem((3, 5), 2.);
        let series = unwrap_along(phase.view(), &Line::horizontal(0, 0, 4));

        // The synthetic first boundary at 0 registers one downward wrap;
        // every sample still lands on the same constant.
        for &(_, value) in &series {
            assert_abs_diff_eq!(value, 2. - TAU, epsilon = 1e-12);
        }
    }

    #[test]
    fn rising_ramp_unwraps_without_spurious_jumps() {
        let phase = Array2::from_shape_fn((1, 20), |(_, j)| wrap(0.5 * j as f64));
        let series = unwrap_along(phase.view(), &Line::horizontal(0, 0, 19));

        for &(idx, value) in &series {
            assert_abs_diff_eq!(value, 0.5 * idx as f64, epsilon = 1e-12);
        }

        for pair in series.windows(2) {
            assert!((pair[1].1 - pair[0].1).abs() < PI);
        }
    }

    #[test]
    fn falling_ramp_unwraps_without_spurious_jumps() {
        let phase = Array2::from_shape_fn((1, 20), |(_, j)| wrap(-0.5 * j as f64));
        let series = unwrap_along(phase.view(), &Line::horizontal(0, 0, 19));

        for &(idx, value) in &series {
            assert_abs_diff_eq!(value, -0.5 * idx as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn out_of_bounds_points_are_skipped_and_do_not_advance_the_index() {
        let phase = Array2::from_shape_fn((2, 3), |(_, j)| j as f64 * 0.1);
        let line = Line::horizontal(0, -2, 4);
        let series = unwrap_along(phase.view(), &line);

        assert_eq!(series.len(), 3);
        for (i, &(idx, value)) in series.iter().enumerate() {
            assert_eq!(idx, i);
            assert_abs_diff_eq!(value, 0.1 * i as f64);
        }
    }

    #[test]
    fn fully_out_of_bounds_line_yields_an_empty_series() {
        let phase = Array2::<f64>::zeros((4, 4));
        let series = unwrap_along(phase.view(), &Line::vertical(-1, 0, 3));

        assert!(series.is_empty());
    }
}
