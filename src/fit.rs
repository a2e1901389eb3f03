use thiserror::Error;

#[derive(Debug, Error)]
pub enum FitError {
    /// Fewer usable observations than the fit has coefficients.
    #[error("insufficient data for fit: found {found} observations, need {required}")]
    InsufficientData { found: usize, required: usize },

    /// The normal equations cannot be solved.
    #[error("normal equations are singular")]
    SingularSystem,
}

/// Ordinary least-squares fit of a polynomial of the given degree to
/// `(index, value)` observations, all weighted equally.
///
/// Returns coefficients `[c0, c1, .., c_degree]` with value at `x` equal
/// to the sum of `ci * x^i`. Needs at least `degree + 1` observations.
pub fn fit(series: &[(usize, f64)], degree: usize) -> Result<Vec<f64>, FitError> {
    let terms = degree + 1;

    if series.len() < terms {
        return Err(FitError::InsufficientData {
            found: series.len(),
            required: terms,
        });
    }

    // Normal equations (A^T A) c = A^T b over the Vandermonde rows
    let mut ata = vec![vec![0.; terms]; terms];
    let mut atb = vec![0.; terms];
    let mut row = vec![0.; terms];

    for &(index, value) in series {
        let x = index as f64;
        let mut power = 1.;

        for r in row.iter_mut() {
            *r = power;
            power *= x;
        }

        for i in 0..terms {
            for j in 0..terms {
                ata[i][j] += row[i] * row[j];
            }

            atb[i] += row[i] * value;
        }
    }

    solve(ata, atb)
}

/// Evaluate `sum(ci * x^i)` by Horner's rule.
pub fn evaluate(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0., |acc, &c| acc * x + c)
}

/// Sum of squared residuals of `coeffs` against the observations, taken
/// in the series' own order so it matches what `fit` consumed.
pub fn residual_sum_of_squares(coeffs: &[f64], series: &[(usize, f64)]) -> f64 {
    series
        .iter()
        .map(|&(index, value)| evaluate(coeffs, index as f64) - value)
        .map(|r| r * r)
        .sum()
}

// Gaussian elimination with partial pivoting
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, FitError> {
    let n = b.len();

    for col in 0..n {
        let mut pivot = col;

        for row in col + 1..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }

        if a[pivot][col].abs() < 1e-12 {
            return Err(FitError::SingularSystem);
        }

        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];

            for j in col..n {
                a[row][j] -= factor * a[col][j];
            }

            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.; n];

    for i in (0..n).rev() {
        let tail: f64 = (i + 1..n).map(|j| a[i][j] * x[j]).sum();
        x[i] = (b[i] - tail) / a[i][i];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn exact_points_reproduce_the_polynomial() {
        // 1 + 2x + 3x^2 sampled at exactly degree + 1 points
        let series: Vec<_> = (0..3)
            .map(|i| (i, evaluate(&[1., 2., 3.], i as f64)))
            .collect();
        let coeffs = fit(&series, 2).unwrap();

        assert_eq!(coeffs.len(), 3);
        assert_abs_diff_eq!(coeffs[0], 1., epsilon = 1e-6);
        assert_abs_diff_eq!(coeffs[1], 2., epsilon = 1e-6);
        assert_abs_diff_eq!(coeffs[2], 3., epsilon = 1e-6);
    }

    #[test]
    fn overdetermined_noiseless_fit_is_still_exact() {
        let series: Vec<_> = (0..12)
            .map(|i| (i, evaluate(&[-0.5, 0.25], i as f64)))
            .collect();
        let coeffs = fit(&series, 1).unwrap();

        assert_abs_diff_eq!(coeffs[0], -0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(coeffs[1], 0.25, epsilon = 1e-9);
    }

    #[test]
    fn too_few_observations_fail_cleanly() {
        let series = vec![(0, 1.), (1, 2.)];

        match fit(&series, 2) {
            Err(FitError::InsufficientData { found, required }) => {
                assert_eq!(found, 2);
                assert_eq!(required, 3);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn empty_series_fails_cleanly() {
        assert!(matches!(
            fit(&[], 1),
            Err(FitError::InsufficientData { found: 0, required: 2 })
        ));
    }

    #[test]
    fn residual_is_zero_for_a_perfect_fit_and_positive_otherwise() {
        let series: Vec<_> = (0..6).map(|i| (i, 2. + 0.5 * i as f64)).collect();
        let coeffs = fit(&series, 1).unwrap();

        assert_abs_diff_eq!(residual_sum_of_squares(&coeffs, &series), 0., epsilon = 1e-18);

        let mut perturbed = series.clone();
        perturbed[3].1 += 0.1;

        assert!(residual_sum_of_squares(&coeffs, &perturbed) > 0.);
    }

    #[test]
    fn horner_evaluation_matches_the_expanded_sum() {
        assert_abs_diff_eq!(evaluate(&[1., -2., 0.5], 3.), 1. - 6. + 4.5);
        assert_abs_diff_eq!(evaluate(&[], 3.), 0.);
    }
}
