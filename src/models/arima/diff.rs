//! Differencing utilities for ARIMA models.

/// Apply differencing to a series.
///
/// Each pass shortens the series by one; differencing stops early once a
/// single value is left.
///
/// # Arguments
/// * `series` - The input series
/// * `d` - Differencing order (number of times to difference)
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Reverse `d` rounds of differencing for values that continue `history`.
///
/// `differenced` holds future values on the `d`-times differenced scale; the
/// result continues `history` on the original scale.
///
/// # Arguments
/// * `differenced` - Future values of the differenced series
/// * `history` - The undifferenced series being continued
/// * `d` - Differencing order used
pub fn integrate(differenced: &[f64], history: &[f64], d: usize) -> Vec<f64> {
    if d == 0 {
        return differenced.to_vec();
    }

    // Anchor of each level: last value of the series differenced `level` times
    let anchors: Vec<f64> = (0..d)
        .map(|level| difference(history, level).last().copied().unwrap_or(0.0))
        .collect();

    anchors.iter().rev().fold(differenced.to_vec(), |values, &anchor| {
        values
            .iter()
            .scan(anchor, |level, v| {
                *level += v;
                Some(*level)
            })
            .collect()
    })
}

/// Coefficients of `(1 - B)^d` in increasing powers of the backshift operator.
pub fn difference_operator(d: usize) -> Vec<f64> {
    (0..d).fold(vec![1.0], |poly, _| {
        let mut next = vec![0.0; poly.len() + 1];
        for (i, c) in poly.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c;
        }
        next
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn difference_order_0() {
        let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(difference(&series, 0), series);
    }

    #[test]
    fn difference_order_1() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 1), vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn difference_order_2() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 2), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn difference_empty() {
        assert!(difference(&[], 1).is_empty());
    }

    #[test]
    fn integrate_reverses_difference() {
        let original = vec![10.0, 12.0, 15.0, 19.0, 24.0];
        let integrated = integrate(&[6.0, 7.0], &original, 1);

        // 24 + 6 = 30, 30 + 7 = 37
        assert_relative_eq!(integrated[0], 30.0, epsilon = 1e-10);
        assert_relative_eq!(integrated[1], 37.0, epsilon = 1e-10);
    }

    #[test]
    fn integrate_order_2_continues_quadratic() {
        // Second differences of i*i are constant 2
        let original: Vec<f64> = (0..6).map(|i| (i * i) as f64).collect();
        let integrated = integrate(&[2.0, 2.0, 2.0], &original, 2);
        assert_eq!(integrated, vec![36.0, 49.0, 64.0]);
    }

    #[test]
    fn integrate_order_0_is_identity() {
        assert_eq!(integrate(&[1.5, -0.5], &[3.0], 0), vec![1.5, -0.5]);
    }

    #[test]
    fn difference_operator_is_binomial() {
        assert_eq!(difference_operator(0), vec![1.0]);
        assert_eq!(difference_operator(1), vec![1.0, -1.0]);
        assert_eq!(difference_operator(2), vec![1.0, -2.0, 1.0]);
    }
}
