use num::Float;

/// Evaluates the piecewise-linear curve through `knots`/`values` at `x`, holding the end
/// values flat outside the knot range.
///
/// Both slices must be non-empty, of equal length, with `knots` non-decreasing. A repeated
/// knot is a vertical jump: the exact-hit check runs before the interpolation fraction is
/// formed, so a zero-width segment is never divided by. A NaN `x` yields NaN.
pub(crate) fn interp_at<F: Float>(x: F, knots: &[F], values: &[F]) -> F {
    debug_assert!(!knots.is_empty());
    debug_assert_eq!(knots.len(), values.len());

    if x.is_nan() {
        return x;
    }

    let last = knots.len() - 1;

    // Base cases
    if x <= knots[0] {
        return values[0];
    }
    if x >= knots[last] {
        return values[last];
    }

    // x is not NaN and knots[0] < x < knots[last], so some knot at or past x exists and i >= 1
    let i = knots.partition_point(|k| *k < x);

    if x == knots[i] {
        return values[i];
    }

    let (x1, y1) = (knots[i - 1], values[i - 1]);
    let (x2, y2) = (knots[i], values[i]);
    let t = (x - x1) / (x2 - x1);

    y1 + t * (y2 - y1)
}

/// Similar to numpy.interp
pub(crate) fn interp<F: Float>(x_input: &[F], knots: &[F], values: &[F]) -> Vec<F> {
    x_input.iter().map(|x| interp_at(*x, knots, values)).collect()
}

#[test]
fn test_interp() {
    let x = [0., 1., 1.5, 2.72, 3.24];
    let xs = [1., 2., 3.];
    let ys = [3., 2., 0.];

    assert_eq!(interp(&x, &xs, &ys), vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let x = [2.5, -1., 7.5];
    let xs = [0., 1., 2., 3., 4.5];
    let ys = [0., 2., 5., 3., 2.];

    assert_eq!(interp(&x, &xs, &ys), vec![4., 0., 2.]);
}

#[test]
fn test_interp_vertical_jump() {
    let xs = [0., 1., 1., 2.];
    let ys = [0., 0., 1., 1.];

    // An exact hit on a repeated knot takes the first matching value
    assert_eq!(interp_at(1., &xs, &ys), 0.);
    assert_eq!(interp_at(0.5, &xs, &ys), 0.);
    assert_eq!(interp_at(1.5, &xs, &ys), 1.);
}

#[test]
fn test_interp_single_knot() {
    assert_eq!(interp_at(-3., &[2.], &[0.25]), 0.25);
    assert_eq!(interp_at(2., &[2.], &[0.25]), 0.25);
    assert_eq!(interp_at(9., &[2.], &[0.25]), 0.25);
}

#[test]
fn test_interp_nan() {
    let xs = [0., 1., 2.];
    let ys = [0., 1., 0.];

    assert!(interp_at(f64::NAN, &xs, &ys).is_nan());
    assert!(interp_at(f64::NAN, &[2.], &[0.25]).is_nan());
    assert_eq!(interp_at(f64::INFINITY, &xs, &ys), 0.);
    assert_eq!(interp_at(f64::NEG_INFINITY, &xs, &ys), 0.);
}
