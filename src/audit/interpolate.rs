/// Clamp-and-scale `value` from `[x0, x1]` onto `[y0, y1]`.
///
/// Returns `y0` at or below `x0` (NaN included) and `y1` at or above `x1`.
/// Callers must not pass `x0 == x1`.
pub fn interpolate(value: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    debug_assert!(x1 != x0, "interpolation domain must not be empty");

    if value.is_nan() || value <= x0 {
        return y0;
    }
    if value >= x1 {
        return y1;
    }

    let t = (value - x0) / (x1 - x0);
    y0 + (y1 - y0) * t
}
