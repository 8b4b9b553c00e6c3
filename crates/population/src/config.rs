/// Edge length of one lot cell in metres.
pub const CELL_SIZE: f32 = 8.0;

/// Area of one lot cell in square metres.
pub const CELL_AREA: f32 = CELL_SIZE * CELL_SIZE;

/// Returned by population/workplace queries to mean "no override, let the host
/// use its own calculation". Never produced by a computation.
pub const HOST_NATIVE: u32 = u32::MAX;

/// Largest value a computation may return. Kept one below [`HOST_NATIVE`] so a
/// huge building can never be mistaken for the sentinel.
pub const MAX_COMPUTED: u32 = HOST_NATIVE - 1;

/// Every building houses or employs at least this many units.
pub const MIN_UNITS: u32 = 1;

/// Multipliers are clamped into this range when set.
pub const MIN_MULTIPLIER: f32 = 0.0;
pub const MAX_MULTIPLIER: f32 = 100.0;

/// Minimum legacy worker counts for special building kinds.
pub const MIN_WORKERS_EXTRACTOR: u32 = 3;
pub const MIN_WORKERS_GENERIC: u32 = 4;
pub const MIN_WORKERS_OFFICE: u32 = 10;

/// Returns true if `value` is the "defer to host" sentinel.
pub fn is_host_native(value: u32) -> bool {
    value == HOST_NATIVE
}

/// Round a raw unit count scaled by `multiplier` into the computed range,
/// flooring at [`MIN_UNITS`].
pub fn scale_and_clamp(raw: f64, multiplier: f32) -> u32 {
    let scaled = (raw * f64::from(multiplier)).round();
    if !scaled.is_finite() || scaled < f64::from(MIN_UNITS) {
        return MIN_UNITS;
    }
    if scaled >= f64::from(MAX_COMPUTED) {
        return MAX_COMPUTED;
    }
    scaled as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_area() {
        assert!((CELL_AREA - 64.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_scale_and_clamp_exact() {
        assert_eq!(scale_and_clamp(5.0, 1.0), 5);
        assert_eq!(scale_and_clamp(5.0, 2.0), 10);
    }

    #[test]
    fn test_scale_and_clamp_rounds_to_nearest() {
        assert_eq!(scale_and_clamp(5.0, 1.5), 8); // 7.5 rounds away from zero
        assert_eq!(scale_and_clamp(3.0, 1.1), 3);
    }

    #[test]
    fn test_scale_and_clamp_floors_at_one() {
        assert_eq!(scale_and_clamp(0.0, 1.0), 1);
        assert_eq!(scale_and_clamp(10.0, 0.0), 1);
        assert_eq!(scale_and_clamp(f64::NAN, 1.0), 1);
    }

    #[test]
    fn test_scale_and_clamp_never_returns_sentinel() {
        let v = scale_and_clamp(f64::from(u32::MAX) * 4.0, 1.0);
        assert_eq!(v, MAX_COMPUTED);
        assert!(!is_host_native(v));
    }
}
