// Linear scale transforms from data domains onto drawing coordinates

/// Map `value` from `[domain_min, domain_max]` onto `[range_min, range_max]`.
///
/// A flat domain (`domain_max == domain_min`) uses a span of `1` so nothing
/// divides by zero; every value then lands at or near `range_min`.
pub fn scale(value: f64, domain_min: f64, domain_max: f64, range_min: f64, range_max: f64) -> f64 {
    let span = domain_max - domain_min;
    let span = if span == 0.0 { 1.0 } else { span };
    range_min + (value - domain_min) / span * (range_max - range_min)
}

/// Position of the `index`-th of `count` evenly spaced points.
///
/// A single point sits at `range_min`.
pub fn scale_index(index: usize, count: usize, range_min: f64, range_max: f64) -> f64 {
    let last = count.saturating_sub(1).max(1) as f64;
    range_min + (index as f64 / last) * (range_max - range_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_endpoints_and_midpoint() {
        assert_eq!(scale(40.0, 40.0, 250.0, 0.0, 100.0), 0.0);
        assert_eq!(scale(250.0, 40.0, 250.0, 0.0, 100.0), 100.0);
        assert_eq!(scale(145.0, 40.0, 250.0, 0.0, 100.0), 50.0);
    }

    #[test]
    fn test_scale_inverted_range() {
        // SVG y grows downwards: domain min maps to the bottom edge
        assert_eq!(scale(80.0, 80.0, 180.0, 280.0, 20.0), 280.0);
        assert_eq!(scale(180.0, 80.0, 180.0, 280.0, 20.0), 20.0);
    }

    #[test]
    fn test_scale_flat_domain() {
        let y = scale(5.0, 5.0, 5.0, 280.0, 20.0);
        assert!(y.is_finite());
        assert_eq!(y, 280.0);
    }

    #[test]
    fn test_scale_index() {
        assert_eq!(scale_index(0, 1, 20.0, 780.0), 20.0);
        assert_eq!(scale_index(0, 0, 20.0, 780.0), 20.0);
        assert_eq!(scale_index(0, 5, 20.0, 780.0), 20.0);
        assert_eq!(scale_index(4, 5, 20.0, 780.0), 780.0);
        assert_eq!(scale_index(2, 5, 20.0, 780.0), 400.0);
    }
}
