//! Binary search for the largest font size satisfying a fit predicate.
//!
//! Every height model (wrapped text, bullet lists, tables) shrinks through
//! this one search, so they all agree on grid and determinism.

/// Search granularity in points.
pub const FONT_SIZE_STEP: f64 = 0.5;

/// Largest size on the half-point grid within `[min_pt, max_pt]` for which
/// `fits` holds, or `None` if content does not fit even at `min_pt`.
///
/// `min_pt` itself is always a candidate even when it is off the grid. The
/// predicate is assumed monotone (if a size fits, every smaller size fits),
/// and is evaluated `O(log((max_pt - min_pt) / step))` times.
pub fn largest_fitting_size(
    min_pt: f64,
    max_pt: f64,
    mut fits: impl FnMut(f64) -> bool,
) -> Option<f64> {
    if !min_pt.is_finite() || !max_pt.is_finite() || min_pt > max_pt || min_pt <= 0.0 {
        return None;
    }
    if !fits(min_pt) {
        return None;
    }

    let mut best = min_pt;
    let mut lo = (min_pt / FONT_SIZE_STEP).ceil() as i64;
    let mut hi = (max_pt / FONT_SIZE_STEP).floor() as i64;
    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        let size = mid as f64 * FONT_SIZE_STEP;
        if fits(size) {
            if size > best {
                best = size;
            }
            lo = mid + 1;
        } else {
            hi = mid - 1;
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_threshold_on_grid() {
        let size = largest_fitting_size(8.0, 36.0, |s| s <= 17.3);
        assert_eq!(size, Some(17.0));
    }

    #[test]
    fn test_everything_fits_returns_max() {
        assert_eq!(largest_fitting_size(8.0, 18.0, |_| true), Some(18.0));
    }

    #[test]
    fn test_min_overflow_is_none() {
        assert_eq!(largest_fitting_size(10.0, 18.0, |s| s < 9.0), None);
    }

    #[test]
    fn test_off_grid_min_is_a_candidate() {
        assert_eq!(largest_fitting_size(9.3, 9.4, |_| true), Some(9.3));
        assert_eq!(largest_fitting_size(9.3, 20.0, |s| s < 9.5), Some(9.3));
    }

    #[test]
    fn test_never_exceeds_max() {
        let size = largest_fitting_size(6.0, 12.25, |_| true).unwrap();
        assert!(size <= 12.25);
    }

    #[test]
    fn test_logarithmic_evaluations() {
        let mut calls = 0;
        largest_fitting_size(1.0, 200.0, |s| {
            calls += 1;
            s < 50.0
        });
        assert!(calls <= 12, "{calls} evaluations");
    }

    #[test]
    fn test_invalid_ranges() {
        assert_eq!(largest_fitting_size(20.0, 10.0, |_| true), None);
        assert_eq!(largest_fitting_size(f64::NAN, 10.0, |_| true), None);
        assert_eq!(largest_fitting_size(0.0, 10.0, |_| true), None);
    }
}
