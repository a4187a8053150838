use crate::missing::MissingValue;

/// Median by selection: the element at index n/2 after partitioning.
///
/// For even n this returns the upper of the two central values (no
/// interpolation), so [1, 2, 3, 4] gives 3.
///
/// Returns: 0 for an empty input
pub fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    // 0/0 yields a negative NaN on common targets and total_cmp would sort it
    // first; clearing the sign puts every NaN after the numbers
    for v in values.iter_mut().filter(|v| v.is_nan()) {
        *v = v.abs();
    }
    let mid = values.len() / 2;
    let (_, nth, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    *nth
}

/// Read a raw count, mapping the missing sentinel to NaN
pub fn count_value(value: i32) -> f64 {
    if value.is_missing() {
        f64::NAN
    } else {
        value as f64
    }
}

/// Fraction of supporting reads
/// support = ALT / (ALT + REF)
///
/// A zero denominator is not trapped; the result is NaN.
pub fn support_ratio(alt: f64, reference: f64) -> f64 {
    alt / (alt + reference)
}

/// Read-depth ratio of the SV region against its flanks
/// ratio = RC / (RCL + RCR)
pub fn depth_ratio(rc: f64, left: f64, right: f64) -> f64 {
    rc / (left + right)
}
