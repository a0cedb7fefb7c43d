//! Value axis tick placement.

/// Number of major ticks aimed for on the value axis.
pub const MAJOR_TICKS: usize = 11;

const STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Round tick positions within `[lo, hi]`, at most `max_ticks` of them.
///
/// The step is the smallest of 1, 2, 2.5, 5 or 10 times a power of ten that
/// keeps the count within bounds.
pub fn nice_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<f64> {
    if !(hi > lo) || !lo.is_finite() || !hi.is_finite() {
        return vec![lo];
    }
    let intervals = max_ticks.saturating_sub(1).max(1) as f64;
    let raw = (hi - lo) / intervals;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = STEPS
        .iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude);

    let first = (lo / step - 1e-9).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}
