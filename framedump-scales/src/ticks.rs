use framedump_common::types::repair_extent;
use framedump_common::Domain;
use serde::Serialize;

/// Number of significant decimal digits kept in tick values
const TICK_PRECISION: i32 = 10;

/// Scaled values at or above this magnitude carry no fractional part to round
const MAX_EXACT_SCALED: f64 = 1e15;

/// Generates `interval_count + 1` evenly spaced tick values spanning `[min, max]`.
///
/// Values are rounded to remove binary floating-point noise. At least two ticks
/// are always returned, and a span where `max <= min` is repaired the same way
/// a degenerate [`Domain`] axis is.
pub fn generate_ticks(min: f64, max: f64, interval_count: usize) -> Vec<f64> {
    let (min, max) = repair_extent(min, max);
    let intervals = interval_count.max(1);
    let step = (max - min) / intervals as f64;
    (0..=intervals)
        .map(|i| {
            if i == intervals {
                // Avoid drift on the final tick
                max
            } else {
                min + step * i as f64
            }
        })
        .map(|value| round_to_step(value, step))
        .collect()
}

/// Rounds a value to [`TICK_PRECISION`] significant digits of whichever of the
/// value and the step is smaller, so neighbouring ticks never round together
fn round_to_step(value: f64, step: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().min(step.abs().log10()).floor();
    if !magnitude.is_finite() {
        return value;
    }
    let factor = 10f64.powi(TICK_PRECISION - 1 - magnitude as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= MAX_EXACT_SCALED {
        return value;
    }
    let rounded = scaled.round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// Tick values for both axes of a domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTicks {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

pub fn axis_ticks(domain: &Domain, x_intervals: usize, y_intervals: usize) -> AxisTicks {
    AxisTicks {
        x: generate_ticks(domain.x_min(), domain.x_max(), x_intervals),
        y: generate_ticks(domain.y_min(), domain.y_max(), y_intervals),
    }
}
