//! Number-to-display conversion.
//!
//! Mirrors how a browser turns a number into text: shortest round-trip
//! digits, no trailing `.0`, and exponent notation outside `[1e-6, 1e21)`.

const EXPONENT_UPPER: f64 = 1e21;
const EXPONENT_LOWER: f64 = 1e-6;

/// Formats an evaluation result for the display
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // also covers -0
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (EXPONENT_LOWER..EXPONENT_UPPER).contains(&magnitude) {
        return value.to_string();
    }

    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}
