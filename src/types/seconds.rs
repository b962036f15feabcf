//! Fixed-point stopwatch durations.
//!
//! ## Overview
//!
//! Lap and elapsed times are `rust_decimal::Decimal` seconds rounded to
//! two decimal places (hundredths, the stopwatch's display precision).
//! Averages are computed in decimal too, so `12.45 + 15.23` is exactly
//! `27.68` and statistics never drift.
//!
//! ## Rounding
//!
//! [`round_seconds`] uses banker's rounding (midpoint to even), the
//! `rust_decimal` default.
//!
//! ## Examples
//!
//! ```
//! use clock_ring::types::seconds::{to_seconds, format_clock};
//!
//! let lap = to_seconds("75.456").unwrap();
//! assert_eq!(lap.to_string(), "75.46");
//! assert_eq!(format_clock(lap), "01:15.46");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Decimal places kept for every duration
pub const DECIMAL_PLACES: u32 = 2;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Parse a decimal string of seconds
///
/// # Returns
///
/// * `Some(Decimal)` - the value rounded to hundredths
/// * `None` - if parsing fails or the value is negative
///
/// # Example
///
/// ```
/// use clock_ring::types::seconds::to_seconds;
///
/// assert_eq!(to_seconds("12.345").unwrap().to_string(), "12.34");
/// assert_eq!(to_seconds("-1"), None);
/// assert_eq!(to_seconds("abc"), None);
/// ```
pub fn to_seconds(s: &str) -> Option<Decimal> {
    let decimal = Decimal::from_str(s.trim()).ok()?;
    if decimal.is_sign_negative() {
        return None;
    }
    Some(round_seconds(decimal))
}

/// Convert a float of seconds, as sent by a stopwatch client
///
/// `None` for NaN, infinities and negative values.
pub fn seconds_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Decimal::from_f64(value).map(round_seconds)
}

/// Round to hundredths of a second
#[inline]
pub fn round_seconds(value: Decimal) -> Decimal {
    value.round_dp(DECIMAL_PLACES)
}

/// Render seconds as `MM:SS.ss`
///
/// Minutes are not capped, so an hour renders as `60:00.00`.
///
/// # Example
///
/// ```
/// use clock_ring::types::seconds::format_clock;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_clock(Decimal::new(1523, 2)), "00:15.23");
/// assert_eq!(format_clock(Decimal::new(6114, 2)), "01:01.14");
/// assert_eq!(format_clock(Decimal::ZERO), "00:00.00");
/// ```
pub fn format_clock(value: Decimal) -> String {
    let hundredths = (round_seconds(value) * Decimal::ONE_HUNDRED)
        .to_u64()
        .unwrap_or_default();
    let minutes = hundredths / 6000;
    let seconds = (hundredths % 6000) / 100;
    let fraction = hundredths % 100;
    format!("{minutes:02}:{seconds:02}.{fraction:02}")
}

// ============================================================================
// Arithmetic Functions
// ============================================================================

/// Mean of `total` over `count` items, rounded to hundredths
///
/// Returns `None` when `count` is zero.
pub fn checked_average(total: Decimal, count: usize) -> Option<Decimal> {
    if count == 0 {
        return None;
    }
    total.checked_div(Decimal::from(count)).map(round_seconds)
}

// ============================================================================
// Unit Tests
// ============================================================================
