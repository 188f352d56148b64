//! Monetary value normalization.
//!
//! Product cost and price are exposed to callers as decimal major units (`10.50`) and
//! persisted as integer minor units (`1050`). Repositories call [`to_storage`] when
//! writing and [`from_storage`] when reading; nothing else touches the stored cents.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{AppError, Result};

/// Fractional digits kept in storage (cents).
pub const MINOR_UNIT_SCALE: u32 = 2;

const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Convert a major-unit decimal into stored minor units.
///
/// Inputs with more than two fractional digits are rounded half-up
/// (midpoint away from zero): `10.505` stores `1051`, `10.504` stores `1050`.
/// Values whose minor-unit form does not fit an `i64` are rejected.
pub fn to_storage(value: Decimal) -> Result<i64> {
    let rounded =
        value.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero);

    rounded
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| {
            AppError::validation(format!("Monetary value {} is out of range", value))
        })
}

/// Convert stored minor units back into a major-unit decimal with scale 2.
pub fn from_storage(stored: i64) -> Decimal {
    Decimal::new(stored, MINOR_UNIT_SCALE)
}

/// Format a major-unit value for display with exactly two decimal places.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value)
}
