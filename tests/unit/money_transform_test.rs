// Property-based tests for the money storage transform
//
// Major units in, cents at rest, major units out: values with at most two fractional
// digits survive exactly; anything finer is rounded half-up once on the way in.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use stockroom::core::money::{from_storage, to_storage};
use stockroom::core::AppError;

#[test]
fn test_documented_examples() {
    assert_eq!(to_storage(dec!(10.50)).unwrap(), 1050);
    assert_eq!(to_storage(dec!(25.99)).unwrap(), 2599);
    assert_eq!(from_storage(1050), dec!(10.50));
    assert_eq!(from_storage(2599), dec!(25.99));
    assert_eq!(to_storage(dec!(50.00)).unwrap(), 5000);
    assert_eq!(to_storage(dec!(75.00)).unwrap(), 7500);
    assert_eq!(to_storage(dec!(99.99)).unwrap(), 9999);
    assert_eq!(to_storage(dec!(1000.50)).unwrap(), 100050);
    assert_eq!(to_storage(dec!(5000.75)).unwrap(), 500075);
    assert_eq!(from_storage(9999), dec!(99.99));
    assert_eq!(from_storage(100050), dec!(1000.50));
    assert_eq!(from_storage(500075), dec!(5000.75));
}

#[test]
fn test_zero_is_zero_both_ways() {
    assert_eq!(to_storage(Decimal::ZERO).unwrap(), 0);
    assert_eq!(from_storage(0), Decimal::ZERO);
}

#[test]
fn test_third_digit_rounds_half_up() {
    assert_eq!(to_storage(dec!(10.505)).unwrap(), 1051);
    assert_eq!(to_storage(dec!(10.5049)).unwrap(), 1050);
    assert_eq!(to_storage(dec!(99.995)).unwrap(), 10000);
}

#[test]
fn test_integer_input_scales() {
    assert_eq!(to_storage(Decimal::from(42)).unwrap(), 4200);
}

#[test]
fn test_overflow_is_a_validation_error() {
    let result = to_storage(Decimal::MAX);
    assert!(matches!(result, Err(AppError::Validation(_))));
}

proptest! {
    #[test]
    fn test_two_place_values_round_trip_exactly(cents in 0i64..10_000_000_000i64) {
        let major = Decimal::new(cents, 2);

        let stored = to_storage(major).unwrap();
        prop_assert_eq!(stored, cents);
        prop_assert_eq!(from_storage(stored), major);
    }

    #[test]
    fn test_read_values_are_stable_under_rewrite(cents in 0i64..10_000_000_000i64) {
        let read = from_storage(cents);
        prop_assert_eq!(to_storage(read).unwrap(), cents);
    }

    #[test]
    fn test_rounding_error_is_at_most_half_a_cent(
        mills in 0i64..100_000_000_000i64
    ) {
        // Three fractional digits
        let value = Decimal::new(mills, 3);
        let stored = to_storage(value).unwrap();

        let diff = (from_storage(stored) - value).abs();
        prop_assert!(diff <= dec!(0.005), "{} stored as {} cents", value, stored);
    }

    #[test]
    fn test_transform_is_monotonic(a in 0i64..1_000_000_000i64, b in 0i64..1_000_000_000i64) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low = Decimal::new(low, 3);
        let high = Decimal::new(high, 3);

        prop_assert!(to_storage(low).unwrap() <= to_storage(high).unwrap());
    }
}
