//! Property-based tests for unit algebra and quantity arithmetic over the standard catalog.

use proptest::prelude::*;
use qudt_units_core::index::matcher::edit_distance;
use qudt_units_core::{AggregateUnit, Catalog, DimensionVector, QuantityValue, SmallFraction, Unit};
use std::sync::OnceLock;

fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(|| Catalog::standard().unwrap())
}

fn unit_at(i: usize) -> Unit {
    let units = catalog().units();
    Unit::from(units[i % units.len()].clone())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #[test]
    fn prop_scale_unscale_round_trip(i in any::<usize>(), value in -1.0e6..1.0e6f64) {
        let unit = unit_at(i);
        let back = unit.scale(unit.unscale(value));
        prop_assert!(close(back, value), "{} {} came back as {}", value, unit, back);
    }

    #[test]
    fn prop_combine_adds_dimension_vectors(i in any::<usize>(), j in any::<usize>(), ea in -3..=3i32, eb in -3..=3i32) {
        let (a, b) = (unit_at(i), unit_at(j));
        let combined = AggregateUnit::combine(&a, ea, &b, eb);
        let expected = DimensionVector::add(
            &a.dv().scaled_by(SmallFraction::from(ea)),
            &b.dv().scaled_by(SmallFraction::from(eb)),
        );
        prop_assert_eq!(combined.dv(), expected);
    }

    #[test]
    fn prop_multiply_then_divide_restores_quantity(
        i in any::<usize>(),
        j in any::<usize>(),
        x in 1.0e-3..1.0e3f64,
        y in 1.0e-3..1.0e3f64,
    ) {
        let q = QuantityValue::of_scaled(x, unit_at(i));
        let r = QuantityValue::of_scaled(y, unit_at(j));
        let back = q.multiply(&r).divide(&r);
        prop_assert!(back.unit().equivalent(q.unit()));
        prop_assert!(close(back.unscaled(), q.unscaled()));
    }

    #[test]
    fn prop_conversion_round_trip(i in any::<usize>(), j in any::<usize>(), value in -1.0e4..1.0e4f64) {
        let from = unit_at(i);
        let same_dimension = catalog().units_with_index_code(&from.dv().index_code());
        let to = Unit::from(same_dimension[j % same_dimension.len()].clone());

        let q = QuantityValue::of_scaled(value, from.clone());
        let back = q.converted(to).unwrap().converted(from).unwrap();
        prop_assert!(close(back.value(), value));
    }

    #[test]
    fn prop_approximate_recovers_small_fractions(num in -16..=16i32, denom in 1..=8i32) {
        let exact = SmallFraction::new(num, denom);
        prop_assert_eq!(SmallFraction::approximate(exact.to_f64()), exact);
        prop_assert_eq!(exact.reduced(), exact);
    }

    #[test]
    fn prop_edit_distance_is_a_bounded_symmetric_metric(x in "[a-z*/0-9]{0,8}", y in "[a-z*/0-9]{0,8}") {
        let d = edit_distance(&x, &y);
        prop_assert_eq!(d, edit_distance(&y, &x));
        prop_assert!(d <= x.chars().count().max(y.chars().count()));
        prop_assert_eq!(edit_distance(&x, &x), 0);
    }
}
