//! registry.rs
//! Runtime-registered literals: the interning cache behind `demand_exact_literal`.
//!
//! Units are bucketed by dimension-vector index code so a lookup only scans the handful of
//! units sharing a dimension, never the whole registry.

use super::UnitIndex;
use crate::error::Result;
use crate::unit::symbols::to_keyboard_chars;
use crate::unit::{AggregateUnit, LiteralUnit, Unit};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct RuntimeRegistry {
    by_index_code: HashMap<String, Vec<Arc<LiteralUnit>>>,
    count: usize,
}

impl RuntimeRegistry {
    /// Adds `unit` unless an equal one (same symbol, dimension, multiplier and offset) is already
    /// registered, and returns the registered instance either way.
    pub fn register(&mut self, unit: LiteralUnit) -> Arc<LiteralUnit> {
        let bucket = self.by_index_code.entry(unit.dv().index_code()).or_default();
        if let Some(existing) = bucket.iter().find(|u| ***u == unit) {
            return Arc::clone(existing);
        }
        let unit = Arc::new(unit);
        bucket.push(Arc::clone(&unit));
        self.count += 1;
        unit
    }

    pub fn bucket(&self, index_code: &str) -> &[Arc<LiteralUnit>] {
        self.by_index_code.get(index_code).map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<LiteralUnit>> {
        self.by_index_code.values().flatten()
    }

    pub fn len(&self) -> usize { self.count }
    pub fn is_empty(&self) -> bool { self.count == 0 }
}

impl UnitIndex {
    pub fn registry(&self) -> &RuntimeRegistry {
        &self.registry
    }

    pub fn register_unit(&mut self, unit: LiteralUnit) -> Arc<LiteralUnit> {
        self.registry.register(unit)
    }

    /// Rewrites `unit` over simple units only. A literal is re-parsed from its symbol and kept
    /// as-is when that symbol is not an expression equivalent to it (`#`, `J/(kg⋅K)`, or a
    /// symbol another unit owns in the symbol map).
    pub fn decompose_as_aggregate(&self, unit: &Unit) -> AggregateUnit {
        match unit {
            Unit::Literal(lu) => self.decompose_literal(lu),
            Unit::Aggregate(agg) => agg.components().fold(AggregateUnit::empty(), |acc, (lu, exp)| {
                acc.times(&Unit::from(self.decompose_literal(lu)), exp)
            }),
        }
    }

    fn decompose_literal(&self, lu: &Arc<LiteralUnit>) -> AggregateUnit {
        match self.parse_as_aggregate_unit(lu.symbol()) {
            Ok(parsed)
                if parsed.dv() == *lu.dv()
                    && parsed.conversion_multiplier() == lu.conversion_multiplier()
                    && parsed.conversion_offset() == lu.conversion_offset() =>
            {
                parsed
            }
            _ => AggregateUnit::of(&Unit::Literal(Arc::clone(lu)), 1),
        }
    }

    /// The exactly matching literal for `unit`, synthesizing and registering one under
    /// `namespace` when none exists. Repeated demands for an equivalent unit return the same
    /// instance.
    pub fn demand_exact_literal(&mut self, unit: &Unit, namespace: &str) -> Arc<LiteralUnit> {
        if let Some(hit) = self.exact_match(unit) {
            return hit;
        }

        let symbol = self.decompose_as_aggregate(unit).symbol();
        let uri = format!("{}{}", namespace, to_keyboard_chars(&symbol));
        log::debug!("Interning unit '{}' as <{}>", symbol, uri);
        self.registry.register(LiteralUnit::new(
            symbol.clone(),
            uri,
            symbol,
            unit.dv(),
            unit.conversion_offset(),
            unit.conversion_multiplier(),
        ))
    }

    pub fn demand_exact_literal_symbol(&mut self, expression: &str, namespace: &str) -> Result<Arc<LiteralUnit>> {
        let unit = self.exact_match_symbol(expression)?;
        Ok(self.demand_exact_literal(&unit, namespace))
    }

    /// [`demand_exact_literal`](Self::demand_exact_literal) under the configured namespace.
    pub fn intern(&mut self, unit: &Unit) -> Arc<LiteralUnit> {
        let namespace = self.options.namespace.clone();
        self.demand_exact_literal(unit, &namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::DimensionVector;
    use crate::index::tests::collisions;

    const NS: &str = "http://example.com/test#";

    #[test]
    fn test_register_dedupes_equal_units() {
        let mut registry = RuntimeRegistry::default();
        let dv = DimensionVector::builder().with_length(4).build();
        let a = registry.register(LiteralUnit::new("m⁴", "http://x#m4", "m⁴", dv, 0.0, 1.0));
        let b = registry.register(LiteralUnit::new("quartic", "http://y#m4", "m⁴", dv, 0.0, 1.0));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);

        let c = registry.register(LiteralUnit::new("m⁴", "http://x#m4", "m⁴", dv, 0.0, 2.0));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.bucket("L4").len(), 2);
        assert!(registry.bucket("L5").is_empty());
    }

    #[test]
    fn test_decompose_literal_and_aggregate() {
        let index = collisions();
        let m3 = Unit::from(index.unit_by_uri("http://qudt.org/vocab/unit/M3").unwrap());
        let decomposed = index.decompose_as_aggregate(&m3);
        assert_eq!(decomposed.symbol(), "m³");
        assert_eq!(decomposed.len(), 1);

        let per_m3 = Unit::from(AggregateUnit::of(&m3, -1));
        assert_eq!(index.decompose_as_aggregate(&per_m3).symbol(), "m⁻³");
    }

    #[test]
    fn test_decompose_keeps_literals_that_do_not_parse_to_themselves() {
        let index = collisions();
        // "1" is not an expression.
        let unitless = Unit::from(index.unit_by_uri("http://qudt.org/vocab/unit/UNITLESS").unwrap());
        assert_eq!(index.decompose_as_aggregate(&unitless).symbol(), "1");

        // "L" resolves to litre in the symbol map, not to lambert.
        let lambert = Unit::from(index.unit_by_uri("http://qudt.org/vocab/unit/LA").unwrap());
        let decomposed = index.decompose_as_aggregate(&lambert);
        assert_eq!(decomposed.trivial_to_literal().map(|u| u.label()), Some("Lambert"));
    }

    #[test]
    fn test_demand_returns_existing_matches() {
        let mut index = collisions();
        let m = Unit::from(index.unit_by_uri("http://qudt.org/vocab/unit/M").unwrap());
        let cube = Unit::from(AggregateUnit::of(&m, 3));
        let hit = index.demand_exact_literal(&cube, NS);
        assert_eq!(hit.uri(), "http://qudt.org/vocab/unit/M3");
        assert!(index.registry().is_empty());
    }

    #[test]
    fn test_demand_interns_once() {
        let mut index = collisions();
        let m = Unit::from(index.unit_by_uri("http://qudt.org/vocab/unit/M").unwrap());
        let s = Unit::from(index.unit_by_uri("http://qudt.org/vocab/unit/SEC").unwrap());
        let velocity = Unit::from(AggregateUnit::combine(&m, 1, &s, -1));

        let first = index.demand_exact_literal(&velocity, NS);
        assert_eq!(first.symbol(), "m⋅s⁻¹");
        assert_eq!(first.label(), "m⋅s⁻¹");
        assert_eq!(first.uri(), "http://example.com/test#m*s-1");
        assert_eq!(*first.dv(), DimensionVector::builder().with_length(1).with_time(-1).build());

        let again = index.demand_exact_literal_symbol("m/s", NS).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(index.registry().len(), 1);
        assert!(index.unit_by_uri("http://example.com/test#m*s-1").is_some());
        assert_eq!(index.units().count(), index.catalog().units().len() + 1);
    }

    #[test]
    fn test_intern_uses_configured_namespace() {
        let mut index = collisions();
        let m = Unit::from(index.unit_by_uri("http://qudt.org/vocab/unit/M").unwrap());
        let quartic = Unit::from(AggregateUnit::of(&m, 4));
        let interned = index.intern(&quartic);
        assert_eq!(interned.uri(), "http://example.org/units#m4");
    }

    #[test]
    fn test_demand_propagates_parse_errors() {
        let mut index = collisions();
        assert!(index.demand_exact_literal_symbol("furlong/s", NS).is_err());
        assert!(index.registry().is_empty());
    }
}
