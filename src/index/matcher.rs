//! matcher.rs
//! Finding catalog (or runtime) literals that stand for a given unit.

use super::UnitIndex;
use crate::error::Result;
use crate::unit::symbols::to_keyboard_chars;
use crate::unit::{LiteralUnit, Unit};
use std::sync::Arc;

/// Levenshtein distance over chars; substitution, insertion and deletion all cost one.
pub fn edit_distance(x: &str, y: &str) -> usize {
    let y: Vec<char> = y.chars().collect();
    let mut prev: Vec<usize> = (0..=y.len()).collect();
    let mut row = vec![0; y.len() + 1];

    for (i, xc) in x.chars().enumerate() {
        row[0] = i + 1;
        for (j, yc) in y.iter().enumerate() {
            let substitution = prev[j] + usize::from(xc != *yc);
            row[j + 1] = substitution.min(prev[j + 1] + 1).min(row[j] + 1);
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[y.len()]
}

fn closest_exact<'a>(
    candidates: impl Iterator<Item = &'a Arc<LiteralUnit>>,
    target: &str,
    multiplier: f64,
    offset: f64,
) -> Option<Arc<LiteralUnit>> {
    candidates
        .filter(|c| c.conversion_multiplier() == multiplier && c.conversion_offset() == offset)
        .map(|c| {
            let symbol = to_keyboard_chars(c.symbol());
            let distance = if symbol == target { 0 } else { edit_distance(target, &symbol) };
            ((distance, c.symbol().chars().count()), c)
        })
        .min_by(|(ka, a), (kb, b)| ka.cmp(kb).then_with(|| a.symbol().cmp(b.symbol())))
        .map(|(_, c)| Arc::clone(c))
}

impl UnitIndex {
    /// A literal with exactly the same multiplier and offset (and therefore dimension) as `unit`.
    ///
    /// Literals are returned as-is. Otherwise the preferred units for the dimension vector are
    /// searched first, then the catalog and runtime units sharing its index code. Ties go to the
    /// symbol closest to `unit`'s rendered symbol, then the shorter symbol, then the
    /// lexicographically smaller one.
    pub fn exact_match(&self, unit: &Unit) -> Option<Arc<LiteralUnit>> {
        if let Unit::Literal(lu) = unit {
            return Some(Arc::clone(lu));
        }

        let dv = unit.dv();
        let target = to_keyboard_chars(&unit.symbol());
        let (multiplier, offset) = (unit.conversion_multiplier(), unit.conversion_offset());

        if let Some(hit) = closest_exact(self.preferred_units(&dv).iter(), &target, multiplier, offset) {
            return Some(hit);
        }
        let code = dv.index_code();
        let candidates = self.catalog.units_with_index_code(&code).iter().chain(self.registry.bucket(&code));
        closest_exact(candidates, &target, multiplier, offset)
    }

    /// Parses `expression` and returns the exactly matching literal if there is one, else the
    /// parsed aggregate.
    pub fn exact_match_symbol(&self, expression: &str) -> Result<Unit> {
        let unit = Unit::from(self.parse_as_aggregate_unit(expression)?);
        Ok(self.exact_match(&unit).map(Unit::from).unwrap_or(unit))
    }

    /// The catalog or runtime literal of the same dimension whose multiplier is closest to
    /// `unit`'s on a log scale, ties going to the shorter symbol (`L` over `dm³`). None only when
    /// nothing shares the dimension vector.
    pub fn best_predefined_match(&self, unit: &Unit) -> Option<Arc<LiteralUnit>> {
        if let Unit::Literal(lu) = unit {
            return Some(Arc::clone(lu));
        }

        let code = unit.dv().index_code();
        let base = unit.conversion_multiplier().ln();
        self.catalog
            .units_with_index_code(&code)
            .iter()
            .chain(self.registry.bucket(&code))
            .map(|c| ((c.conversion_multiplier().ln() - base).abs(), c))
            .min_by(|(da, a), (db, b)| {
                da.total_cmp(db).then_with(|| a.symbol().chars().count().cmp(&b.symbol().chars().count()))
            })
            .map(|(_, c)| Arc::clone(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::collisions;
    use crate::unit::AggregateUnit;
    use rstest::rstest;

    #[rstest]
    #[case("", "", 0)]
    #[case("kitten", "sitting", 3)]
    #[case("m", "", 1)]
    #[case("kg*m/s2", "kg*m*s-2", 2)]
    #[case("s-1", "/s", 3)]
    #[case("μm", "um", 1)]
    fn test_edit_distance(#[case] x: &str, #[case] y: &str, #[case] expected: usize) {
        assert_eq!(edit_distance(x, y), expected);
        assert_eq!(edit_distance(y, x), expected);
    }

    #[test]
    fn test_literal_is_its_own_match() {
        let index = collisions();
        let minim = index.unit_by_uri("http://qudt.org/vocab/unit/MINIM").unwrap();
        let unit = Unit::from(Arc::clone(&minim));
        assert!(Arc::ptr_eq(&index.exact_match(&unit).unwrap(), &minim));
        assert!(Arc::ptr_eq(&index.best_predefined_match(&unit).unwrap(), &minim));
    }

    #[test]
    fn test_exact_match_prefers_preferred_units() {
        let index = collisions();
        let m = Unit::from(index.unit_by_uri("http://qudt.org/vocab/unit/M").unwrap());
        let m3 = Unit::from(AggregateUnit::of(&m, 3));
        assert_eq!(index.exact_match(&m3).unwrap().symbol(), "m³");

        let litre = index.exact_match_symbol("L").unwrap();
        assert_eq!(litre.as_literal().map(|u| u.label()), Some("Litre"));
    }

    #[test]
    fn test_exact_match_full_ties_keep_catalog_order() {
        // SEC and SEC2 are equivalent and share a symbol; the first in catalog order wins.
        let index = collisions();
        let s = index.exact_match_symbol("s").unwrap();
        assert_eq!(s.as_literal().map(|u| u.label()), Some("Second"));
    }

    #[test]
    fn test_exact_match_requires_identical_multiplier() {
        let index = collisions();
        let m = Unit::from(index.unit_by_uri("http://qudt.org/vocab/unit/M").unwrap());
        let m2 = Unit::from(AggregateUnit::of(&m, 2));
        assert!(index.exact_match(&m2).is_none());

        let unit = index.exact_match_symbol("m2").unwrap();
        assert!(unit.as_aggregate().is_some());
        assert_eq!(unit.symbol(), "m²");
    }

    #[test]
    fn test_best_predefined_match_by_log_multiplier() {
        let index = collisions();
        let mi = Unit::from(index.unit_by_uri("http://qudt.org/vocab/unit/MI").unwrap());
        let m = Unit::from(index.unit_by_uri("http://qudt.org/vocab/unit/M").unwrap());

        // Every volume in the catalog is smaller than a cubic mile; m³ is the nearest.
        let cubic_miles = Unit::from(AggregateUnit::of(&mi, 3));
        assert_eq!(index.best_predefined_match(&cubic_miles).unwrap().symbol(), "m³");

        let cubic_metres = Unit::from(AggregateUnit::combine(&m, 2, &m, 1));
        assert_eq!(index.best_predefined_match(&cubic_metres).unwrap().symbol(), "m³");

        let ratio = Unit::from(AggregateUnit::combine(&m, 1, &m, -1));
        let best = index.best_predefined_match(&ratio).unwrap();
        assert_eq!(best.uri(), "http://qudt.org/vocab/unit/UNITLESS");

        let nothing = Unit::from(AggregateUnit::of(&m, 7));
        assert!(index.best_predefined_match(&nothing).is_none());
    }
}
