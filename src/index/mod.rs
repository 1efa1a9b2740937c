//! The unit index: symbol resolution, expression parsing, matching and interning over a catalog.
//!
//! Derived views (simple units, the symbol map, kinds by dimension vector) are computed on first
//! use and cached. Reads are safe to share once warmed; anything that registers or prefers a
//! unit takes `&mut self`.

pub mod matcher;
pub mod parser;
pub mod registry;

pub use registry::RuntimeRegistry;

use crate::catalog::{Catalog, QuantityKind};
use crate::dimension::DimensionVector;
use crate::error::{QudtError, Result};
use crate::unit::literal::expand_uri;
use crate::unit::symbols::{is_composite_symbol, to_keyboard_chars};
use crate::unit::{LiteralUnit, Unit, UNIT_VOCAB};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Catalog units preferred for their dimension vector whenever they are present.
const SEEDED_PREFERRED: [&str; 3] = ["UNITLESS", "K", "L"];

pub const DEFAULT_NAMESPACE: &str = "http://example.org/units#";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    /// Unit URIs (or unit-vocabulary local names) preferred on top of the seeded defaults.
    pub preferred_units: Vec<String>,
    /// Namespace for units synthesized by [`UnitIndex::intern`].
    pub namespace: String,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self { preferred_units: Vec::new(), namespace: DEFAULT_NAMESPACE.to_string() }
    }
}

#[derive(Debug, Clone)]
pub struct UnitIndex {
    catalog: Arc<Catalog>,
    options: IndexOptions,
    preferred: HashMap<DimensionVector, Vec<Arc<LiteralUnit>>>,
    registry: RuntimeRegistry,
    simple_units: OnceLock<Vec<Arc<LiteralUnit>>>,
    symbol_map: OnceLock<HashMap<String, Arc<LiteralUnit>>>,
    kinds_by_dv: OnceLock<HashMap<DimensionVector, Vec<QuantityKind>>>,
}

impl UnitIndex {
    pub fn new(catalog: impl Into<Arc<Catalog>>) -> Self {
        let catalog = catalog.into();
        let mut index = UnitIndex {
            catalog: Arc::clone(&catalog),
            options: IndexOptions::default(),
            preferred: HashMap::new(),
            registry: RuntimeRegistry::default(),
            simple_units: OnceLock::new(),
            symbol_map: OnceLock::new(),
            kinds_by_dv: OnceLock::new(),
        };
        for name in SEEDED_PREFERRED {
            if let Some(unit) = catalog.unit_by_uri(&expand_uri(name.to_string(), UNIT_VOCAB)) {
                index.prefer_unit(Arc::clone(unit));
            }
        }
        index
    }

    /// Unknown preferred units are rejected rather than ignored.
    pub fn with_options(catalog: impl Into<Arc<Catalog>>, options: IndexOptions) -> Result<Self> {
        let mut index = Self::new(catalog);
        for uri in &options.preferred_units {
            let unit = index
                .catalog
                .unit_by_uri(&expand_uri(uri.clone(), UNIT_VOCAB))
                .cloned()
                .ok_or_else(|| QudtError::Catalog(format!("unknown preferred unit '{}'", uri)))?;
            index.prefer_unit(unit);
        }
        index.options = options;
        Ok(index)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// Registers `unit` as preferred for its dimension vector. Invalidates the symbol map, whose
    /// collision resolution depends on preferences.
    pub fn prefer_unit(&mut self, unit: Arc<LiteralUnit>) {
        let list = self.preferred.entry(*unit.dv()).or_default();
        if !list.iter().any(|p| **p == *unit) {
            list.push(unit);
        }
        self.symbol_map = OnceLock::new();
    }

    pub fn preferred_units(&self, dv: &DimensionVector) -> &[Arc<LiteralUnit>] {
        self.preferred.get(dv).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn is_preferred(&self, unit: &LiteralUnit) -> bool {
        self.preferred_units(unit.dv()).iter().any(|p| **p == *unit)
    }

    /// Catalog units that are neither powers nor explicit products or quotients (`km`, `N`, but
    /// not `m²` or `m/s`), excluding plain dimensionless numbers.
    pub fn simple_units(&self) -> &[Arc<LiteralUnit>] {
        self.simple_units.get_or_init(|| {
            self.catalog
                .units()
                .iter()
                .filter(|u| !is_composite_symbol(&to_keyboard_chars(u.symbol())))
                .filter(|u| !(u.dv().dimensionless() && u.conversion_multiplier() == 1.0))
                .cloned()
                .collect()
        })
    }

    /// Keyboard symbol to simple unit. Colliding symbols are resolved by, in order: an explicit
    /// preference, more quantity kinds for the unit's dimension vector, catalog order.
    /// Equivalent units sharing a symbol do not collide.
    pub fn simple_symbol_map(&self) -> &HashMap<String, Arc<LiteralUnit>> {
        self.symbol_map.get_or_init(|| {
            let simple = self.simple_units();
            let mut map: HashMap<String, Arc<LiteralUnit>> = HashMap::with_capacity(simple.len());
            for unit in simple {
                let key = to_keyboard_chars(unit.symbol());
                let Some(prev) = map.get(&key) else {
                    map.insert(key, Arc::clone(unit));
                    continue;
                };
                if prev.equivalent(unit) {
                    continue;
                }

                let (pref_unit, pref_prev) = (self.is_preferred(unit), self.is_preferred(prev));
                let (kinds_unit, kinds_prev) = (self.kind_count(unit.dv()), self.kind_count(prev.dv()));
                let (replace, rule) = if pref_unit != pref_prev {
                    (pref_unit, "preference")
                } else if kinds_unit > kinds_prev {
                    (true, "quantity kinds")
                } else {
                    (false, "catalog order")
                };

                let (kept, dropped) = if replace { (unit, prev) } else { (prev, unit) };
                log::debug!(
                    "Resolved symbol collision on '{}' by {}: kept <{}>, dropped <{}>",
                    key, rule, kept.label(), dropped.label()
                );
                if replace {
                    map.insert(key, Arc::clone(unit));
                }
            }
            map
        })
    }

    pub fn kinds_by_dimension_vector(&self) -> &HashMap<DimensionVector, Vec<QuantityKind>> {
        self.kinds_by_dv.get_or_init(|| {
            let mut grouped: HashMap<DimensionVector, Vec<QuantityKind>> = HashMap::new();
            for kind in self.catalog.quantity_kinds().iter() {
                grouped.entry(*kind.dimension_vector()).or_default().push(kind.clone());
            }
            grouped
        })
    }

    fn kind_count(&self, dv: &DimensionVector) -> usize {
        self.kinds_by_dimension_vector().get(dv).map_or(0, Vec::len)
    }

    /// Catalog units in catalog order, then runtime-registered units.
    pub fn units(&self) -> impl Iterator<Item = &Arc<LiteralUnit>> {
        self.catalog.units().iter().chain(self.registry.iter())
    }

    /// Looks up a unit by its raw or keyboard symbol. Candidates are ranked by preference, then
    /// by the number of quantity kinds for their dimension vector, then catalog order.
    pub fn predefined_unit_by_symbol(&self, symbol: &str) -> Option<Arc<LiteralUnit>> {
        self.units()
            .filter(|u| u.symbol() == symbol || to_keyboard_chars(u.symbol()) == symbol)
            .min_by(|a, b| {
                self.is_preferred(b)
                    .cmp(&self.is_preferred(a))
                    .then_with(|| self.kind_count(b.dv()).cmp(&self.kind_count(a.dv())))
            })
            .cloned()
    }

    pub fn unit_by_uri(&self, uri: &str) -> Option<Arc<LiteralUnit>> {
        self.catalog
            .unit_by_uri(uri)
            .or_else(|| self.registry.iter().find(|u| u.uri() == uri))
            .cloned()
    }

    /// The plain-number unit: the preferred dimensionless unit with multiplier one when the
    /// catalog has one, else the empty aggregate.
    pub fn unitless(&self) -> Unit {
        self.preferred_units(&DimensionVector::DIMENSIONLESS)
            .iter()
            .chain(self.catalog.units_with_index_code(&DimensionVector::DIMENSIONLESS.index_code()))
            .find(|u| u.conversion_multiplier() == 1.0 && u.conversion_offset() == 0.0)
            .map(|u| Unit::Literal(Arc::clone(u)))
            .unwrap_or_else(Unit::number)
    }
}
