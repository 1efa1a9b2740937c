//! The read-only table of predefined units and quantity kinds.
//!
//! A catalog is produced by an external generator as JSON: quantity kinds, plus units grouped
//! by dimension-vector index code. Group order and in-group order define catalog order, which
//! is the final tie-break wherever the index has to choose between candidates.

pub mod kinds;

pub use kinds::{KindHierarchy, QuantityKind, QUANTITY_KIND_VOCAB};

use crate::dimension::DimensionVector;
use crate::error::{QudtError, Result};
use crate::unit::LiteralUnit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const STANDARD_CATALOG: &str = include_str!("../../data/standard_catalog.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    quantity_kinds: Vec<KindRecord>,
    #[serde(default)]
    units: Vec<UnitGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct KindRecord {
    label: String,
    uri: String,
    dimension_vector: DimensionVector,
    #[serde(default)]
    broader_kinds: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UnitGroup {
    dimension_vector: DimensionVector,
    units: Vec<UnitRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UnitRecord {
    label: String,
    uri: String,
    symbol: String,
    #[serde(default)]
    ucum_code: Option<String>,
    #[serde(default)]
    conversion_offset: f64,
    #[serde(default = "unit_multiplier")]
    conversion_multiplier: f64,
    #[serde(default)]
    quantity_kinds: Vec<String>,
}

fn unit_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    units: Vec<Arc<LiteralUnit>>,
    by_index_code: HashMap<String, Vec<Arc<LiteralUnit>>>,
    by_uri: HashMap<String, Arc<LiteralUnit>>,
    kinds: KindHierarchy,
}

impl Catalog {
    /// Builds a catalog from already-constructed records. Unit quantity-kind tags may be local
    /// names; they are expanded like kind URIs.
    pub fn new(units: Vec<LiteralUnit>, kinds: Vec<QuantityKind>) -> Result<Self> {
        let kinds = KindHierarchy::build(kinds)?;

        let mut catalog = Catalog { kinds, ..Default::default() };
        for unit in units {
            let tags: Vec<String> = unit
                .quantity_kinds()
                .iter()
                .map(|k| crate::unit::literal::expand_uri(k.clone(), QUANTITY_KIND_VOCAB))
                .collect();
            let unit = Arc::new(unit.with_quantity_kinds(tags));

            if catalog.by_uri.insert(unit.uri().to_string(), Arc::clone(&unit)).is_some() {
                return Err(QudtError::Catalog(format!("duplicate unit '{}'", unit.uri())));
            }
            catalog
                .by_index_code
                .entry(unit.dv().index_code())
                .or_default()
                .push(Arc::clone(&unit));
            catalog.units.push(unit);
        }

        log::info!(
            "Loaded unit catalog: {} units in {} dimension groups, {} quantity kinds",
            catalog.units.len(),
            catalog.by_index_code.len(),
            catalog.kinds.len()
        );
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;

        let kinds = file
            .quantity_kinds
            .into_iter()
            .map(|k| QuantityKind::new(k.label, k.uri, k.dimension_vector, k.broader_kinds))
            .collect();

        let units = file
            .units
            .into_iter()
            .flat_map(|group| {
                let dv = group.dimension_vector;
                group.units.into_iter().map(move |u| {
                    LiteralUnit::new(u.label, u.uri, u.symbol, dv, u.conversion_offset, u.conversion_multiplier)
                        .with_ucum_code(u.ucum_code)
                        .with_quantity_kinds(u.quantity_kinds)
                })
            })
            .collect();

        Self::new(units, kinds)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The bundled catalog: SI base and derived units, common prefixed and customary units,
    /// the temperature scales, and a small quantity-kind taxonomy.
    pub fn standard() -> Result<Self> {
        Self::from_json_str(STANDARD_CATALOG)
    }

    /// All units in catalog order.
    pub fn units(&self) -> &[Arc<LiteralUnit>] {
        &self.units
    }

    /// Units sharing a dimension-vector index code, in catalog order.
    pub fn units_with_index_code(&self, code: &str) -> &[Arc<LiteralUnit>] {
        self.by_index_code.get(code).map_or(&[], Vec::as_slice)
    }

    pub fn unit_by_uri(&self, uri: &str) -> Option<&Arc<LiteralUnit>> {
        self.by_uri.get(uri)
    }

    pub fn quantity_kinds(&self) -> &KindHierarchy {
        &self.kinds
    }

    /// Resolves a unit's kind tags; tags naming no known kind are skipped.
    pub fn kinds_of(&self, unit: &LiteralUnit) -> Vec<&QuantityKind> {
        unit.quantity_kinds().iter().filter_map(|uri| self.kinds.get(uri)).collect()
    }
}
