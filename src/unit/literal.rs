//! literal.rs
//! Atomic, named units as they appear in the catalog (or as interned by the index).

use crate::dimension::DimensionVector;
use std::fmt;
use std::hash::{Hash, Hasher};

pub const UNIT_VOCAB: &str = "http://qudt.org/vocab/unit/";

#[derive(Debug, Clone)]
pub struct LiteralUnit {
    label: String,
    uri: String,
    symbol: String,
    ucum_code: Option<String>,
    dv: DimensionVector,
    conversion_offset: f64,
    conversion_multiplier: f64,
    quantity_kinds: Vec<String>,
}

impl LiteralUnit {
    /// Local names (`KiloM`) are expanded into the unit vocabulary; absolute URIs are kept.
    pub fn new(
        label: impl Into<String>,
        uri: impl Into<String>,
        symbol: impl Into<String>,
        dv: DimensionVector,
        conversion_offset: f64,
        conversion_multiplier: f64,
    ) -> Self {
        Self {
            label: label.into(),
            uri: expand_uri(uri.into(), UNIT_VOCAB),
            symbol: symbol.into(),
            ucum_code: None,
            dv,
            conversion_offset,
            conversion_multiplier,
            quantity_kinds: Vec::new(),
        }
    }

    pub fn with_quantity_kinds(mut self, kinds: Vec<String>) -> Self {
        self.quantity_kinds = kinds;
        self
    }

    pub fn with_ucum_code(mut self, code: Option<String>) -> Self {
        self.ucum_code = code;
        self
    }

    pub fn label(&self) -> &str { &self.label }
    pub fn uri(&self) -> &str { &self.uri }
    pub fn symbol(&self) -> &str { &self.symbol }
    pub fn ucum_code(&self) -> Option<&str> { self.ucum_code.as_deref() }
    pub fn dv(&self) -> &DimensionVector { &self.dv }
    pub fn conversion_offset(&self) -> f64 { self.conversion_offset }
    pub fn conversion_multiplier(&self) -> f64 { self.conversion_multiplier }

    /// Quantity-kind tags (URIs) this unit is associated with.
    pub fn quantity_kinds(&self) -> &[String] { &self.quantity_kinds }

    /// Same dimension, multiplier and offset: the two units are interchangeable.
    pub fn equivalent(&self, other: &LiteralUnit) -> bool {
        self.dv == other.dv
            && self.conversion_multiplier == other.conversion_multiplier
            && self.conversion_offset == other.conversion_offset
    }
}

pub(crate) fn expand_uri(uri: String, vocab: &str) -> String {
    if uri.starts_with("http") { uri } else { format!("{}{}", vocab, uri) }
}

/// Bit pattern used for float identity; folds `-0.0` into `0.0`.
pub(crate) fn float_key(x: f64) -> u64 {
    if x == 0.0 { 0 } else { x.to_bits() }
}

// Identity is the tuple (symbol, dimension vector, multiplier, offset).
impl PartialEq for LiteralUnit {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
            && self.dv == other.dv
            && float_key(self.conversion_multiplier) == float_key(other.conversion_multiplier)
            && float_key(self.conversion_offset) == float_key(other.conversion_offset)
    }
}

impl Eq for LiteralUnit {}

impl Hash for LiteralUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
        self.dv.hash(state);
        float_key(self.conversion_multiplier).hash(state);
        float_key(self.conversion_offset).hash(state);
    }
}

impl fmt::Display for LiteralUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}
