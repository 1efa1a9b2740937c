//! Units of measure: catalog literals and the composite products built from them.
//!
//! `Unit` is the closed sum of the two shapes. Both answer the same questions (dimension,
//! multiplier, offset, symbol) so callers never need to know which one they hold.

pub mod aggregate;
pub mod literal;
pub mod symbols;

pub use aggregate::AggregateUnit;
pub use literal::{LiteralUnit, UNIT_VOCAB};

use crate::dimension::DimensionVector;
use literal::float_key;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Unit {
    Literal(Arc<LiteralUnit>),
    Aggregate(AggregateUnit),
}

impl Unit {
    /// The empty aggregate: the plain-number unit.
    pub fn number() -> Self {
        Unit::Aggregate(AggregateUnit::empty())
    }

    pub fn label(&self) -> Cow<'_, str> {
        match self {
            Unit::Literal(lu) => Cow::Borrowed(lu.label()),
            Unit::Aggregate(agg) => Cow::Owned(agg.label()),
        }
    }

    pub fn symbol(&self) -> Cow<'_, str> {
        match self {
            Unit::Literal(lu) => Cow::Borrowed(lu.symbol()),
            Unit::Aggregate(agg) => Cow::Owned(agg.symbol()),
        }
    }

    pub fn dv(&self) -> DimensionVector {
        match self {
            Unit::Literal(lu) => *lu.dv(),
            Unit::Aggregate(agg) => agg.dv(),
        }
    }

    pub fn conversion_multiplier(&self) -> f64 {
        match self {
            Unit::Literal(lu) => lu.conversion_multiplier(),
            Unit::Aggregate(agg) => agg.conversion_multiplier(),
        }
    }

    pub fn conversion_offset(&self) -> f64 {
        match self {
            Unit::Literal(lu) => lu.conversion_offset(),
            Unit::Aggregate(agg) => agg.conversion_offset(),
        }
    }

    pub fn as_literal(&self) -> Option<&Arc<LiteralUnit>> {
        match self {
            Unit::Literal(lu) => Some(lu),
            Unit::Aggregate(agg) => agg.trivial_to_literal(),
        }
    }

    pub fn as_aggregate(&self) -> Option<&AggregateUnit> {
        match self {
            Unit::Aggregate(agg) => Some(agg),
            Unit::Literal(_) => None,
        }
    }

    /// A dimensionless unit (number, percent, radian, ...).
    pub fn is_number(&self) -> bool {
        self.dv().dimensionless()
    }

    /// Dimensionless with multiplier one and no offset: interchangeable with a plain number.
    pub fn is_basic_number(&self) -> bool {
        self.is_number() && self.conversion_multiplier() == 1.0 && self.conversion_offset() == 0.0
    }

    /// Same shared catalog entry, or same dimension vector.
    pub fn is_convertible(&self, other: &Unit) -> bool {
        if let (Unit::Literal(a), Unit::Literal(b)) = (self, other) {
            if Arc::ptr_eq(a, b) {
                return true;
            }
        }
        self.dv() == other.dv()
    }

    /// Base (SI) value to a value in this unit.
    pub fn scale(&self, unscaled: f64) -> f64 {
        unscaled / self.conversion_multiplier() - self.conversion_offset()
    }

    /// A value in this unit to its base (SI) value.
    pub fn unscale(&self, scaled: f64) -> f64 {
        (scaled + self.conversion_offset()) * self.conversion_multiplier()
    }

    /// Same dimension, multiplier and offset, whatever the symbol or shape.
    pub fn equivalent(&self, other: &Unit) -> bool {
        self.dv() == other.dv()
            && self.conversion_multiplier() == other.conversion_multiplier()
            && self.conversion_offset() == other.conversion_offset()
    }
}

// Identity across shapes is the tuple (symbol, dimension vector, multiplier, offset), so a literal
// and a trivial aggregate wrapping it compare equal.
impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Unit::Literal(a), Unit::Literal(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => {
                self.symbol() == other.symbol()
                    && self.dv() == other.dv()
                    && float_key(self.conversion_multiplier()) == float_key(other.conversion_multiplier())
                    && float_key(self.conversion_offset()) == float_key(other.conversion_offset())
            }
        }
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol().hash(state);
        self.dv().hash(state);
        float_key(self.conversion_multiplier()).hash(state);
        float_key(self.conversion_offset()).hash(state);
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol())
    }
}

impl From<Arc<LiteralUnit>> for Unit {
    fn from(unit: Arc<LiteralUnit>) -> Self {
        Unit::Literal(unit)
    }
}

impl From<LiteralUnit> for Unit {
    fn from(unit: LiteralUnit) -> Self {
        Unit::Literal(Arc::new(unit))
    }
}

impl From<AggregateUnit> for Unit {
    fn from(unit: AggregateUnit) -> Self {
        Unit::Aggregate(unit)
    }
}
