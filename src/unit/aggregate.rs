//! aggregate.rs
//! Composite units: a monomial product of literal units raised to rational exponents.
//!
//! Components are kept merged (one entry per literal unit) and pruned of zero exponents. The
//! dimension vector, multiplier, offset and symbol are derived on demand.

use super::literal::LiteralUnit;
use super::symbols::numbers_to_superscript;
use super::Unit;
use crate::dimension::{DimensionVector, SmallFraction};
use smallvec::SmallVec;
use std::sync::Arc;

type Components = SmallVec<[(Arc<LiteralUnit>, SmallFraction); 4]>;

#[derive(Debug, Clone, Default)]
pub struct AggregateUnit {
    components: Components,
}

impl AggregateUnit {
    /// The empty product: dimensionless, multiplier one.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `unit` raised to `exp`. Composite sources have every component exponent scaled by `exp`.
    pub fn of(unit: &Unit, exp: impl Into<SmallFraction>) -> Self {
        Self::empty().times(unit, exp.into())
    }

    /// `a^ea * b^eb`; division is `combine(a, 1, b, -1)`.
    pub fn combine(a: &Unit, ea: impl Into<SmallFraction>, b: &Unit, eb: impl Into<SmallFraction>) -> Self {
        Self::empty().times(a, ea.into()).times(b, eb.into())
    }

    /// General N-ary product of powers.
    pub fn from_powers<'a>(powers: impl IntoIterator<Item = (&'a Unit, SmallFraction)>) -> Self {
        powers.into_iter().fold(Self::empty(), |acc, (unit, exp)| acc.times(unit, exp))
    }

    /// Multiplies this product by `unit^exp`, merging shared components and pruning zeroes.
    pub fn times(mut self, unit: &Unit, exp: SmallFraction) -> Self {
        match unit {
            Unit::Literal(lu) => self.accumulate(lu, exp),
            Unit::Aggregate(agg) => {
                for (lu, lu_exp) in &agg.components {
                    self.accumulate(lu, (*lu_exp * exp).reduced());
                }
            }
        }
        self.components.retain(|(_, e)| !e.is_zero());
        self
    }

    fn accumulate(&mut self, unit: &Arc<LiteralUnit>, exp: SmallFraction) {
        match self.components.iter_mut().find(|(lu, _)| **lu == **unit) {
            Some((_, prev)) => *prev = (*prev + exp).reduced(),
            None => self.components.push((Arc::clone(unit), exp)),
        }
    }

    pub fn components(&self) -> impl Iterator<Item = (&Arc<LiteralUnit>, SmallFraction)> {
        self.components.iter().map(|(lu, e)| (lu, *e))
    }

    pub fn len(&self) -> usize { self.components.len() }
    pub fn is_empty(&self) -> bool { self.components.is_empty() }

    pub fn exponent_of(&self, unit: &LiteralUnit) -> Option<SmallFraction> {
        self.components.iter().find(|(lu, _)| **lu == *unit).map(|(_, e)| *e)
    }

    pub fn dv(&self) -> DimensionVector {
        self.components
            .iter()
            .map(|(lu, e)| lu.dv().scaled_by(*e))
            .fold(DimensionVector::DIMENSIONLESS, |acc, dv| DimensionVector::add(&acc, &dv))
    }

    pub fn conversion_multiplier(&self) -> f64 {
        self.components
            .iter()
            .map(|(lu, e)| lu.conversion_multiplier().powf(e.to_f64()))
            .product()
    }

    /// Only a product whose overall dimension is unary keeps an offset (the first component's).
    /// Multi-dimension composites never carry an additive offset.
    pub fn conversion_offset(&self) -> f64 {
        if self.dv().unary() {
            self.components.first().map_or(0.0, |(lu, _)| lu.conversion_offset())
        } else {
            0.0
        }
    }

    /// Components by descending exponent (ties by symbol), exponents other than one written as
    /// superscripts, joined with `⋅`.
    pub fn symbol(&self) -> String {
        let mut sorted: SmallVec<[&(Arc<LiteralUnit>, SmallFraction); 4]> = self.components.iter().collect();
        sorted.sort_by(|(a, ea), (b, eb)| {
            eb.to_f64().total_cmp(&ea.to_f64()).then_with(|| a.symbol().cmp(b.symbol()))
        });
        sorted
            .iter()
            .map(|(lu, e)| {
                if e.is_one() {
                    lu.symbol().to_string()
                } else {
                    format!("{}{}", lu.symbol(), numbers_to_superscript(&e.to_decimal_string()))
                }
            })
            .collect::<Vec<_>>()
            .join("\u{22C5}")
    }

    pub fn label(&self) -> String {
        self.symbol()
    }

    /// Exactly one component at exponent one: a bare literal in disguise.
    pub fn trivial(&self) -> bool {
        self.components.len() == 1 && self.components[0].1.is_one()
    }

    pub fn trivial_to_literal(&self) -> Option<&Arc<LiteralUnit>> {
        if self.trivial() { Some(&self.components[0].0) } else { None }
    }
}

// Same set of components with the same exponents, regardless of construction order.
impl PartialEq for AggregateUnit {
    fn eq(&self, other: &Self) -> bool {
        self.components.len() == other.components.len()
            && self.components.iter().all(|(lu, e)| other.exponent_of(lu) == Some(*e))
    }
}
