//! Plain read/write accessors for the exponent property vocabulary, so a graph serialization
//! layer can round-trip a `DimensionVector` without this crate knowing about graphs.

use super::fraction::SmallFraction;
use super::vector::{self, Builder, DimensionVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExponentProperty {
    AmountOfSubstance,
    ElectricCurrent,
    Length,
    LuminousIntensity,
    Mass,
    ThermodynamicTemperature,
    Time,
    /// One for dimensionless vectors, zero otherwise. Derived on read, ignored on write.
    Dimensionless,
}

impl ExponentProperty {
    pub const ALL: [ExponentProperty; 8] = [
        ExponentProperty::AmountOfSubstance,
        ExponentProperty::ElectricCurrent,
        ExponentProperty::Length,
        ExponentProperty::LuminousIntensity,
        ExponentProperty::Mass,
        ExponentProperty::ThermodynamicTemperature,
        ExponentProperty::Time,
        ExponentProperty::Dimensionless,
    ];

    pub fn local_name(&self) -> &'static str {
        match self {
            ExponentProperty::AmountOfSubstance => "dimensionExponentForAmountOfSubstance",
            ExponentProperty::ElectricCurrent => "dimensionExponentForElectricCurrent",
            ExponentProperty::Length => "dimensionExponentForLength",
            ExponentProperty::LuminousIntensity => "dimensionExponentForLuminousIntensity",
            ExponentProperty::Mass => "dimensionExponentForMass",
            ExponentProperty::ThermodynamicTemperature => "dimensionExponentForThermodynamicTemperature",
            ExponentProperty::Time => "dimensionExponentForTime",
            ExponentProperty::Dimensionless => "dimensionlessExponent",
        }
    }

    pub fn from_local_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.local_name() == name)
    }

    fn slot(&self) -> Option<usize> {
        match self {
            ExponentProperty::AmountOfSubstance => Some(vector::AMOUNT),
            ExponentProperty::ElectricCurrent => Some(vector::CURRENT),
            ExponentProperty::Length => Some(vector::LENGTH),
            ExponentProperty::LuminousIntensity => Some(vector::LUMINOUS),
            ExponentProperty::Mass => Some(vector::MASS),
            ExponentProperty::ThermodynamicTemperature => Some(vector::TEMPERATURE),
            ExponentProperty::Time => Some(vector::TIME),
            ExponentProperty::Dimensionless => None,
        }
    }
}

impl DimensionVector {
    pub fn exponent(&self, property: ExponentProperty) -> SmallFraction {
        match property.slot() {
            Some(slot) => self.as_array()[slot],
            None => self.dimensionless_exponent(),
        }
    }

    /// All eight property/value pairs, in vocabulary order, ready to be written out.
    pub fn exponents(&self) -> Vec<(ExponentProperty, SmallFraction)> {
        ExponentProperty::ALL.iter().map(|p| (*p, self.exponent(*p))).collect()
    }
}

impl Builder {
    pub fn with_exponent(self, property: ExponentProperty, exp: impl Into<SmallFraction>) -> Self {
        match property.slot() {
            Some(slot) => self.with_slot(slot, exp.into()),
            None => self,
        }
    }
}
