//! vector.rs
//! Seven-slot rational exponent vector over the SI base dimensions, plus its canonical names.

use super::fraction::SmallFraction;
use crate::error::{QudtError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const QKDV: &str = "http://qudt.org/vocab/dimensionvector/";
pub const DIMENSIONLESS_NAME: &str = "A0E0L0I0M0H0T0D1";
pub const DIMENSIONLESS_CODE: &str = "D1";

/// Tag letters in slot order, followed by the dimensionless marker `D`.
const DIMENSION_CHARS: [char; 8] = ['A', 'E', 'L', 'I', 'M', 'H', 'T', 'D'];

pub const AMOUNT: usize = 0;
pub const CURRENT: usize = 1;
pub const LENGTH: usize = 2;
pub const LUMINOUS: usize = 3;
pub const MASS: usize = 4;
pub const TEMPERATURE: usize = 5;
pub const TIME: usize = 6;

/// Exponents in the fixed order amount, current, length, luminous, mass, temperature, time.
///
/// Equality is exact element-wise (value) equality of the exponents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DimensionVector {
    vector: [SmallFraction; 7],
}

impl DimensionVector {
    pub const DIMENSIONLESS: DimensionVector = DimensionVector { vector: [SmallFraction::ZERO; 7] };

    pub fn builder() -> Builder {
        Builder::default()
    }

    pub const fn from_fractions(vector: [SmallFraction; 7]) -> Self {
        Self { vector }
    }

    pub fn from_integers(exponents: [i32; 7]) -> Self {
        Self { vector: exponents.map(SmallFraction::integer) }
    }

    /// Decodes an index code (`L1M1T_2`), a local name (`A0E0L1I0M0H0T0D0`) or a full
    /// dimension-vector URI. Exponents are snapped with [`SmallFraction::approximate`].
    pub fn from_code(code: &str) -> Result<Self> {
        let local = code.rsplit(['/', '#']).next().unwrap_or(code);
        if local.is_empty() {
            return Err(QudtError::MalformedDimensionCode(code.to_string()));
        }

        let mut vector = [SmallFraction::ZERO; 7];
        let mut rest = local;
        while let Some(tag) = rest.chars().next() {
            let slot = DIMENSION_CHARS
                .iter()
                .position(|&c| c == tag)
                .ok_or_else(|| QudtError::MalformedDimensionCode(code.to_string()))?;
            rest = &rest[tag.len_utf8()..];

            let end = rest.find(|c: char| DIMENSION_CHARS.contains(&c)).unwrap_or(rest.len());
            let number = rest[..end].replace("dot", ".").replace("pt", ".").replace('_', "-");
            rest = &rest[end..];

            let value: f64 = number
                .parse()
                .map_err(|_| QudtError::MalformedDimensionCode(code.to_string()))?;
            // The `D` slot only marks dimensionless vectors; it carries no exponent of its own.
            if slot < 7 {
                vector[slot] = SmallFraction::approximate(value);
            }
        }
        Ok(Self { vector })
    }

    /// True iff the local name of `uri` carries all eight `AELIMHTD` tags.
    pub fn is_semantic_uri(uri: &str) -> bool {
        let local = uri.rsplit(['/', '#']).next().unwrap_or(uri);
        local.split(|c: char| DIMENSION_CHARS.contains(&c)).count() == 9
    }

    pub fn dimensionless(&self) -> bool {
        self.vector.iter().all(SmallFraction::is_zero)
    }

    /// Exactly one dimension at exponent one, every other at zero. Only such vectors may carry a
    /// meaningful additive conversion offset.
    pub fn unary(&self) -> bool {
        let mut found_one = false;
        for exp in &self.vector {
            if exp.is_one() {
                if found_one {
                    return false;
                }
                found_one = true;
            } else if !exp.is_zero() {
                return false;
            }
        }
        found_one
    }

    pub fn scaled_by(&self, exp: SmallFraction) -> Self {
        Self { vector: self.vector.map(|v| v * exp) }
    }

    pub fn add(a: &Self, b: &Self) -> Self {
        let mut vector = a.vector;
        for (slot, rhs) in vector.iter_mut().zip(b.vector.iter()) {
            *slot = *slot + *rhs;
        }
        Self { vector }
    }

    pub fn index_code(&self) -> String {
        let mut code = String::new();
        for (tag, exp) in DIMENSION_CHARS.iter().zip(self.vector.iter()) {
            if !exp.is_zero() {
                code.push(*tag);
                code.push_str(&exp.to_decimal_string());
            }
        }
        if code.is_empty() {
            DIMENSIONLESS_CODE.to_string()
        } else {
            code.replace('.', "dot").replace('-', "_")
        }
    }

    pub fn local_name(&self) -> String {
        if self.dimensionless() {
            return DIMENSIONLESS_NAME.to_string();
        }
        let mut name = String::new();
        for (tag, exp) in DIMENSION_CHARS.iter().zip(self.vector.iter()) {
            name.push(*tag);
            name.push_str(&exp.to_decimal_string());
        }
        name.push_str("D0");
        name.replace('.', "dot")
    }

    pub fn uri(&self) -> String {
        format!("{}{}", QKDV, self.local_name())
    }

    /// The seven byte-sized exponent codes, concatenated.
    pub fn byte_code(&self) -> String {
        self.vector.iter().map(SmallFraction::encode_reduced).collect()
    }

    pub fn amount(&self) -> SmallFraction { self.vector[AMOUNT] }
    pub fn current(&self) -> SmallFraction { self.vector[CURRENT] }
    pub fn length(&self) -> SmallFraction { self.vector[LENGTH] }
    pub fn luminous(&self) -> SmallFraction { self.vector[LUMINOUS] }
    pub fn mass(&self) -> SmallFraction { self.vector[MASS] }
    pub fn temperature(&self) -> SmallFraction { self.vector[TEMPERATURE] }
    pub fn time(&self) -> SmallFraction { self.vector[TIME] }

    pub fn dimensionless_exponent(&self) -> SmallFraction {
        if self.dimensionless() { SmallFraction::ONE } else { SmallFraction::ZERO }
    }

    pub fn as_array(&self) -> &[SmallFraction; 7] {
        &self.vector
    }
}

impl fmt::Display for DimensionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DimensionVector:{}", self.index_code())
    }
}

impl TryFrom<String> for DimensionVector {
    type Error = QudtError;
    fn try_from(code: String) -> Result<Self> {
        Self::from_code(&code)
    }
}

impl From<DimensionVector> for String {
    fn from(dv: DimensionVector) -> String {
        dv.index_code()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Builder {
    vector: [SmallFraction; 7],
}

impl Builder {
    pub fn with_amount_of_substance(mut self, exp: impl Into<SmallFraction>) -> Self {
        self.vector[AMOUNT] = exp.into();
        self
    }

    pub fn with_electric_current(mut self, exp: impl Into<SmallFraction>) -> Self {
        self.vector[CURRENT] = exp.into();
        self
    }

    pub fn with_length(mut self, exp: impl Into<SmallFraction>) -> Self {
        self.vector[LENGTH] = exp.into();
        self
    }

    pub fn with_luminous_intensity(mut self, exp: impl Into<SmallFraction>) -> Self {
        self.vector[LUMINOUS] = exp.into();
        self
    }

    pub fn with_mass(mut self, exp: impl Into<SmallFraction>) -> Self {
        self.vector[MASS] = exp.into();
        self
    }

    pub fn with_thermodynamic_temperature(mut self, exp: impl Into<SmallFraction>) -> Self {
        self.vector[TEMPERATURE] = exp.into();
        self
    }

    pub fn with_time(mut self, exp: impl Into<SmallFraction>) -> Self {
        self.vector[TIME] = exp.into();
        self
    }

    pub(crate) fn with_slot(mut self, slot: usize, exp: SmallFraction) -> Self {
        self.vector[slot] = exp;
        self
    }

    pub fn build(self) -> DimensionVector {
        DimensionVector { vector: self.vector }
    }
}
