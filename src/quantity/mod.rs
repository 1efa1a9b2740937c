//! Quantity values: a raw (unscaled, base-unit) magnitude tagged with its unit.
//!
//! Arithmetic works on the unscaled magnitudes. Addition, subtraction, comparison and fuzzy
//! equivalence require convertible units and report a `DimensionMismatch` otherwise; products,
//! quotients and powers always succeed and build an `AggregateUnit` for the result.

use crate::dimension::SmallFraction;
use crate::error::{QudtError, Result};
use crate::unit::{AggregateUnit, Unit};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

pub const DEFAULT_EPSILON: f64 = 0.00001;

// f64 bit pattern of the process-wide default epsilon.
static EPSILON_BITS: AtomicU64 = AtomicU64::new(0x3EE4_F8B5_88E3_68F1);

#[derive(Debug, Clone)]
pub struct QuantityValue {
    unscaled: f64,
    unit: Unit,
}

impl QuantityValue {
    /// Sets the default precision used by [`equivalent_absolute`](Self::equivalent_absolute) and
    /// [`equivalent_ratio`](Self::equivalent_ratio). Must lie strictly between 0 and 1.
    pub fn set_default_epsilon(epsilon: f64) -> Result<()> {
        if !(epsilon > 0.0 && epsilon < 1.0) {
            return Err(QudtError::InvalidEpsilon(epsilon));
        }
        EPSILON_BITS.store(epsilon.to_bits(), AtomicOrdering::Relaxed);
        Ok(())
    }

    pub fn default_epsilon() -> f64 {
        f64::from_bits(EPSILON_BITS.load(AtomicOrdering::Relaxed))
    }

    /// A value expressed in `unit` (e.g. 18.3 for "18.3 kN").
    pub fn of_scaled(value: f64, unit: Unit) -> Self {
        Self { unscaled: unit.unscale(value), unit }
    }

    /// A value already in the base representation of `unit`'s dimension.
    pub fn of_unscaled(unscaled: f64, unit: Unit) -> Self {
        Self { unscaled, unit }
    }

    /// A bare number carried by the empty aggregate unit.
    pub fn of_number(value: f64) -> Self {
        Self { unscaled: value, unit: Unit::number() }
    }

    pub fn unscaled(&self) -> f64 { self.unscaled }
    pub fn unit(&self) -> &Unit { &self.unit }

    pub fn value(&self) -> f64 {
        self.unit.scale(self.unscaled)
    }

    /// Same magnitude, re-expressed in another convertible unit.
    pub fn converted(&self, unit: Unit) -> Result<Self> {
        self.check_convertible("convert", &unit)?;
        Ok(Self::of_unscaled(self.unscaled, unit))
    }

    fn check_convertible(&self, operation: &'static str, other: &Unit) -> Result<()> {
        if self.unit.is_convertible(other) {
            Ok(())
        } else {
            Err(QudtError::mismatch(operation, &self.unit, other))
        }
    }

    /// A zero operand is the additive identity and is returned as-is, without a unit check. The
    /// sum otherwise keeps the first operand's unit.
    pub fn add(&self, other: &QuantityValue) -> Result<Self> {
        if self.unscaled == 0.0 {
            return Ok(other.clone());
        }
        if other.unscaled == 0.0 {
            return Ok(self.clone());
        }
        self.check_convertible("add", &other.unit)?;
        Ok(Self::of_unscaled(self.unscaled + other.unscaled, self.unit.clone()))
    }

    /// Subtracting from zero yields the negated second operand in its own unit.
    pub fn subtract(&self, other: &QuantityValue) -> Result<Self> {
        if self.unscaled == 0.0 {
            return Ok(Self::of_unscaled(-other.unscaled, other.unit.clone()));
        }
        if other.unscaled == 0.0 {
            return Ok(self.clone());
        }
        self.check_convertible("subtract", &other.unit)?;
        Ok(Self::of_unscaled(self.unscaled - other.unscaled, self.unit.clone()))
    }

    pub fn multiply(&self, other: &QuantityValue) -> Self {
        Self::of_unscaled(
            self.unscaled * other.unscaled,
            AggregateUnit::combine(&self.unit, 1, &other.unit, 1).into(),
        )
    }

    pub fn divide(&self, other: &QuantityValue) -> Self {
        Self::of_unscaled(
            self.unscaled / other.unscaled,
            AggregateUnit::combine(&self.unit, 1, &other.unit, -1).into(),
        )
    }

    pub fn pow_int(&self, exp: i32) -> Self {
        Self::of_unscaled(self.unscaled.powi(exp), AggregateUnit::of(&self.unit, exp).into())
    }

    pub fn pow(&self, exp: SmallFraction) -> Self {
        Self::of_unscaled(self.unscaled.powf(exp.to_f64()), AggregateUnit::of(&self.unit, exp).into())
    }

    pub fn add_assign_checked(&mut self, other: &QuantityValue) -> Result<()> {
        if self.unscaled == 0.0 {
            *self = other.clone();
            return Ok(());
        }
        if other.unscaled == 0.0 {
            return Ok(());
        }
        self.check_convertible("add", &other.unit)?;
        self.unscaled += other.unscaled;
        Ok(())
    }

    pub fn subtract_assign_checked(&mut self, other: &QuantityValue) -> Result<()> {
        if self.unscaled == 0.0 {
            self.unscaled = -other.unscaled;
            self.unit = other.unit.clone();
            return Ok(());
        }
        if other.unscaled == 0.0 {
            return Ok(());
        }
        self.check_convertible("subtract", &other.unit)?;
        self.unscaled -= other.unscaled;
        Ok(())
    }

    pub fn multiply_assign(&mut self, other: &QuantityValue) {
        self.unscaled *= other.unscaled;
        self.unit = AggregateUnit::combine(&self.unit, 1, &other.unit, 1).into();
    }

    pub fn divide_assign(&mut self, other: &QuantityValue) {
        self.unscaled /= other.unscaled;
        self.unit = AggregateUnit::combine(&self.unit, 1, &other.unit, -1).into();
    }

    /// Orders by unscaled magnitude. Non-convertible units cannot be compared, and a NaN
    /// magnitude has no order.
    pub fn try_cmp(&self, other: &QuantityValue) -> Result<Ordering> {
        self.check_convertible("compare", &other.unit)?;
        self.unscaled.partial_cmp(&other.unscaled).ok_or_else(|| QudtError::Unordered {
            left: self.to_string(),
            right: other.to_string(),
        })
    }

    pub fn equivalent_absolute(&self, other: &QuantityValue) -> Result<bool> {
        self.equivalent_absolute_within(other, Self::default_epsilon())
    }

    /// `|a - b| < epsilon` on the unscaled magnitudes. Not transitive when epsilon is large
    /// relative to the spread of values.
    pub fn equivalent_absolute_within(&self, other: &QuantityValue, epsilon: f64) -> Result<bool> {
        self.check_convertible("compare", &other.unit)?;
        Ok((self.unscaled - other.unscaled).abs() < epsilon)
    }

    pub fn equivalent_ratio(&self, other: &QuantityValue) -> Result<bool> {
        self.equivalent_ratio_within(other, Self::default_epsilon())
    }

    /// `|1 - a/b| < epsilon` on the unscaled magnitudes.
    pub fn equivalent_ratio_within(&self, other: &QuantityValue, epsilon: f64) -> Result<bool> {
        self.check_convertible("compare", &other.unit)?;
        if self.unscaled == other.unscaled {
            return Ok(true);
        }
        Ok((1.0 - self.unscaled / other.unscaled).abs() < epsilon)
    }
}

// Raw magnitude equality plus unit convertibility. Two values in differently scaled units of the
// same dimension compare on their unscaled magnitudes only.
impl PartialEq for QuantityValue {
    fn eq(&self, other: &Self) -> bool {
        self.unscaled == other.unscaled && self.unit.is_convertible(&other.unit)
    }
}

impl PartialOrd for QuantityValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl Hash for QuantityValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let bits = if self.unscaled == 0.0 { 0 } else { self.unscaled.to_bits() };
        bits.hash(state);
        self.unit.dv().hash(state);
    }
}

impl fmt::Display for QuantityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value(), self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::DimensionVector;
    use crate::unit::LiteralUnit;
    use std::sync::Arc;

    fn unit(label: &str, symbol: &str, dv: DimensionVector, multiplier: f64, offset: f64) -> Unit {
        Unit::from(LiteralUnit::new(label, symbol, symbol, dv, offset, multiplier))
    }

    fn length() -> DimensionVector { DimensionVector::builder().with_length(1).build() }
    fn time() -> DimensionVector { DimensionVector::builder().with_time(1).build() }

    fn m() -> Unit { unit("Metre", "m", length(), 1.0, 0.0) }
    fn mm() -> Unit { unit("Millimetre", "mm", length(), 0.001, 0.0) }
    fn sec() -> Unit { unit("Second", "s", time(), 1.0, 0.0) }
    fn m2() -> Unit { unit("Square Metre", "m²", DimensionVector::builder().with_length(2).build(), 1.0, 0.0) }
    fn m_per_sec() -> Unit {
        unit("Metre per Second", "m/s", DimensionVector::builder().with_length(1).with_time(-1).build(), 1.0, 0.0)
    }
    fn deg_c() -> Unit {
        unit("Degree Celsius", "°C", DimensionVector::builder().with_thermodynamic_temperature(1).build(), 1.0, 273.15)
    }

    #[test]
    fn test_divide() {
        let distance = QuantityValue::of_scaled(4.0, m());
        let duration = QuantityValue::of_scaled(2.0, sec());
        let speed = QuantityValue::of_scaled(2.0, m_per_sec());
        assert_eq!(speed.try_cmp(&distance.divide(&duration)), Ok(Ordering::Equal));
    }

    #[test]
    fn test_add_keeps_first_unit() {
        let a = QuantityValue::of_scaled(4.0, m());
        let b = QuantityValue::of_scaled(3000.0, mm());
        let sum = a.add(&b).unwrap();
        assert_eq!(sum, QuantityValue::of_scaled(7.0, m()));
        assert_eq!(sum.unit().symbol(), "m");
    }

    #[test]
    fn test_subtract() {
        let a = QuantityValue::of_scaled(4.0, m());
        let b = QuantityValue::of_scaled(3000.0, mm());
        assert_eq!(a.subtract(&b).unwrap(), QuantityValue::of_scaled(1.0, m()));
    }

    #[test]
    fn test_subtract_from_zero_negates_second_operand() {
        let zero = QuantityValue::of_scaled(0.0, sec());
        let b = QuantityValue::of_scaled(3000.0, mm());
        let diff = zero.subtract(&b).unwrap();
        assert_eq!(diff.unit().symbol(), "mm");
        assert!((diff.value() + 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_operand_short_circuits_unit_check() {
        let zero = QuantityValue::of_scaled(0.0, sec());
        let length = QuantityValue::of_scaled(5.0, m());
        assert_eq!(zero.add(&length).unwrap(), length);
        assert_eq!(length.add(&zero).unwrap(), length);
    }

    #[test]
    fn test_mismatch_is_reported() {
        let a = QuantityValue::of_scaled(4.0, m());
        let b = QuantityValue::of_scaled(2.0, sec());
        assert!(matches!(a.add(&b), Err(QudtError::DimensionMismatch { operation: "add", .. })));
        assert!(matches!(a.subtract(&b), Err(QudtError::DimensionMismatch { operation: "subtract", .. })));
        assert!(matches!(a.try_cmp(&b), Err(QudtError::DimensionMismatch { .. })));
        assert!(a.equivalent_absolute(&b).is_err());
        assert!(a.converted(sec()).is_err());
        assert_eq!(a.partial_cmp(&b), None);
    }

    #[test]
    fn test_multiply() {
        let a = QuantityValue::of_scaled(4.0, m());
        let b = QuantityValue::of_scaled(3000.0, mm());
        let product = a.multiply(&b);
        assert_eq!(product, QuantityValue::of_scaled(12.0, m2()));
        assert_eq!(product.unit().symbol(), "m⋅mm");
    }

    #[test]
    fn test_pow() {
        let a = QuantityValue::of_scaled(4.0, m());
        assert_eq!(a.pow_int(2), QuantityValue::of_scaled(16.0, m2()));

        let per_m2 = unit("Per Square Metre", "/m²", DimensionVector::builder().with_length(-2).build(), 1.0, 0.0);
        let b = QuantityValue::of_scaled(1.0 / 16.0, per_m2);
        assert_eq!(b.pow(SmallFraction::new(-1, 2)), a);
    }

    #[test]
    fn test_compare() {
        let a = QuantityValue::of_scaled(4.0, m());
        let c = QuantityValue::of_scaled(200.0, mm());
        assert_eq!(a.try_cmp(&c), Ok(Ordering::Greater));
        assert_eq!(c.try_cmp(&a), Ok(Ordering::Less));
        assert!(c < a);
    }

    #[test]
    fn test_equality_is_raw_magnitude_plus_convertibility() {
        // Different display values, same unscaled magnitude: equal.
        let metres = QuantityValue::of_scaled(2.0, m());
        let millimetres = QuantityValue::of_scaled(2000.0, mm());
        assert_eq!(metres, millimetres);

        // Same raw magnitude, incompatible dimensions: not equal.
        let seconds = QuantityValue::of_unscaled(2.0, sec());
        assert_ne!(metres, seconds);
    }

    #[test]
    fn test_equivalence_with_epsilon() {
        let a = QuantityValue::of_scaled(1.0, m());
        let b = QuantityValue::of_scaled(1000.004, mm());
        assert_eq!(a.equivalent_absolute_within(&b, 1e-5), Ok(true));
        assert_eq!(a.equivalent_absolute_within(&b, 1e-7), Ok(false));
        assert_eq!(a.equivalent_ratio_within(&b, 1e-5), Ok(true));
        assert_eq!(a.equivalent_ratio_within(&b, 1e-7), Ok(false));
    }

    // The only test that touches the process-wide epsilon; every other test passes explicit
    // tolerances or stays well inside the default.
    #[test]
    fn test_default_epsilon() {
        assert_eq!(QuantityValue::default_epsilon(), DEFAULT_EPSILON);
        assert_eq!(QuantityValue::set_default_epsilon(0.0), Err(QudtError::InvalidEpsilon(0.0)));
        assert_eq!(QuantityValue::set_default_epsilon(1.5), Err(QudtError::InvalidEpsilon(1.5)));
        assert!(QuantityValue::set_default_epsilon(f64::NAN).is_err());
        assert_eq!(QuantityValue::default_epsilon(), DEFAULT_EPSILON);

        let a = QuantityValue::of_scaled(1.0, m());
        let b = QuantityValue::of_scaled(1005.0, mm());
        assert_eq!(a.equivalent_absolute(&b), Ok(false));
        assert_eq!(a.equivalent_ratio(&b), Ok(false));

        QuantityValue::set_default_epsilon(0.01).unwrap();
        assert_eq!(QuantityValue::default_epsilon(), 0.01);
        let loose = (a.equivalent_absolute(&b), a.equivalent_ratio(&b));

        QuantityValue::set_default_epsilon(DEFAULT_EPSILON).unwrap();
        assert_eq!(loose, (Ok(true), Ok(true)));
        assert_eq!(QuantityValue::default_epsilon(), DEFAULT_EPSILON);
        assert_eq!(a.equivalent_absolute(&b), Ok(false));
    }

    #[test]
    fn test_nan_magnitudes_are_unordered() {
        let a = QuantityValue::of_scaled(f64::NAN, m());
        let b = QuantityValue::of_scaled(2.0, mm());
        assert!(matches!(a.try_cmp(&b), Err(QudtError::Unordered { .. })));
        assert!(matches!(b.try_cmp(&a), Err(QudtError::Unordered { .. })));
        assert_eq!(a.partial_cmp(&b), None);

        // A dimension mismatch is still reported as such.
        let c = QuantityValue::of_scaled(f64::NAN, sec());
        assert!(matches!(b.try_cmp(&c), Err(QudtError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_offset_units() {
        let boiling = QuantityValue::of_scaled(100.0, deg_c());
        assert!((boiling.unscaled() - 373.15).abs() < 1e-9);
        assert!((boiling.value() - 100.0).abs() < 1e-9);

        let kelvin = unit("Kelvin", "K", DimensionVector::builder().with_thermodynamic_temperature(1).build(), 1.0, 0.0);
        let converted = boiling.converted(kelvin).unwrap();
        assert!((converted.value() - 373.15).abs() < 1e-9);
    }

    #[test]
    fn test_in_place_ops() {
        let mut q = QuantityValue::of_scaled(4.0, m());
        q.add_assign_checked(&QuantityValue::of_scaled(3000.0, mm())).unwrap();
        assert_eq!(q.value(), 7.0);
        q.subtract_assign_checked(&QuantityValue::of_scaled(2.0, m())).unwrap();
        assert_eq!(q.value(), 5.0);
        assert!(q.add_assign_checked(&QuantityValue::of_scaled(1.0, sec())).is_err());
        assert_eq!(q.value(), 5.0);

        q.divide_assign(&QuantityValue::of_scaled(2.0, sec()));
        assert_eq!(q.unit().dv(), DimensionVector::builder().with_length(1).with_time(-1).build());
        q.multiply_assign(&QuantityValue::of_scaled(2.0, sec()));
        assert_eq!(q.unit().dv(), length());
        assert_eq!(q.unscaled(), 5.0);
    }

    #[test]
    fn test_number_and_display() {
        let n = QuantityValue::of_number(42.0);
        assert!(n.unit().is_basic_number());
        assert_eq!(n.value(), 42.0);

        let shared = Arc::new(LiteralUnit::new("Kilometre", "KiloM", "km", length(), 0.0, 1000.0));
        let q = QuantityValue::of_scaled(1.5, Unit::from(shared));
        assert_eq!(q.to_string(), "1.5 km");
    }
}
