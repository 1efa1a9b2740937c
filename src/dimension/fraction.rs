//! Small exact fractions for dimension exponents.
//!
//! Exponents in real dimension vectors have denominators of 1, sometimes 2, rarely 4; numerators
//! above 16 essentially never occur. Arithmetic therefore stays in `i32` and never reduces
//! implicitly: only `reduce`/`reduced` normalize a value.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy)]
pub struct SmallFraction {
    num: i32,
    denom: i32,
}

impl SmallFraction {
    pub const ZERO: SmallFraction = SmallFraction { num: 0, denom: 1 };
    pub const ONE: SmallFraction = SmallFraction { num: 1, denom: 1 };
    pub const NEG_ONE: SmallFraction = SmallFraction { num: -1, denom: 1 };

    pub const fn new(num: i32, denom: i32) -> Self {
        Self { num, denom }
    }

    pub const fn integer(value: i32) -> Self {
        Self { num: value, denom: 1 }
    }

    pub fn numerator(&self) -> i32 { self.num }
    pub fn denominator(&self) -> i32 { self.denom }

    /// Snaps `val` to the fraction with the smallest denominator in 1..=8 that lies within 0.01 of
    /// it. Values with no such neighbour are rounded to the nearest integer.
    pub fn approximate(val: f64) -> Self {
        for denom in 1..9 {
            let scaled = val * denom as f64;
            if (scaled - scaled.round()).abs() < 0.01 {
                return Self::new(scaled.round() as i32, denom);
            }
        }
        Self::integer(val.round() as i32)
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.denom as f64
    }

    pub fn is_zero(&self) -> bool { self.num == 0 }

    /// True for any representation of one, reduced or not (`3/3`).
    pub fn is_one(&self) -> bool { self.num == self.denom }

    /// Reduces in place by the gcd and forces a positive denominator.
    pub fn reduce(&mut self) -> &mut Self {
        let gcd = gcd(self.num.abs(), self.denom.abs());
        if gcd != 0 {
            self.num /= gcd;
            self.denom /= gcd;
        }
        if self.denom < 0 {
            self.num = -self.num;
            self.denom = -self.denom;
        }
        self
    }

    pub fn reduced(mut self) -> Self {
        self.reduce();
        self
    }

    /// Decimal rendering with at most three fraction digits and no trailing zeros.
    pub fn to_decimal_string(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let fixed = format!("{:.3}", self.to_f64());
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" { "0".to_string() } else { trimmed.to_string() }
    }

    /// The reduced fraction packed as `|num| + 8 * denom + 128 * sign`, or `None` when the code
    /// exceeds one byte.
    pub fn encoded_byte(&self) -> Option<u8> {
        u8::try_from(self.raw_code()).ok()
    }

    fn raw_code(&self) -> u64 {
        let r = self.reduced();
        u64::from(r.num.unsigned_abs()) + 8 * u64::from(r.denom.unsigned_abs()) + if r.num < 0 { 128 } else { 0 }
    }

    /// [`encoded_byte`](Self::encoded_byte) rendered as hex.
    ///
    /// Values that do not fit are still encoded from the raw formula, but flagged with a
    /// warning: they come from pathological exponents and do not corrupt anything else.
    pub fn encode_reduced(&self) -> String {
        if let Some(byte) = self.encoded_byte() {
            return format!("{:02x}", byte);
        }
        let code = self.raw_code();
        log::warn!("Bad encoding for fraction {}: code {} exceeds one byte", self.reduced(), code);
        format!("{:02x}", code)
    }
}

fn gcd(a: i32, b: i32) -> i32 {
    if b == 0 { a } else { gcd(b, a % b) }
}

impl Default for SmallFraction {
    fn default() -> Self { Self::ZERO }
}

impl From<i32> for SmallFraction {
    fn from(value: i32) -> Self { Self::integer(value) }
}

// Equality is on the decimal value, so `2/4 == 1/2`. Hashing uses the reduced pair, which agrees
// with value equality for the small ranges these fractions live in.
impl PartialEq for SmallFraction {
    fn eq(&self, other: &Self) -> bool {
        self.to_f64() == other.to_f64()
    }
}

impl Eq for SmallFraction {}

impl Hash for SmallFraction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let r = self.reduced();
        r.num.hash(state);
        r.denom.hash(state);
    }
}

impl fmt::Display for SmallFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.denom)
        }
    }
}

impl Add for SmallFraction {
    type Output = SmallFraction;
    fn add(self, rhs: Self) -> Self {
        if self.denom == rhs.denom {
            Self::new(self.num + rhs.num, self.denom)
        } else {
            Self::new(self.num * rhs.denom + rhs.num * self.denom, self.denom * rhs.denom)
        }
    }
}

impl Sub for SmallFraction {
    type Output = SmallFraction;
    fn sub(self, rhs: Self) -> Self {
        if self.denom == rhs.denom {
            Self::new(self.num - rhs.num, self.denom)
        } else {
            Self::new(self.num * rhs.denom - rhs.num * self.denom, self.denom * rhs.denom)
        }
    }
}

impl Mul for SmallFraction {
    type Output = SmallFraction;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.num * rhs.num, self.denom * rhs.denom)
    }
}

impl Mul<i32> for SmallFraction {
    type Output = SmallFraction;
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.num * rhs, self.denom)
    }
}

impl Div for SmallFraction {
    type Output = SmallFraction;
    fn div(self, rhs: Self) -> Self {
        Self::new(self.num * rhs.denom, self.denom * rhs.num)
    }
}

impl Neg for SmallFraction {
    type Output = SmallFraction;
    fn neg(self) -> Self {
        Self::new(-self.num, self.denom)
    }
}
