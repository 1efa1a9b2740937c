//! Exact dimension algebra: small rational exponents and the seven-slot dimension vector.
pub mod fraction;
pub mod properties;
pub mod vector;

pub use fraction::SmallFraction;
pub use properties::ExponentProperty;
pub use vector::{Builder, DimensionVector};
