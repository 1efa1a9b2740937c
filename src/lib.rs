// Crate facade: dimensional analysis and unit conversion over a QUDT-style unit catalog.
//
// Layers, leaves first: exact exponents and dimension vectors (`dimension`), units (`unit`),
// quantity values (`quantity`), the predefined catalog (`catalog`), and the index that parses,
// resolves, matches and interns units against that catalog (`index`).

pub mod catalog;
pub mod dimension;
pub mod error;
pub mod index;
pub mod quantity;
pub mod unit;

pub use catalog::{Catalog, QuantityKind};
pub use dimension::{DimensionVector, ExponentProperty, SmallFraction};
pub use error::{QudtError, Result};
pub use index::{IndexOptions, UnitIndex};
pub use quantity::QuantityValue;
pub use unit::{AggregateUnit, LiteralUnit, Unit};
