//! Value objects - Immutable objects defined by their attributes

mod location;
mod names;
mod range;

pub use location::{Direction, Location};
pub use names::{CreatureName, DisplayName, ItemName};
pub use range::{pick_integer_from_range, Range};
