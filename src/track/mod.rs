// track/ - Plane placement along the gallery track
//
// Pure functions over world-unit geometry.
// No state, no allocation - just math.

mod arc;
mod sizing;

pub use arc::*;
pub use sizing::*;
