// =============================================================================
// Math Module
// =============================================================================
// Pure functions only: nothing here reads or writes accounts.
// =============================================================================

pub mod curve;
pub mod fees;
pub mod fixed;

pub use curve::*;
pub use fees::*;
pub use fixed::*;
