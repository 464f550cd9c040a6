// =============================================================================
// State Module
// =============================================================================
// Account layouts owned by the Step Bond program, plus the step table type
// stored inside every Bond.
// =============================================================================

pub mod bond;
pub mod fee_ledger;
pub mod registry;
pub mod step;

pub use bond::*;
pub use fee_ledger::*;
pub use registry::*;
pub use step::*;
