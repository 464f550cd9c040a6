// =============================================================================
// Instructions Module
// =============================================================================
// Every entry point of the Step Bond program, one file per concern.
// =============================================================================

// Registry & curve setup
pub mod create_curve;
pub mod initialize_registry;

// Trading
pub mod buy;
pub mod quote;
pub mod sell;

// Fees
pub mod withdraw_fees;

// Guards shared by the handlers
pub mod checks;

// Admin operations
pub mod admin;

// The #[derive(Accounts)] macro generates helper types that need to be at crate root
pub use admin::*;
pub use buy::*;
pub use create_curve::*;
pub use initialize_registry::*;
pub use quote::*;
pub use sell::*;
pub use withdraw_fees::*;
