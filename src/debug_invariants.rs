//! Opt-in structural checks for meshes.
//!
//! Checks run in debug builds, or in release builds when the
//! `check-invariants` (or `strict-invariants`) feature is enabled.

use crate::dofmap_error::DofMapError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), DofMapError>;

    /// Panic on the first violated invariant when checking is enabled.
    fn debug_assert_invariants(&self) {
        crate::check_invariants!(self.validate_invariants(), "DebugInvariants");
    }
}

/// Run a fallible check and panic with context on error when invariant
/// checking is enabled; a no-op otherwise.
#[macro_export]
macro_rules! check_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        if cfg!(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants")) {
            if let Err(e) = $expr {
                panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
            }
        }
    };
}
