//! Testability port for injecting randomness.

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform integer in `[min, max]`, both inclusive.
    fn gen_range(&self, min: i32, max: i32) -> i32;
}
