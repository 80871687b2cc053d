//! A RAL-like module to support AM18x register access
//!
//! The register blocks in this module are hand-written rather than
//! auto-generated from an SVD file. That lets us represent register
//! clusters the way the hardware actually groups them: the PaRAM table
//! is an array of entry structs, the per-region channel registers are
//! one struct instantiated for the global view and again for each
//! shadow region, and so on.
//!
//! At the same time, we expose an interface that lets us use the RAL
//! macros, where applicable.

#![allow(
    non_snake_case, // Compatibility with RAL
    non_upper_case_globals, // Field modules spell `offset` and `mask` the RAL way
)]

pub mod cc;
pub mod pll;
pub mod syscfg;

pub use ral_registers::{modify_reg, read_reg, write_reg};
use ral_registers::{RORegister, RWRegister, WORegister};

//
// Helper types for static memory
//
// Similar to the RAL's `Instance` type, but more copy.
//

pub(crate) struct Static<T>(pub(crate) *const T);
impl<T> core::ops::Deref for Static<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        // Safety: pointer points to static memory (peripheral memory)
        unsafe { &*self.0 }
    }
}
impl<T> Clone for Static<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Static<T> {}

/// Identifies which EDMA3 channel controller we're driving.
///
/// The AM18x has two channel controllers with identical register
/// layouts but different transfer-controller complements: CC0 feeds
/// two event queues and exposes the channel-to-queue mapping
/// registers, CC1 feeds a single queue and doesn't. The difference
/// is small enough that runtime dispatch beats a type parameter.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    /// Channel controller 0: event queues 0 and 1.
    Cc0,
    /// Channel controller 1: event queue 0 only.
    Cc1,
}
