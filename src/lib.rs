//! Clock-tree and EDMA3 drivers for TI AM18x processors.
//!
//! `am18x-hal` provides
//!
//! - a lazy, cache-and-invalidate model of the device clock tree, so
//!   peripheral drivers can discover their input frequency before
//!   programming baud-rate or divider registers.
//! - an EDMA3 channel controller driver working in caller-owned
//!   transfer descriptors, covering event-triggered, manually
//!   triggered, and QDMA transfers, descriptor chaining, and
//!   completion polling.
//!
//! # Getting started
//!
//! Both drivers are configured with raw pointers to their
//! memory-mapped register blocks. If you're using a peripheral access
//! crate for this chip, use its base-address constants; the drivers
//! never depend on *how* the registers are reached, only on where
//! they start.
//!
//! ```no_run
//! use am18x_hal::{dclk::ClockTree, edma::Edma};
//! # const PLL0: *const () = core::ptr::null();
//! # const PLL1: *const () = core::ptr::null();
//! # const SYSCFG: *const () = core::ptr::null();
//! # const EDMA0_CC: *const () = core::ptr::null();
//!
//! // Safety: addresses and channel count are valid for this target.
//! static EDMA0: Edma<32> = unsafe { Edma::new_cc0(EDMA0_CC) };
//!
//! // Safety: register block addresses are valid for this target.
//! let mut clocks = unsafe { ClockTree::new(24_000_000, PLL0, PLL1, SYSCFG) };
//! ```
//!
//! From there, see [`dclk`] for frequency queries and mux rerouting,
//! and [`edma`] for the transfer lifecycle.
//!
//! Everything here is synchronous register programming; nothing
//! blocks, sleeps, or waits. The only asynchronous actor is the DMA
//! hardware itself, observed through [`edma::Edma::completed`] and
//! [`edma::Edma::status`].
//!
//! ### License
//!
//! Licensed under either of
//!
//! - [Apache License, Version 2.0](http://www.apache.org/licenses/LICENSE-2.0) ([LICENSE-APACHE](./LICENSE-APACHE))
//! - [MIT License](http://opensource.org/licenses/MIT) ([LICENSE-MIT](./LICENSE-MIT))
//!
//! at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted
//! for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
//! dual licensed as above, without any additional terms or conditions.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod dclk;
pub mod edma;
mod ral;

pub use dclk::{ClockId, ClockTree};
pub use edma::{ChannelConfig, Edma, TransferDescriptor, TransferFlags};

/// A driver result.
pub type Result<T> = core::result::Result<T, Error>;

/// A driver error.
///
/// Every variant is an expected steady-state condition, not a fault:
/// pick another clock source, or fix the call ordering, and retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The clock node has no software-selectable parent.
    NotConfigurable,
    /// The requested parent is not an input of this mux.
    InvalidParent,
    /// The channel's PaRAM entries haven't been written yet.
    NotParametrized,
}
