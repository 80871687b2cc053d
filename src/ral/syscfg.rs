//! System configuration (SYSCFG0) registers used by the clock tree
//!
//! Only the chip configuration registers matter here; the pin-mux and
//! priority registers in the same block belong to other drivers and
//! stay reserved.

use super::{RORegister, RWRegister, WORegister};

/// System configuration registers.
#[repr(C)]
pub struct RegisterBlock {
    /// Peripheral Revision ID
    pub REVID: RORegister<u32>,
    _reserved0: [u32; 13],
    /// Kick 0 Register: first half of the write-unlock sequence
    pub KICK0R: WORegister<u32>,
    /// Kick 1 Register: second half of the write-unlock sequence
    pub KICK1R: WORegister<u32>,
    _reserved1: [u32; 79],
    /// Chip Configuration Register 0
    pub CFGCHIP0: RWRegister<u32>,
    /// Chip Configuration Register 1
    pub CFGCHIP1: RWRegister<u32>,
    /// Chip Configuration Register 2
    pub CFGCHIP2: RWRegister<u32>,
    /// Chip Configuration Register 3
    pub CFGCHIP3: RWRegister<u32>,
}

// Did I calculate my reservations correctly?
const _: () = assert!(core::mem::offset_of!(RegisterBlock, KICK0R) == 0x038);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, CFGCHIP0) == 0x17c);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, CFGCHIP3) == 0x188);

impl RegisterBlock {
    /// Magic value that unlocks SYSCFG writes through KICK0R.
    pub const KICK0_UNLOCK: u32 = 0x83e7_0b13;
    /// Magic value that unlocks SYSCFG writes through KICK1R.
    pub const KICK1_UNLOCK: u32 = 0x95a4_f1e0;

    /// Run `f` with SYSCFG writes unlocked, relocking afterwards.
    pub fn unlocked<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        self.KICK0R.write(Self::KICK0_UNLOCK);
        self.KICK1R.write(Self::KICK1_UNLOCK);
        let result = f(self);
        // Writing anything else relocks the block.
        self.KICK0R.write(0);
        self.KICK1R.write(0);
        result
    }
}

/// Chip Configuration Register 3 fields.
pub mod CFGCHIP3 {
    /// PLLOUT divide-by-4.5 enable
    pub mod DIV45PENA {
        pub const offset: u32 = 0;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// EMIFA clock source (0 = PLL0 SYSCLK3, 1 = DIV4.5)
    pub mod EMA_CLKSRC {
        pub const offset: u32 = 1;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// ASYNC3 domain source (0 = PLL0 SYSCLK2, 1 = PLL1 SYSCLK2)
    pub mod ASYNC3_CLKSRC {
        pub const offset: u32 = 4;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}
