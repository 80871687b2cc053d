//! PLL controller (PLLC) register block and fields
//!
//! PLL0 and PLL1 share this layout. PLL1 simply hard-wires the fields
//! it lacks (the pre-divider, dividers 4 through 7) to their reset
//! values, so the clock tree never reads garbage from them.

use super::{RORegister, RWRegister};

/// PLL controller registers.
#[repr(C)]
pub struct RegisterBlock {
    /// Peripheral Revision ID
    pub REVID: RORegister<u32>,
    _reserved0: [u32; 63],
    /// PLL Control Register
    pub PLLCTL: RWRegister<u32>,
    /// OBSCLK Select Register
    pub OCSEL: RWRegister<u32>,
    _reserved1: [u32; 2],
    /// PLL Multiplier Control Register
    pub PLLM: RWRegister<u32>,
    /// Pre-Divider Control Register
    pub PREDIV: RWRegister<u32>,
    /// PLL Controller Dividers 1 through 3
    pub PLLDIV_LO: [RWRegister<u32>; 3],
    /// Oscillator Divider Register
    pub OSCDIV: RWRegister<u32>,
    /// Post-Divider Control Register
    pub POSTDIV: RWRegister<u32>,
    _reserved2: [u32; 3],
    /// PLL Controller Command Register
    pub PLLCMD: RWRegister<u32>,
    /// PLL Controller Status Register
    pub PLLSTAT: RORegister<u32>,
    /// Clock Align Control Register
    pub ALNCTL: RWRegister<u32>,
    /// Divider Ratio Change Register
    pub DCHANGE: RORegister<u32>,
    /// Clock Enable Control Register
    pub CKEN: RWRegister<u32>,
    /// Clock Status Register
    pub CKSTAT: RORegister<u32>,
    /// System Clock Status Register
    pub SYSTAT: RORegister<u32>,
    _reserved3: [u32; 3],
    /// PLL Controller Dividers 4 through 7
    pub PLLDIV_HI: [RWRegister<u32>; 4],
}

// Did I calculate my reservations correctly?
const _: () = assert!(core::mem::offset_of!(RegisterBlock, PLLCTL) == 0x100);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, PLLM) == 0x110);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, PLLDIV_LO) == 0x118);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, PLLCMD) == 0x138);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, PLLDIV_HI) == 0x160);

impl RegisterBlock {
    /// Returns SYSCLK divider `n`, for `n` in 1..=7.
    ///
    /// The hardware splits the seven dividers across two register
    /// groups. Hide that so callers can count the way the data
    /// sheet does.
    pub fn plldiv(&self, n: usize) -> &RWRegister<u32> {
        match n {
            1..=3 => &self.PLLDIV_LO[n - 1],
            4..=7 => &self.PLLDIV_HI[n - 4],
            _ => panic!("PLL controllers have dividers 1 through 7"),
        }
    }
}

/// PLL Control fields.
pub mod PLLCTL {
    /// PLL mode enable (0 = bypass)
    pub mod PLLEN {
        pub const offset: u32 = 0;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// PLL power down
    pub mod PLLPWRDN {
        pub const offset: u32 = 1;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// PLL reset
    pub mod PLLRST {
        pub const offset: u32 = 3;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// PLLEN source select
    pub mod PLLENSRC {
        pub const offset: u32 = 5;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Reference clock mode (crystal or square wave)
    pub mod CLKMODE {
        pub const offset: u32 = 8;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Reference source (0 = OSCIN, 1 = PLL1 SYSCLK3; PLL0 only)
    pub mod EXTCLKSRC {
        pub const offset: u32 = 9;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}

/// PLL Multiplier fields.
pub mod PLLM {
    /// Multiplier value; output is reference times PLLM + 1
    pub mod PLLM {
        pub const offset: u32 = 0;
        pub const mask: u32 = 0x1f << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}

/// Divider fields, common to PREDIV, POSTDIV, OSCDIV and PLLDIVn.
pub mod DIV {
    /// Divider value; output is input over RATIO + 1
    pub mod RATIO {
        pub const offset: u32 = 0;
        pub const mask: u32 = 0x1f << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Divider enable
    pub mod EN {
        pub const offset: u32 = 15;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}

/// Clock Enable Control fields.
pub mod CKEN {
    /// AUXCLK enable
    pub mod AUXEN {
        pub const offset: u32 = 0;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// OBSCLK enable
    pub mod OBSEN {
        pub const offset: u32 = 1;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}
