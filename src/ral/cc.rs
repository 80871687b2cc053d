//! EDMA3 channel controller (CC) register block and fields
//!
//! One layout serves both AM18x channel controllers. The interesting
//! clusters are the PaRAM table, expressed as an array of
//! [`ParamEntry`](param::ParamEntry) structs, and the channel
//! event/interrupt registers, expressed once as [`ChannelRegisters`]
//! and instantiated for the global view and for each shadow region.

use super::{RORegister, RWRegister, WORegister};

/// EDMA3 channel controller registers.
#[repr(C)]
pub struct RegisterBlock {
    /// Peripheral Revision ID
    pub REV: RORegister<u32>,
    /// CC Configuration Register
    pub CCCFG: RORegister<u32>,
    _reserved0: [u32; 126],
    /// QDMA Channel Mapping Registers, one per QDMA channel
    pub QCHMAP: [RWRegister<u32>; 8],
    _reserved1: [u32; 8],
    /// DMA Channel Queue Number Registers, eight channels per register
    pub DMAQNUM: [RWRegister<u32>; 4],
    _reserved2: [u32; 4],
    /// QDMA Channel Queue Number Register
    pub QDMAQNUM: RWRegister<u32>,
    _reserved3: [u32; 39],
    /// Event Missed Register
    pub EMR: RORegister<u32>,
    _reserved4: [u32; 1],
    /// Event Missed Clear Register
    pub EMCR: WORegister<u32>,
    _reserved5: [u32; 13],
    /// DMA Region Access Enable, one per shadow region
    pub DRAE: [RWRegister<u32>; 2],
    _reserved6: [u32; 14],
    /// QDMA Region Access Enable, one per shadow region
    pub QRAE: [RWRegister<u32>; 2],
    _reserved7: [u32; 158],
    /// Queue Status Registers, one per event queue
    pub QSTAT: [RORegister<u32>; 2],
    _reserved8: [u32; 14],
    /// CC Status Register
    pub CCSTAT: RORegister<u32>,
    _reserved9: [u32; 623],
    /// Global channel registers
    pub GLOBAL: ChannelRegisters,
    _reserved10: [u32; 896],
    /// Shadow region channel registers
    pub SHADOW: [ChannelRegisters; 2],
    _reserved11: [u32; 1792],
    /// Parameter RAM
    pub PARAM: [param::ParamEntry; 128],
}

// Did I calculate my reservations correctly?
const _: () = assert!(core::mem::offset_of!(RegisterBlock, QCHMAP) == 0x0200);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, DMAQNUM) == 0x0240);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, EMR) == 0x0300);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, DRAE) == 0x0340);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, QRAE) == 0x0380);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, QSTAT) == 0x0600);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, CCSTAT) == 0x0640);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, GLOBAL) == 0x1000);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, SHADOW) == 0x2000);

// PaRAM sits at CC base + 0x4000. The link-field encoding in
// `edma::param` depends on this.
const _: () = assert!(core::mem::offset_of!(RegisterBlock, PARAM) == 0x4000);

/// Channel event and interrupt registers.
///
/// The same cluster appears once at the global offset and once per
/// shadow region. Registers covering channels 32..64 don't exist on
/// this part; their slots are reserved.
#[repr(C)]
pub struct ChannelRegisters {
    /// Event Register
    pub ER: RORegister<u32>,
    _reserved0: [u32; 1],
    /// Event Clear Register
    pub ECR: WORegister<u32>,
    _reserved1: [u32; 1],
    /// Event Set Register
    pub ESR: WORegister<u32>,
    _reserved2: [u32; 1],
    /// Chained Event Register
    pub CER: RORegister<u32>,
    _reserved3: [u32; 1],
    /// Event Enable Register
    pub EER: RORegister<u32>,
    _reserved4: [u32; 1],
    /// Event Enable Clear Register
    pub EECR: WORegister<u32>,
    _reserved5: [u32; 1],
    /// Event Enable Set Register
    pub EESR: WORegister<u32>,
    _reserved6: [u32; 1],
    /// Secondary Event Register
    pub SER: RORegister<u32>,
    _reserved7: [u32; 1],
    /// Secondary Event Clear Register
    pub SECR: WORegister<u32>,
    _reserved8: [u32; 3],
    /// Interrupt Enable Register
    pub IER: RORegister<u32>,
    _reserved9: [u32; 1],
    /// Interrupt Enable Clear Register
    pub IECR: WORegister<u32>,
    _reserved10: [u32; 1],
    /// Interrupt Enable Set Register
    pub IESR: WORegister<u32>,
    _reserved11: [u32; 1],
    /// Interrupt Pending Register
    pub IPR: RORegister<u32>,
    _reserved12: [u32; 1],
    /// Interrupt Clear Register
    pub ICR: WORegister<u32>,
    _reserved13: [u32; 1],
    /// Interrupt Evaluate Register
    pub IEVAL: WORegister<u32>,
    _reserved14: [u32; 1],
    /// QDMA Event Register
    pub QER: RORegister<u32>,
    /// QDMA Event Enable Register
    pub QEER: RORegister<u32>,
    /// QDMA Event Enable Clear Register
    pub QEECR: WORegister<u32>,
    /// QDMA Event Enable Set Register
    pub QEESR: WORegister<u32>,
    /// QDMA Secondary Event Register
    pub QSER: RORegister<u32>,
    /// QDMA Secondary Event Clear Register
    pub QSECR: WORegister<u32>,
    _reserved15: [u32; 90],
}

const _: () = assert!(core::mem::offset_of!(ChannelRegisters, IER) == 0x50);
const _: () = assert!(core::mem::offset_of!(ChannelRegisters, IPR) == 0x68);
const _: () = assert!(core::mem::offset_of!(ChannelRegisters, QER) == 0x80);
const _: () = assert!(core::mem::size_of::<ChannelRegisters>() == 0x200);

/// QDMA Channel Mapping fields.
pub mod QCHMAP {
    /// Parameter entry number
    pub mod PAENTRY {
        pub const offset: u32 = 5;
        pub const mask: u32 = 0x1ff << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Trigger word within the parameter entry
    pub mod TRWORD {
        pub const offset: u32 = 2;
        pub const mask: u32 = 0x7 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}

/// CC Status fields.
pub mod CCSTAT {
    /// DMA event active
    pub mod EVTACTV {
        pub const offset: u32 = 0;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// QDMA event active
    pub mod QEVTACTV {
        pub const offset: u32 = 1;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Transfer request active
    pub mod TRACTV {
        pub const offset: u32 = 2;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Write status active
    pub mod WSTATACTV {
        pub const offset: u32 = 3;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Channel controller active
    pub mod ACTV {
        pub const offset: u32 = 4;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Number of outstanding completion requests
    pub mod COMPACTV {
        pub const offset: u32 = 8;
        pub const mask: u32 = 0x3f << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Event queue 0 active
    pub mod QUEACTV0 {
        pub const offset: u32 = 16;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Event queue 1 active
    pub mod QUEACTV1 {
        pub const offset: u32 = 17;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}

/// Queue Status fields.
pub mod QSTAT {
    /// Start pointer of the queue
    pub mod STRTPTR {
        pub const offset: u32 = 0;
        pub const mask: u32 = 0xf << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Number of valid (pending) entries in the queue
    pub mod NUMVAL {
        pub const offset: u32 = 8;
        pub const mask: u32 = 0x1f << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Watermark: maximum queue depth seen
    pub mod WM {
        pub const offset: u32 = 16;
        pub const mask: u32 = 0x1f << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}

/// Parameter RAM entries.
pub mod param {
    use super::RWRegister;
    use core::ops::Index;

    /// One PaRAM entry: eight words describing a single transfer.
    #[repr(C)]
    pub struct ParamEntry {
        /// Option word
        pub OPT: RWRegister<u32>,
        /// Source address
        pub SRC: RWRegister<u32>,
        /// A count (low half) and B count (high half)
        pub A_B_CNT: RWRegister<u32>,
        /// Destination address
        pub DST: RWRegister<u32>,
        /// Source (low half) and destination (high half) B-index strides
        pub SRC_DST_BIDX: RWRegister<u32>,
        /// Link offset (low half) and B-count reload (high half)
        pub LINK_BCNTRLD: RWRegister<u32>,
        /// Source (low half) and destination (high half) C-index strides
        pub SRC_DST_CIDX: RWRegister<u32>,
        /// C count
        pub CCNT: RWRegister<u32>,
    }

    const _: () = assert!(core::mem::size_of::<ParamEntry>() == 32);

    /// QDMA trigger words address PaRAM entry words by number, so let
    /// entries be indexed the same way the hardware counts them.
    impl Index<usize> for ParamEntry {
        type Output = RWRegister<u32>;
        fn index(&self, word: usize) -> &RWRegister<u32> {
            match word {
                0 => &self.OPT,
                1 => &self.SRC,
                2 => &self.A_B_CNT,
                3 => &self.DST,
                4 => &self.SRC_DST_BIDX,
                5 => &self.LINK_BCNTRLD,
                6 => &self.SRC_DST_CIDX,
                7 => &self.CCNT,
                _ => panic!("PaRAM entries have eight words"),
            }
        }
    }

    /// Option word fields.
    pub mod OPT {
        /// Source address mode (0 = incrementing)
        pub mod SAM {
            pub const offset: u32 = 0;
            pub const mask: u32 = 1 << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// Destination address mode (0 = incrementing)
        pub mod DAM {
            pub const offset: u32 = 1;
            pub const mask: u32 = 1 << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// Synchronization dimension (0 = A, 1 = AB)
        pub mod SYNCDIM {
            pub const offset: u32 = 2;
            pub const mask: u32 = 1 << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// Static entry: not updated or linked after the transfer
        pub mod STATIC {
            pub const offset: u32 = 3;
            pub const mask: u32 = 1 << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// FIFO width, encoded as log2(bits) - 3
        pub mod FWID {
            pub const offset: u32 = 8;
            pub const mask: u32 = 0x7 << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// Completion signaling mode (1 = early)
        pub mod TCCMODE {
            pub const offset: u32 = 11;
            pub const mask: u32 = 1 << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// Transfer complete code
        pub mod TCC {
            pub const offset: u32 = 12;
            pub const mask: u32 = 0x3f << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// Transfer complete interrupt enable
        pub mod TCINTEN {
            pub const offset: u32 = 20;
            pub const mask: u32 = 1 << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// Intermediate transfer complete interrupt enable
        pub mod ITCINTEN {
            pub const offset: u32 = 21;
            pub const mask: u32 = 1 << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// Transfer complete chaining enable
        pub mod TCCHEN {
            pub const offset: u32 = 22;
            pub const mask: u32 = 1 << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// Intermediate transfer complete chaining enable
        pub mod ITCCHEN {
            pub const offset: u32 = 23;
            pub const mask: u32 = 1 << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// Privilege identifier of the programmer
        pub mod PRIVID {
            pub const offset: u32 = 24;
            pub const mask: u32 = 0xf << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
    }

    /// A/B count fields.
    pub mod A_B_CNT {
        /// Bytes per array
        pub mod ACNT {
            pub const offset: u32 = 0;
            pub const mask: u32 = 0xffff << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// Arrays per frame
        pub mod BCNT {
            pub const offset: u32 = 16;
            pub const mask: u32 = 0xffff << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
    }

    /// B-index stride fields.
    pub mod SRC_DST_BIDX {
        /// Source stride between arrays
        pub mod SRCBIDX {
            pub const offset: u32 = 0;
            pub const mask: u32 = 0xffff << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// Destination stride between arrays
        pub mod DSTBIDX {
            pub const offset: u32 = 16;
            pub const mask: u32 = 0xffff << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
    }

    /// Link and reload fields.
    pub mod LINK_BCNTRLD {
        /// PaRAM byte offset of the linked entry, or all-ones for none
        pub mod LINK {
            pub const offset: u32 = 0;
            pub const mask: u32 = 0xffff << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// B count reload for A-synchronized transfers
        pub mod BCNTRLD {
            pub const offset: u32 = 16;
            pub const mask: u32 = 0xffff << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
    }

    /// C-index stride fields.
    pub mod SRC_DST_CIDX {
        /// Source stride between frames
        pub mod SRCCIDX {
            pub const offset: u32 = 0;
            pub const mask: u32 = 0xffff << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
        /// Destination stride between frames
        pub mod DSTCIDX {
            pub const offset: u32 = 16;
            pub const mask: u32 = 0xffff << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
    }

    /// C count fields.
    pub mod CCNT {
        /// Frames per block
        pub mod CCNT {
            pub const offset: u32 = 0;
            pub const mask: u32 = 0xffff << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
    }
}
