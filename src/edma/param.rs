//! Transfer descriptors and their PaRAM encoding.
//!
//! A [`TransferDescriptor`] is the software-side picture of one PaRAM
//! entry. [`Edma::param`](super::Edma::param) translates an array of
//! them into hardware entries; everything hardware-encoding-shaped
//! (the option word, the link offset) lives here so it's computed in
//! exactly one place.

use crate::ral::cc::param::OPT;

use bitflags::bitflags;

bitflags! {
    /// Behavior flags for one transfer descriptor.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TransferFlags: u32 {
        /// AB-synchronized: one event moves a whole frame, not one array.
        const SYNC_AB = 1 << 0;
        /// Raise the completion code as a chained event when done.
        const EVENT = 1 << 1;
        /// Raise the completion interrupt when done.
        const INTERRUPT = 1 << 2;
        /// Signal completion when the last request is *submitted*
        /// rather than when the last write lands.
        const TCC_EARLY = 1 << 3;
        /// Last entry of a chain: mark the PaRAM entry static.
        const LAST = 1 << 4;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransferFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "TransferFlags({=u32:b})", self.bits());
    }
}

/// Describes one DMA transfer, or one link in a chain of them.
///
/// The caller owns the descriptor array and declares, per descriptor,
/// which PaRAM slot it occupies (`index`) and which completion code it
/// signals (`tcc`). Counts follow the EDMA3 three-level addressing
/// scheme: `acnt` bytes per array, `bcnt` arrays per frame, `ccnt`
/// frames per block.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferDescriptor {
    /// Source address.
    pub src: u32,
    /// Destination address.
    pub dst: u32,
    /// Bytes per array.
    pub acnt: u16,
    /// Arrays per frame.
    pub bcnt: u16,
    /// Frames per block.
    pub ccnt: u16,
    /// Source stride between consecutive arrays, in bytes.
    pub src_bidx: i16,
    /// Destination stride between consecutive arrays, in bytes.
    pub dst_bidx: i16,
    /// Source stride between consecutive frames, in bytes.
    pub src_cidx: i16,
    /// Destination stride between consecutive frames, in bytes.
    pub dst_cidx: i16,
    /// PaRAM slot of the next descriptor in the chain, if any.
    pub link: Option<u8>,
    /// Privilege identifier stamped on the transfer.
    pub priv_id: u8,
    /// Transfer complete code. May differ from the channel number for
    /// intermediate links of a chain.
    pub tcc: u8,
    /// PaRAM slot this descriptor occupies.
    pub index: u8,
    /// Behavior flags.
    pub flags: TransferFlags,
}

impl TransferDescriptor {
    /// A null descriptor moves nothing and terminates a chain. The
    /// hardware treats its all-zero entry as a no-op.
    pub fn is_null(&self) -> bool {
        self.acnt == 0 && self.bcnt == 0 && self.ccnt == 0
    }

    /// A dummy descriptor has some, but not all, counts zero. It moves
    /// no data but still fires its side effects (events, interrupts).
    pub fn is_dummy(&self) -> bool {
        !self.is_null() && (self.acnt == 0 || self.bcnt == 0 || self.ccnt == 0)
    }

    /// Builds the PaRAM option word. Source and destination address
    /// modes are always incrementing in this driver.
    pub(crate) fn options(&self) -> u32 {
        let mut opt = (u32::from(self.tcc) << OPT::TCC::offset) & OPT::TCC::mask
            | (u32::from(self.priv_id) << OPT::PRIVID::offset) & OPT::PRIVID::mask
            | FWID_32BIT;
        if self.flags.contains(TransferFlags::SYNC_AB) {
            opt |= OPT::SYNCDIM::mask;
        }
        if self.flags.contains(TransferFlags::LAST) {
            opt |= OPT::STATIC::mask;
        }
        if self.flags.contains(TransferFlags::TCC_EARLY) {
            opt |= OPT::TCCMODE::mask;
        }
        if self.flags.contains(TransferFlags::INTERRUPT) {
            opt |= OPT::TCINTEN::mask;
        }
        if self.flags.contains(TransferFlags::EVENT) {
            opt |= OPT::TCCHEN::mask;
        }
        opt
    }

    /// The raw link field for this descriptor's entry.
    pub(crate) fn link_value(&self) -> u16 {
        self.link.map_or(LINK_NULL, link_of)
    }
}

/// FIFO width field preset for 32-bit accesses.
const FWID_32BIT: u32 = 0x2 << OPT::FWID::offset;

/// Link field value meaning "no linked entry".
pub const LINK_NULL: u16 = 0xffff;

/// Encodes a PaRAM slot number as a link field value.
///
/// Links are byte offsets from the channel controller base; the PaRAM
/// table starts at 0x4000 and entries are 32 bytes.
pub fn link_of(index: u8) -> u16 {
    0x4000 + (u16::from(index) << 5)
}

/// Decodes a link field value back to a PaRAM slot number.
///
/// Returns `None` for [`LINK_NULL`] and for values that don't address
/// an entry boundary inside the table.
pub fn index_of(link: u16) -> Option<u8> {
    if link == LINK_NULL || link < 0x4000 || link & 0x1f != 0 {
        return None;
    }
    let index = (link - 0x4000) >> 5;
    (index < 128).then(|| index as u8)
}
