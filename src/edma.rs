//! EDMA3 channel controller driver.
//!
//! [`Edma`] manages one channel controller. It's configured with a
//! pointer to the controller's register block, and it exposes the
//! transfer lifecycle as explicit steps over a caller-owned
//! [`ChannelConfig`]:
//!
//! 1. [`init`](Edma::init) binds the channel to a queue and region.
//! 2. [`param`](Edma::param) writes the descriptors into PaRAM.
//! 3. [`interrupt`](Edma::interrupt) arms completion signaling.
//! 4. [`transfer`](Edma::transfer) triggers (or arms the trigger for)
//!    the transfer.
//! 5. [`completed`](Edma::completed) polls for completion;
//!    [`status`](Edma::status) inspects controller-wide activity.
//!
//! ```no_run
//! use am18x_hal::edma::{ChannelConfig, Edma, EventQueue, Region, Trigger, TransferDescriptor};
//! use am18x_hal::edma::TransferFlags;
//! # const CC0_PTR: *const () = core::ptr::null();
//! # fn source() -> u32 { 0 }
//! # fn sink() -> u32 { 0 }
//!
//! // Safety: address and channel count are valid for this target.
//! static EDMA0: Edma<32> = unsafe { Edma::new_cc0(CC0_PTR) };
//!
//! let descriptors = [TransferDescriptor {
//!     src: source(),
//!     dst: sink(),
//!     acnt: 256,
//!     bcnt: 1,
//!     ccnt: 1,
//!     tcc: 7,
//!     index: 7,
//!     flags: TransferFlags::INTERRUPT | TransferFlags::LAST,
//!     ..Default::default()
//! }];
//! let config = ChannelConfig {
//!     descriptors: &descriptors,
//!     channel: 7,
//!     region: Region::Global,
//!     queue: EventQueue::Q0,
//!     trigger: Trigger::Manual,
//! };
//!
//! EDMA0.init(&config);
//! EDMA0.param(&config);
//! EDMA0.interrupt(&config);
//! EDMA0.transfer(&config).unwrap();
//! while !EDMA0.completed(&config) { /* spin, or yield */ }
//! ```
//!
//! The transfer itself runs inside the hardware; this driver never
//! blocks. [`completed`](Edma::completed) is a poll, not a wait.

mod param;

pub use param::{index_of, link_of, TransferDescriptor, TransferFlags, LINK_NULL};

use crate::ral::{self, cc, write_reg, Kind, Static};
use crate::{Error, Result};

use core::cell::Cell;

/// PaRAM word whose write triggers a QDMA transfer. Word 7 is CCNT,
/// the last word `param` writes, so a freshly written entry self-arms
/// in QDMA mode.
const TRIGGER_WORD: u32 = 7;

/// Shadow-region selection for channel operations.
///
/// Regions gate which software context may touch which channels. The
/// global view bypasses region access checks entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    /// Shadow region 0.
    Region0,
    /// Shadow region 1.
    Region1,
    /// The global channel registers; no access-enable bookkeeping.
    Global,
}

impl Region {
    fn shadow(self) -> Option<usize> {
        match self {
            Region::Region0 => Some(0),
            Region::Region1 => Some(1),
            Region::Global => None,
        }
    }
}

/// Hardware event queue feeding a transfer controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum EventQueue {
    /// Event queue 0. Both controllers have it.
    Q0 = 0,
    /// Event queue 1. CC0 only.
    Q1 = 1,
}

/// How a channel's transfers start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// A bound hardware event starts the transfer asynchronously.
    Event,
    /// Software starts the transfer by setting the event bit.
    Manual,
    /// Writing the trigger word of the mapped PaRAM entry starts the
    /// transfer.
    Qdma,
}

/// Software-tracked lifecycle of a channel.
///
/// The hardware doesn't care about ordering, but a transfer triggered
/// before its PaRAM entries exist reads whatever stale descriptors the
/// slots held. [`Edma::transfer`] refuses to do that.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelState {
    /// No PaRAM contents written yet.
    Unconfigured,
    /// PaRAM entries written.
    Parametrized,
    /// Completion signaling armed.
    Armed,
    /// Transfer triggered (or trigger armed, for event channels).
    Triggered,
}

/// Everything the driver needs to know about one logical channel.
///
/// The descriptor array is borrowed; the driver copies it into PaRAM
/// during [`Edma::param`] and never looks at it again afterward.
/// Status queries read hardware, not descriptors.
#[derive(Clone, Copy)]
pub struct ChannelConfig<'a> {
    /// Transfer descriptors, one per PaRAM entry.
    pub descriptors: &'a [TransferDescriptor],
    /// DMA channel (0..32) or QDMA channel (0..8) number.
    pub channel: u8,
    /// Which privilege region's shadow registers to operate through.
    pub region: Region,
    /// Which event queue services the channel.
    pub queue: EventQueue,
    /// How transfers start.
    pub trigger: Trigger,
}

/// Decoded controller activity, from a single CCSTAT read.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerStatus {
    /// Raw CCSTAT value the rest of the fields were decoded from.
    pub raw: u32,
    /// A DMA event is being processed.
    pub event_active: bool,
    /// A QDMA event is being processed.
    pub qdma_event_active: bool,
    /// A transfer request is outstanding to a transfer controller.
    pub transfer_request_active: bool,
    /// Completion status writes are outstanding.
    pub write_status_active: bool,
    /// The channel controller as a whole is busy.
    pub controller_active: bool,
    /// Per-queue busy flags. Index 1 is always clear on CC1.
    pub queue_active: [bool; 2],
    /// Completion codes detected but not yet serviced.
    pub completions_outstanding: u8,
    /// Events waiting in each queue. Index 1 is always zero on CC1.
    pub queue_pending: [u8; 2],
}

/// An EDMA3 channel controller driver.
///
/// `CHANNELS` is the DMA channel count of the controller; both AM18x
/// controllers have 32. The driver is designed to live in a `static`:
///
/// ```no_run
/// use am18x_hal::edma::Edma;
/// # const CC0_PTR: *const () = core::ptr::null();
///
/// // Safety: address and channel count are valid for this target.
/// static EDMA0: Edma<32> = unsafe { Edma::new_cc0(CC0_PTR) };
/// ```
pub struct Edma<const CHANNELS: usize> {
    cc: Static<cc::RegisterBlock>,
    kind: Kind,
    state: [Cell<ChannelState>; CHANNELS],
}

// Safety: OK to allocate the driver in a static context. The AM18x is
// single-core; callers interleaving channel operations from interrupt
// context are responsible for their own serialization.
unsafe impl<const CHANNELS: usize> Sync for Edma<CHANNELS> {}

impl<const CHANNELS: usize> Edma<CHANNELS> {
    const UNCONFIGURED: Cell<ChannelState> = Cell::new(ChannelState::Unconfigured);

    /// Create the driver for channel controller 0.
    ///
    /// CC0 feeds event queues 0 and 1 and exposes the channel-to-queue
    /// mapping registers.
    ///
    /// # Safety
    ///
    /// `cc` must point to the start of the CC0 register block. An
    /// incorrect `CHANNELS` value breaks channel bounds checking.
    pub const unsafe fn new_cc0(cc: *const ()) -> Self {
        Self {
            cc: Static(cc.cast()),
            kind: Kind::Cc0,
            state: [Self::UNCONFIGURED; CHANNELS],
        }
    }

    /// Create the driver for channel controller 1.
    ///
    /// CC1 feeds event queue 0 only; queue mapping is fixed.
    ///
    /// # Safety
    ///
    /// Same contract as [`new_cc0`](Self::new_cc0), for the CC1 block.
    pub const unsafe fn new_cc1(cc: *const ()) -> Self {
        Self {
            cc: Static(cc.cast()),
            kind: Kind::Cc1,
            state: [Self::UNCONFIGURED; CHANNELS],
        }
    }

    /// The tracked software state of a channel.
    pub fn channel_state(&self, channel: u8) -> ChannelState {
        self.state[usize::from(channel)].get()
    }

    /// The channel event/interrupt registers the config operates on:
    /// a shadow region's, or the global set.
    fn channel_registers(&self, region: Region) -> &cc::ChannelRegisters {
        match region.shadow() {
            Some(m) => &self.cc.SHADOW[m],
            None => &self.cc.GLOBAL,
        }
    }

    /// Binds the channel to its queue, region, and (for QDMA) PaRAM
    /// slot, and enables it.
    ///
    /// Register writes can't fail; there is nothing to return.
    ///
    /// # Panics
    ///
    /// Panics if the channel number is out of range for the trigger
    /// mode.
    pub fn init(&self, config: &ChannelConfig) {
        let channel = usize::from(config.channel);
        assert!(channel < CHANNELS);
        let cc = &self.cc;

        if let Trigger::Qdma = config.trigger {
            assert!(channel < cc.QCHMAP.len());
            // Map the QDMA channel onto its PaRAM slot. The slot is
            // the first descriptor's; follow-on links live wherever
            // their own `index` says.
            let slot = config.descriptors.first().map_or(0, |d| u32::from(d.index));
            let map = (slot << cc::QCHMAP::PAENTRY::offset) & cc::QCHMAP::PAENTRY::mask
                | (TRIGGER_WORD << cc::QCHMAP::TRWORD::offset) & cc::QCHMAP::TRWORD::mask;
            cc.QCHMAP[channel].write(map);
        }

        // Whitelist the channel in the region's access-enable set.
        if let Some(region) = config.region.shadow() {
            match config.trigger {
                Trigger::Qdma => {
                    let qrae = &cc.QRAE[region];
                    qrae.write(qrae.read() | 1 << channel);
                }
                _ => {
                    let drae = &cc.DRAE[region];
                    drae.write(drae.read() | 1 << channel);
                }
            }
        }

        match config.trigger {
            // QDMA needs no enable here; it free-runs on trigger-word
            // writes once QEESR is set at transfer time.
            Trigger::Qdma => {}
            Trigger::Event | Trigger::Manual => {
                self.channel_registers(config.region).EESR.write(1 << channel);
            }
        }

        // Only CC0 maps channels onto queues; CC1 has a single queue.
        if self.kind == Kind::Cc0 {
            match config.trigger {
                Trigger::Qdma => map_queue(&cc.QDMAQNUM, channel, config.queue),
                _ => map_queue(&cc.DMAQNUM[channel / 8], channel % 8, config.queue),
            }
        }
    }

    /// Writes every descriptor into its declared PaRAM slot.
    ///
    /// This is a pure translation: for each descriptor, compute the
    /// option word and field packings, write the entry. Null and dummy
    /// descriptors are written like any other; an all-zero entry is a
    /// hardware no-op.
    pub fn param(&self, config: &ChannelConfig) {
        let channel = usize::from(config.channel);
        assert!(channel < CHANNELS);

        for desc in config.descriptors {
            let entry = &self.cc.PARAM[usize::from(desc.index)];
            write_reg!(ral::cc::param, entry, OPT, desc.options());
            write_reg!(ral::cc::param, entry, SRC, desc.src);
            write_reg!(
                ral::cc::param,
                entry,
                A_B_CNT,
                ACNT: u32::from(desc.acnt),
                BCNT: u32::from(desc.bcnt)
            );
            write_reg!(ral::cc::param, entry, DST, desc.dst);
            write_reg!(
                ral::cc::param,
                entry,
                SRC_DST_BIDX,
                SRCBIDX: u32::from(desc.src_bidx as u16),
                DSTBIDX: u32::from(desc.dst_bidx as u16)
            );
            // BCNTRLD goes out unconditionally. AB-synchronized entries
            // are documented to ignore it, but see the data sheet
            // errata history before relying on that.
            write_reg!(
                ral::cc::param,
                entry,
                LINK_BCNTRLD,
                LINK: u32::from(desc.link_value()),
                BCNTRLD: u32::from(desc.bcnt)
            );
            write_reg!(
                ral::cc::param,
                entry,
                SRC_DST_CIDX,
                SRCCIDX: u32::from(desc.src_cidx as u16),
                DSTCIDX: u32::from(desc.dst_cidx as u16)
            );
            write_reg!(ral::cc::param, entry, CCNT, CCNT: u32::from(desc.ccnt));
        }

        if self.state[channel].get() == ChannelState::Unconfigured {
            self.state[channel].set(ChannelState::Parametrized);
        }
    }

    /// Arms completion interrupts and chained events for every
    /// descriptor that asked for them, in descriptor order.
    ///
    /// Call this before [`transfer`](Self::transfer); interrupts armed
    /// after the transfer finishes are missed, not latched late.
    pub fn interrupt(&self, config: &ChannelConfig) {
        let channel = usize::from(config.channel);
        assert!(channel < CHANNELS);
        let regs = self.channel_registers(config.region);

        for desc in config.descriptors {
            let tcc = u32::from(desc.tcc);
            if desc.flags.contains(TransferFlags::INTERRUPT) {
                if desc.tcc != config.channel {
                    // A chained descriptor signals on its own code, so
                    // the region must be allowed to see that code too.
                    if let Some(region) = config.region.shadow() {
                        let drae = &self.cc.DRAE[region];
                        drae.write(drae.read() | 1 << tcc);
                    }
                }
                regs.IESR.write(1 << tcc);
            }
            if desc.flags.contains(TransferFlags::EVENT) {
                regs.EESR.write(1 << tcc);
            }
        }

        if self.state[channel].get() == ChannelState::Parametrized {
            self.state[channel].set(ChannelState::Armed);
        }
    }

    /// Triggers the transfer, or arms its trigger.
    ///
    /// Stale event state is cleared first. Then: QDMA channels get
    /// their QDMA event enabled and their trigger word rewritten to
    /// itself (the documented self-trigger); manually triggered
    /// channels get their event bit set; event-triggered channels need
    /// nothing here, since the bound hardware event starts the
    /// transfer on its own schedule.
    ///
    /// Fails with [`Error::NotParametrized`] if [`param`](Self::param)
    /// hasn't run for this channel.
    pub fn transfer(&self, config: &ChannelConfig) -> Result<()> {
        let channel = usize::from(config.channel);
        assert!(channel < CHANNELS);
        if self.state[channel].get() == ChannelState::Unconfigured {
            return Err(Error::NotParametrized);
        }
        let regs = self.channel_registers(config.region);

        // Clear-before-arm: drop any event state left over from a
        // previous use of the channel.
        regs.ECR.write(1 << channel);
        regs.SECR.write(1 << channel);
        self.cc.EMCR.write(1 << channel);

        match config.trigger {
            Trigger::Qdma => {
                regs.QEESR.write(1 << channel);
                let map = self.cc.QCHMAP[channel].read();
                let slot = (map & cc::QCHMAP::PAENTRY::mask) >> cc::QCHMAP::PAENTRY::offset;
                let word = (map & cc::QCHMAP::TRWORD::mask) >> cc::QCHMAP::TRWORD::offset;
                // Writing the trigger word back to itself starts the
                // transfer without changing the entry.
                let trigger = &self.cc.PARAM[slot as usize][word as usize];
                trigger.write(trigger.read());
            }
            Trigger::Manual => regs.ESR.write(1 << channel),
            Trigger::Event => {}
        }

        self.state[channel].set(ChannelState::Triggered);
        Ok(())
    }

    /// Polls whether every descriptor that requested a completion
    /// interrupt has signaled.
    ///
    /// Returns `false`, with no side effects, while any requested
    /// completion code is still clear. Once all are pending, clears
    /// exactly those codes and returns `true`, so the next poll for
    /// the same config reports `false` again until a new transfer
    /// completes.
    ///
    /// A config with no interrupt-requesting descriptors is complete
    /// on the first poll; don't poll fire-and-forget transfers.
    pub fn completed(&self, config: &ChannelConfig) -> bool {
        let regs = self.channel_registers(config.region);
        let pending = regs.IPR.read();

        let mut requested = 0u32;
        for desc in config.descriptors {
            if desc.flags.contains(TransferFlags::INTERRUPT) {
                requested |= 1 << u32::from(desc.tcc);
            }
        }
        if pending & requested != requested {
            return false;
        }
        // Acknowledge exactly the codes we were watching.
        if requested != 0 {
            regs.ICR.write(requested);
        }
        true
    }

    /// Decodes controller-wide activity from one CCSTAT read.
    ///
    /// Returns `None` when no activity bit is set, meaning nothing is
    /// in flight anywhere on the controller. Queue 1 fields are reported
    /// only on CC0.
    pub fn status(&self) -> Option<ControllerStatus> {
        let cc = &self.cc;
        let raw = cc.CCSTAT.read();

        const ACTIVITY: u32 = cc::CCSTAT::EVTACTV::mask
            | cc::CCSTAT::QEVTACTV::mask
            | cc::CCSTAT::TRACTV::mask
            | cc::CCSTAT::WSTATACTV::mask
            | cc::CCSTAT::ACTV::mask
            | cc::CCSTAT::COMPACTV::mask
            | cc::CCSTAT::QUEACTV0::mask
            | cc::CCSTAT::QUEACTV1::mask;
        if raw & ACTIVITY == 0 {
            return None;
        }

        let queues = match self.kind {
            Kind::Cc0 => 2,
            Kind::Cc1 => 1,
        };
        let mut queue_active = [false; 2];
        let mut queue_pending = [0u8; 2];
        queue_active[0] = raw & cc::CCSTAT::QUEACTV0::mask != 0;
        if queues > 1 {
            queue_active[1] = raw & cc::CCSTAT::QUEACTV1::mask != 0;
        }
        for (queue, pending) in queue_pending.iter_mut().take(queues).enumerate() {
            let qstat = cc.QSTAT[queue].read();
            *pending = ((qstat & cc::QSTAT::NUMVAL::mask) >> cc::QSTAT::NUMVAL::offset) as u8;
        }

        Some(ControllerStatus {
            raw,
            event_active: raw & cc::CCSTAT::EVTACTV::mask != 0,
            qdma_event_active: raw & cc::CCSTAT::QEVTACTV::mask != 0,
            transfer_request_active: raw & cc::CCSTAT::TRACTV::mask != 0,
            write_status_active: raw & cc::CCSTAT::WSTATACTV::mask != 0,
            controller_active: raw & cc::CCSTAT::ACTV::mask != 0,
            queue_active,
            completions_outstanding: ((raw & cc::CCSTAT::COMPACTV::mask)
                >> cc::CCSTAT::COMPACTV::offset) as u8,
            queue_pending,
        })
    }
}

/// Writes one channel's 3-bit queue-number field. Fields sit on 4-bit
/// boundaries, eight channels per register.
fn map_queue(reg: &ral_registers::RWRegister<u32>, slot: usize, queue: EventQueue) {
    let shift = (slot * 4) as u32;
    let value = reg.read() & !(0x7 << shift) | (queue as u32) << shift;
    reg.write(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{fake, hw_read, hw_write};
    use std::boxed::Box;

    struct Fixture {
        block: Box<cc::RegisterBlock>,
    }

    impl Fixture {
        fn new() -> Self {
            Self { block: fake() }
        }

        fn cc0(&self) -> Edma<32> {
            // Safety: the fixture owns a real (heap) register block.
            unsafe { Edma::new_cc0((&*self.block as *const cc::RegisterBlock).cast()) }
        }

        fn cc1(&self) -> Edma<32> {
            // Safety: as above.
            unsafe { Edma::new_cc1((&*self.block as *const cc::RegisterBlock).cast()) }
        }
    }

    /// Plays the hardware's part of interrupt acknowledgement: apply
    /// the W1C the driver wrote to ICR against IPR.
    fn ack_completions(regs: &cc::ChannelRegisters) {
        let acked = hw_read(&regs.ICR);
        hw_write(&regs.IPR, hw_read(&regs.IPR) & !acked);
        hw_write(&regs.ICR, 0);
    }

    fn single_descriptor(channel: u8) -> TransferDescriptor {
        TransferDescriptor {
            src: 0x8000_0000,
            dst: 0xc000_0000,
            acnt: 256,
            bcnt: 1,
            ccnt: 1,
            tcc: channel,
            index: channel,
            flags: TransferFlags::INTERRUPT | TransferFlags::LAST,
            ..Default::default()
        }
    }

    #[test]
    fn param_round_trips_descriptor_fields() {
        let fx = Fixture::new();
        let edma = fx.cc0();
        let descriptors = [TransferDescriptor {
            src: 0x1234_5678,
            dst: 0x9abc_def0,
            acnt: 512,
            bcnt: 16,
            ccnt: 3,
            src_bidx: 512,
            dst_bidx: -512,
            src_cidx: 32,
            dst_cidx: -32,
            link: Some(5),
            priv_id: 1,
            tcc: 9,
            index: 40,
            flags: TransferFlags::SYNC_AB | TransferFlags::INTERRUPT,
        }];
        let config = ChannelConfig {
            descriptors: &descriptors,
            channel: 9,
            region: Region::Global,
            queue: EventQueue::Q0,
            trigger: Trigger::Manual,
        };
        edma.param(&config);

        let entry = &fx.block.PARAM[40];
        assert_eq!(entry.SRC.read(), 0x1234_5678);
        assert_eq!(entry.DST.read(), 0x9abc_def0);
        assert_eq!(entry.A_B_CNT.read() & 0xffff, 512);
        assert_eq!(entry.A_B_CNT.read() >> 16, 16);
        assert_eq!(entry.CCNT.read(), 3);
        assert_eq!(entry.SRC_DST_BIDX.read() & 0xffff, 512);
        assert_eq!((entry.SRC_DST_BIDX.read() >> 16) as u16 as i16, -512);
        assert_eq!(entry.SRC_DST_CIDX.read() & 0xffff, 32);
        assert_eq!((entry.SRC_DST_CIDX.read() >> 16) as u16 as i16, -32);

        let link_bcntrld = entry.LINK_BCNTRLD.read();
        assert_eq!((link_bcntrld & 0xffff) as u16, link_of(5));
        // BCNTRLD is written even though this entry is AB-synchronized.
        assert_eq!(link_bcntrld >> 16, 16);

        let opt = entry.OPT.read();
        assert_ne!(opt & cc::param::OPT::SYNCDIM::mask, 0);
        assert_ne!(opt & cc::param::OPT::TCINTEN::mask, 0);
        assert_eq!((opt & cc::param::OPT::TCC::mask) >> cc::param::OPT::TCC::offset, 9);
    }

    #[test]
    fn unlinked_entry_gets_null_link() {
        let fx = Fixture::new();
        let edma = fx.cc0();
        let descriptors = [single_descriptor(4)];
        let config = ChannelConfig {
            descriptors: &descriptors,
            channel: 4,
            region: Region::Global,
            queue: EventQueue::Q0,
            trigger: Trigger::Manual,
        };
        edma.param(&config);
        let entry = &fx.block.PARAM[4];
        assert_eq!((entry.LINK_BCNTRLD.read() & 0xffff) as u16, LINK_NULL);
    }

    #[test]
    fn transfer_rejected_before_param() {
        let fx = Fixture::new();
        let edma = fx.cc0();
        let descriptors = [single_descriptor(7)];
        let config = ChannelConfig {
            descriptors: &descriptors,
            channel: 7,
            region: Region::Global,
            queue: EventQueue::Q0,
            trigger: Trigger::Manual,
        };
        assert_eq!(edma.transfer(&config), Err(Error::NotParametrized));
        assert_eq!(edma.channel_state(7), ChannelState::Unconfigured);

        edma.param(&config);
        assert_eq!(edma.channel_state(7), ChannelState::Parametrized);
        edma.transfer(&config).unwrap();
        assert_eq!(edma.channel_state(7), ChannelState::Triggered);
        // Manual trigger: the event-set bit went out.
        assert_eq!(hw_read(&fx.block.GLOBAL.ESR), 1 << 7);
        // Clear-before-arm hit the event-clear registers first.
        assert_eq!(hw_read(&fx.block.GLOBAL.ECR), 1 << 7);
        assert_eq!(hw_read(&fx.block.GLOBAL.SECR), 1 << 7);
        assert_eq!(hw_read(&fx.block.EMCR), 1 << 7);
    }

    #[test]
    fn completion_poll_is_idempotent_until_hardware_signals() {
        let fx = Fixture::new();
        let edma = fx.cc0();
        let descriptors = [single_descriptor(5)];
        let config = ChannelConfig {
            descriptors: &descriptors,
            channel: 5,
            region: Region::Global,
            queue: EventQueue::Q0,
            trigger: Trigger::Manual,
        };
        edma.param(&config);

        // Not complete, and polling changed nothing.
        assert!(!edma.completed(&config));
        assert!(!edma.completed(&config));
        assert_eq!(hw_read(&fx.block.GLOBAL.IPR), 0);
        assert_eq!(hw_read(&fx.block.GLOBAL.ICR), 0);

        // Hardware signals completion on TCC 5.
        hw_write(&fx.block.GLOBAL.IPR, 1 << 5);
        assert!(edma.completed(&config));
        assert_eq!(hw_read(&fx.block.GLOBAL.ICR), 1 << 5);
        ack_completions(&fx.block.GLOBAL);

        // The code was consumed; the next poll waits again.
        assert!(!edma.completed(&config));
    }

    #[test]
    fn completion_waits_for_every_requested_code() {
        let fx = Fixture::new();
        let edma = fx.cc0();
        let descriptors = [
            TransferDescriptor {
                acnt: 64,
                bcnt: 1,
                ccnt: 1,
                tcc: 3,
                index: 10,
                link: Some(11),
                flags: TransferFlags::INTERRUPT | TransferFlags::EVENT,
                ..Default::default()
            },
            TransferDescriptor {
                acnt: 64,
                bcnt: 1,
                ccnt: 1,
                tcc: 6,
                index: 11,
                flags: TransferFlags::INTERRUPT | TransferFlags::LAST,
                ..Default::default()
            },
        ];
        let config = ChannelConfig {
            descriptors: &descriptors,
            channel: 3,
            region: Region::Global,
            queue: EventQueue::Q0,
            trigger: Trigger::Event,
        };
        edma.param(&config);

        hw_write(&fx.block.GLOBAL.IPR, 1 << 3);
        assert!(!edma.completed(&config));
        hw_write(&fx.block.GLOBAL.IPR, 1 << 3 | 1 << 6);
        assert!(edma.completed(&config));
        assert_eq!(hw_read(&fx.block.GLOBAL.ICR), 1 << 3 | 1 << 6);
    }

    #[test]
    fn interrupt_whitelists_foreign_codes_in_region() {
        let fx = Fixture::new();
        let edma = fx.cc0();
        let descriptors = [
            TransferDescriptor {
                acnt: 64,
                bcnt: 1,
                ccnt: 1,
                tcc: 20, // chained: signals on a code that isn't the channel
                index: 10,
                flags: TransferFlags::INTERRUPT | TransferFlags::EVENT,
                ..Default::default()
            },
        ];
        let config = ChannelConfig {
            descriptors: &descriptors,
            channel: 3,
            region: Region::Region1,
            queue: EventQueue::Q0,
            trigger: Trigger::Event,
        };
        edma.param(&config);
        edma.interrupt(&config);

        assert_eq!(hw_read(&fx.block.DRAE[1]), 1 << 20);
        let shadow = &fx.block.SHADOW[1];
        assert_eq!(hw_read(&shadow.IESR), 1 << 20);
        assert_eq!(hw_read(&shadow.EESR), 1 << 20);
        // Global sets stay untouched.
        assert_eq!(hw_read(&fx.block.GLOBAL.IESR), 0);
    }

    #[test]
    fn init_binds_channel_to_region_and_queue() {
        let fx = Fixture::new();
        let edma = fx.cc0();
        let descriptors = [single_descriptor(9)];
        let config = ChannelConfig {
            descriptors: &descriptors,
            channel: 9,
            region: Region::Region0,
            queue: EventQueue::Q1,
            trigger: Trigger::Manual,
        };
        edma.init(&config);

        assert_eq!(hw_read(&fx.block.DRAE[0]), 1 << 9);
        assert_eq!(hw_read(&fx.block.SHADOW[0].EESR), 1 << 9);
        // Channel 9 is field 1 of DMAQNUM[1]; queue 1.
        assert_eq!(fx.block.DMAQNUM[1].read(), 1 << 4);
    }

    #[test]
    fn cc1_skips_queue_mapping() {
        let fx = Fixture::new();
        let edma = fx.cc1();
        let descriptors = [single_descriptor(9)];
        let config = ChannelConfig {
            descriptors: &descriptors,
            channel: 9,
            region: Region::Global,
            queue: EventQueue::Q0,
            trigger: Trigger::Manual,
        };
        edma.init(&config);
        assert_eq!(fx.block.DMAQNUM[1].read(), 0);
        // Global region: no access-enable bookkeeping either.
        assert_eq!(hw_read(&fx.block.DRAE[0]), 0);
        assert_eq!(hw_read(&fx.block.GLOBAL.EESR), 1 << 9);
    }

    #[test]
    fn qdma_maps_slot_and_self_triggers() {
        let fx = Fixture::new();
        let edma = fx.cc0();
        let descriptors = [TransferDescriptor {
            src: 0x1000,
            dst: 0x2000,
            acnt: 32,
            bcnt: 4,
            ccnt: 2,
            tcc: 3,
            index: 64,
            flags: TransferFlags::INTERRUPT | TransferFlags::LAST,
            ..Default::default()
        }];
        let config = ChannelConfig {
            descriptors: &descriptors,
            channel: 3,
            region: Region::Region1,
            queue: EventQueue::Q1,
            trigger: Trigger::Qdma,
        };
        edma.init(&config);

        let map = fx.block.QCHMAP[3].read();
        assert_eq!((map & cc::QCHMAP::PAENTRY::mask) >> cc::QCHMAP::PAENTRY::offset, 64);
        assert_eq!((map & cc::QCHMAP::TRWORD::mask) >> cc::QCHMAP::TRWORD::offset, 7);
        // QDMA region enable goes through QRAE, not DRAE.
        assert_eq!(hw_read(&fx.block.QRAE[1]), 1 << 3);
        assert_eq!(hw_read(&fx.block.DRAE[1]), 0);
        // QDMA channel 3 is field 3 of QDMAQNUM; queue 1.
        assert_eq!(fx.block.QDMAQNUM.read(), 1 << 12);

        edma.param(&config);
        edma.transfer(&config).unwrap();
        assert_eq!(hw_read(&fx.block.SHADOW[1].QEESR), 1 << 3);
        // The trigger word (CCNT) was rewritten to itself.
        assert_eq!(fx.block.PARAM[64].CCNT.read(), 2);
    }

    #[test]
    fn status_is_none_when_idle() {
        let fx = Fixture::new();
        let edma = fx.cc0();
        assert!(edma.status().is_none());
    }

    #[test]
    fn status_decodes_activity() {
        let fx = Fixture::new();
        let raw = cc::CCSTAT::ACTV::mask
            | cc::CCSTAT::TRACTV::mask
            | cc::CCSTAT::QUEACTV1::mask
            | 3 << cc::CCSTAT::COMPACTV::offset;
        hw_write(&fx.block.CCSTAT, raw);
        hw_write(&fx.block.QSTAT[0], 2 << cc::QSTAT::NUMVAL::offset);
        hw_write(&fx.block.QSTAT[1], 5 << cc::QSTAT::NUMVAL::offset);

        let status = fx.cc0().status().unwrap();
        assert!(status.controller_active);
        assert!(status.transfer_request_active);
        assert!(!status.event_active);
        assert!(!status.qdma_event_active);
        assert!(!status.write_status_active);
        assert_eq!(status.completions_outstanding, 3);
        assert_eq!(status.queue_active, [false, true]);
        assert_eq!(status.queue_pending, [2, 5]);

        // CC1 owns a single queue: queue 1 reports nothing.
        let status = fx.cc1().status().unwrap();
        assert_eq!(status.queue_active, [false, false]);
        assert_eq!(status.queue_pending, [2, 0]);
    }

    #[test]
    fn end_to_end_event_channel() {
        let fx = Fixture::new();
        let edma = fx.cc0();
        let descriptors = [TransferDescriptor {
            src: 0x8000_0000,
            dst: 0x8001_0000,
            acnt: 256,
            bcnt: 1,
            ccnt: 1,
            tcc: 2,
            index: 2,
            flags: TransferFlags::INTERRUPT | TransferFlags::LAST,
            ..Default::default()
        }];
        let config = ChannelConfig {
            descriptors: &descriptors,
            channel: 2,
            region: Region::Region0,
            queue: EventQueue::Q0,
            trigger: Trigger::Event,
        };

        edma.init(&config);
        edma.param(&config);
        edma.interrupt(&config);
        assert_eq!(edma.channel_state(2), ChannelState::Armed);
        // TCC equals the channel number: no extra DRAE grant needed
        // beyond init's own.
        assert_eq!(hw_read(&fx.block.DRAE[0]), 1 << 2);
        assert_eq!(hw_read(&fx.block.SHADOW[0].IESR), 1 << 2);

        // The bound hardware event fires and the transfer completes.
        let shadow = &fx.block.SHADOW[0];
        hw_write(&shadow.IPR, 1 << 2);
        assert!(edma.completed(&config));
        ack_completions(shadow);
        // Poll-then-clear: the completion was consumed.
        assert!(!edma.completed(&config));
    }
}
