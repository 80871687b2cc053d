//! Device clock tree with lazy frequency computation.
//!
//! The AM18x derives every device clock from one crystal through two
//! cascaded PLL controllers, a handful of multiplexers, and per-output
//! dividers. [`ClockTree`] models that as a static node table: each
//! node knows its parent, a ratio, and whether the ratio or the parent
//! itself must be re-read from live registers. Frequencies are computed
//! on demand, walking parent links, and cached until something
//! invalidates them.
//!
//! Peripheral drivers only ever ask for a frequency:
//!
//! ```no_run
//! use am18x_hal::dclk::{ClockId, ClockTree};
//! # const PLL0: *const () = core::ptr::null();
//! # const PLL1: *const () = core::ptr::null();
//! # const SYSCFG: *const () = core::ptr::null();
//!
//! // Safety: pointers reference the PLL0, PLL1, and SYSCFG0 blocks.
//! let mut clocks = unsafe { ClockTree::new(24_000_000, PLL0, PLL1, SYSCFG) };
//! let uart_hz = clocks.freq(ClockId::Uart1Clk);
//! ```
//!
//! A frequency of zero means the clock is gated or otherwise
//! disconnected; callers must not derive divider settings from it.

use crate::ral::{pll, read_reg, syscfg, Static};
use crate::{Error, Result};

/// Names every node in the clock tree.
///
/// `Invalid` is the disconnected sentinel: it's the parent of the root
/// and of any gated-off output, and its frequency is always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ClockId {
    /// Crystal input
    Oscin = 0,
    /// OSCIN buffered out to peripherals, gated by PLL0 CKEN
    Pll0AuxClk,
    /// PLL0 reference mux: OSCIN or PLL1 SYSCLK3
    Pll0In,
    /// PLL0 pre-divider output
    Pll0Prediv,
    /// PLL0 multiplier output
    Pll0Pll,
    /// PLL0 post-divider output
    Pll0Postdiv,
    /// PLL0 output mux: post-divider or bypass
    Pll0Out,
    /// PLL0 SYSCLK dividers
    Pll0SysClk1,
    Pll0SysClk2,
    Pll0SysClk3,
    Pll0SysClk4,
    Pll0SysClk5,
    Pll0SysClk6,
    Pll0SysClk7,
    /// PLL0 observation clock
    Pll0ObsClk,
    /// PLL1 multiplier output
    Pll1Pll,
    /// PLL1 post-divider output
    Pll1Postdiv,
    /// PLL1 output mux: post-divider or bypass
    Pll1Out,
    /// PLL1 SYSCLK dividers
    Pll1SysClk1,
    Pll1SysClk2,
    Pll1SysClk3,
    /// PLL1 observation clock
    Pll1ObsClk,
    /// Fixed divide-by-4.5 tap off PLLOUT
    Div4p5,
    /// ASYNC3 peripheral domain mux
    Async3,
    /// EMIFA clock mux
    EmifaClk,
    /// UART1 module clock, on the ASYNC3 domain
    Uart1Clk,
    /// UART2 module clock, on the ASYNC3 domain
    Uart2Clk,
    /// Disconnected
    Invalid,
}

/// Number of real nodes in the table.
const NODES: usize = ClockId::Invalid as usize;

impl ClockId {
    /// Every real node, in table order.
    pub const ALL: [ClockId; NODES] = [
        ClockId::Oscin,
        ClockId::Pll0AuxClk,
        ClockId::Pll0In,
        ClockId::Pll0Prediv,
        ClockId::Pll0Pll,
        ClockId::Pll0Postdiv,
        ClockId::Pll0Out,
        ClockId::Pll0SysClk1,
        ClockId::Pll0SysClk2,
        ClockId::Pll0SysClk3,
        ClockId::Pll0SysClk4,
        ClockId::Pll0SysClk5,
        ClockId::Pll0SysClk6,
        ClockId::Pll0SysClk7,
        ClockId::Pll0ObsClk,
        ClockId::Pll1Pll,
        ClockId::Pll1Postdiv,
        ClockId::Pll1Out,
        ClockId::Pll1SysClk1,
        ClockId::Pll1SysClk2,
        ClockId::Pll1SysClk3,
        ClockId::Pll1ObsClk,
        ClockId::Div4p5,
        ClockId::Async3,
        ClockId::EmifaClk,
        ClockId::Uart1Clk,
        ClockId::Uart2Clk,
    ];

    /// The display name, matching data sheet spellings.
    pub fn name(self) -> &'static str {
        match self {
            ClockId::Oscin => "oscin",
            ClockId::Pll0AuxClk => "pll0_auxclk",
            ClockId::Pll0In => "pll0_in",
            ClockId::Pll0Prediv => "pll0_prediv",
            ClockId::Pll0Pll => "pll0_pll",
            ClockId::Pll0Postdiv => "pll0_postdiv",
            ClockId::Pll0Out => "pll0_out",
            ClockId::Pll0SysClk1 => "pll0_sysclk1",
            ClockId::Pll0SysClk2 => "pll0_sysclk2",
            ClockId::Pll0SysClk3 => "pll0_sysclk3",
            ClockId::Pll0SysClk4 => "pll0_sysclk4",
            ClockId::Pll0SysClk5 => "pll0_sysclk5",
            ClockId::Pll0SysClk6 => "pll0_sysclk6",
            ClockId::Pll0SysClk7 => "pll0_sysclk7",
            ClockId::Pll0ObsClk => "pll0_obsclk",
            ClockId::Pll1Pll => "pll1_pll",
            ClockId::Pll1Postdiv => "pll1_postdiv",
            ClockId::Pll1Out => "pll1_out",
            ClockId::Pll1SysClk1 => "pll1_sysclk1",
            ClockId::Pll1SysClk2 => "pll1_sysclk2",
            ClockId::Pll1SysClk3 => "pll1_sysclk3",
            ClockId::Pll1ObsClk => "pll1_obsclk",
            ClockId::Div4p5 => "div4.5",
            ClockId::Async3 => "async3",
            ClockId::EmifaClk => "emifa_clk",
            ClockId::Uart1Clk => "uart1_clk",
            ClockId::Uart2Clk => "uart2_clk",
            ClockId::Invalid => "invalid",
        }
    }
}

mod flag {
    /// Node selects a source; its frequency is its parent's, unscaled.
    pub const MUX: u8 = 1 << 0;
    /// Parent and ratio come from live registers on every recompute.
    pub const REREAD: u8 = 1 << 1;
    /// Cached frequency is stale.
    pub const RECALC: u8 = 1 << 2;
    /// Traversal marker for the subtree invalidation walk.
    pub const VISITED: u8 = 1 << 3;
}

/// Register-backed behavior of a node, standing in for the usual pair
/// of calc/apply callbacks. One discriminant per distinct register
/// read, so the hardware coupling is all in [`ClockTree::resolve`] and
/// [`ClockTree::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Select {
    Pll0Input,
    Pll0Bypass,
    Pll0Mult,
    Pll0Prediv,
    Pll0Postdiv,
    Pll0SysDiv(u8),
    Pll0AuxGate,
    Pll0ObsDiv,
    Pll1Bypass,
    Pll1Mult,
    Pll1Postdiv,
    Pll1SysDiv(u8),
    Pll1ObsDiv,
    Async3,
    EmifaSrc,
    Div4p5Gate,
}

#[derive(Clone, Copy)]
struct Node {
    parent: ClockId,
    mul: u16,
    div: u16,
    flags: u8,
    freq: u32,
    select: Option<Select>,
}

impl Node {
    const fn fixed(parent: ClockId) -> Self {
        Node {
            parent,
            mul: 1,
            div: 1,
            flags: flag::RECALC,
            freq: 0,
            select: None,
        }
    }

    const fn dynamic(parent: ClockId, select: Select) -> Self {
        Node {
            parent,
            mul: 1,
            div: 1,
            flags: flag::RECALC | flag::REREAD,
            freq: 0,
            select: Some(select),
        }
    }

    const fn scaled(parent: ClockId, mul: u16, div: u16, select: Select) -> Self {
        Node {
            parent,
            mul,
            div,
            flags: flag::RECALC | flag::REREAD,
            freq: 0,
            select: Some(select),
        }
    }

    const fn mux(parent: ClockId, select: Select) -> Self {
        Node {
            parent,
            mul: 1,
            div: 1,
            flags: flag::MUX | flag::RECALC | flag::REREAD,
            freq: 0,
            select: Some(select),
        }
    }
}

/// Initial node table, in [`ClockId`] order. Parents recorded here are
/// the reset-default routing; REREAD nodes refresh them from hardware
/// before first use. Authored acyclic.
const NODE_TABLE: [Node; NODES] = [
    Node::fixed(ClockId::Invalid), // Oscin: the root
    Node::dynamic(ClockId::Oscin, Select::Pll0AuxGate),
    Node::mux(ClockId::Oscin, Select::Pll0Input),
    Node::dynamic(ClockId::Pll0In, Select::Pll0Prediv),
    Node::dynamic(ClockId::Pll0Prediv, Select::Pll0Mult),
    Node::dynamic(ClockId::Pll0Pll, Select::Pll0Postdiv),
    Node::mux(ClockId::Pll0In, Select::Pll0Bypass),
    Node::dynamic(ClockId::Pll0Out, Select::Pll0SysDiv(1)),
    Node::dynamic(ClockId::Pll0Out, Select::Pll0SysDiv(2)),
    Node::dynamic(ClockId::Pll0Out, Select::Pll0SysDiv(3)),
    Node::dynamic(ClockId::Pll0Out, Select::Pll0SysDiv(4)),
    Node::dynamic(ClockId::Pll0Out, Select::Pll0SysDiv(5)),
    Node::dynamic(ClockId::Pll0Out, Select::Pll0SysDiv(6)),
    Node::dynamic(ClockId::Pll0Out, Select::Pll0SysDiv(7)),
    Node::dynamic(ClockId::Oscin, Select::Pll0ObsDiv),
    Node::dynamic(ClockId::Oscin, Select::Pll1Mult),
    Node::dynamic(ClockId::Pll1Pll, Select::Pll1Postdiv),
    Node::mux(ClockId::Oscin, Select::Pll1Bypass),
    Node::dynamic(ClockId::Pll1Out, Select::Pll1SysDiv(1)),
    Node::dynamic(ClockId::Pll1Out, Select::Pll1SysDiv(2)),
    Node::dynamic(ClockId::Pll1Out, Select::Pll1SysDiv(3)),
    Node::dynamic(ClockId::Oscin, Select::Pll1ObsDiv),
    Node::scaled(ClockId::Pll0Out, 2, 9, Select::Div4p5Gate),
    Node::mux(ClockId::Pll0SysClk2, Select::Async3),
    Node::mux(ClockId::Pll0SysClk3, Select::EmifaSrc),
    Node::fixed(ClockId::Async3), // Uart1Clk
    Node::fixed(ClockId::Async3), // Uart2Clk
];

/// The device clock tree.
///
/// Construct one per system, handing it the crystal frequency and the
/// PLL0, PLL1, and SYSCFG0 register blocks. Methods take `&mut self`;
/// if the tree is shared across contexts, the caller serializes access.
pub struct ClockTree {
    osc_hz: u32,
    pll0: Static<pll::RegisterBlock>,
    pll1: Static<pll::RegisterBlock>,
    syscfg: Static<syscfg::RegisterBlock>,
    nodes: [Node; NODES],
}

impl ClockTree {
    /// Create the clock tree.
    ///
    /// Every node starts stale, so the first frequency query reads the
    /// hardware's current routing rather than assuming reset defaults.
    ///
    /// # Safety
    ///
    /// `pll0`, `pll1`, and `syscfg` must point to the start of the
    /// PLL0, PLL1, and SYSCFG0 register blocks for your chip.
    pub const unsafe fn new(
        osc_hz: u32,
        pll0: *const (),
        pll1: *const (),
        syscfg: *const (),
    ) -> Self {
        Self {
            osc_hz,
            pll0: Static(pll0.cast()),
            pll1: Static(pll1.cast()),
            syscfg: Static(syscfg.cast()),
            nodes: NODE_TABLE,
        }
    }

    /// Returns the node's output frequency in Hz, recomputing lazily.
    ///
    /// Zero means disconnected: the id is [`ClockId::Invalid`], or some
    /// gate or divider on the path to the crystal is disabled. Callers
    /// must treat zero as "do not program a divider from this".
    pub fn freq(&mut self, id: ClockId) -> u32 {
        self.freq_at(id, 0)
    }

    fn freq_at(&mut self, id: ClockId, depth: usize) -> u32 {
        if id == ClockId::Invalid {
            return 0;
        }
        if id == ClockId::Oscin {
            return self.osc_hz;
        }
        // The table is authored acyclic, but a bad REREAD result could
        // route a parent downstream of its child. Bail out instead of
        // recursing forever.
        if depth > NODES {
            return 0;
        }

        let node = self.nodes[id as usize];
        if node.flags & flag::RECALC == 0 {
            return node.freq;
        }

        let (parent, mul, div) = match node.select {
            Some(select) if node.flags & flag::REREAD != 0 => self.resolve(select),
            _ => (node.parent, node.mul, node.div),
        };

        let parent_hz = self.freq_at(parent, depth + 1);
        let hz = if node.flags & flag::MUX != 0 {
            // A mux selects a source; only dividers scale.
            parent_hz
        } else {
            (u64::from(parent_hz) * u64::from(mul) / u64::from(div)) as u32
        };

        let node = &mut self.nodes[id as usize];
        node.parent = parent;
        node.mul = mul;
        node.div = div;
        node.freq = hz;
        node.flags &= !flag::RECALC;
        hz
    }

    /// Marks every non-root node stale, then eagerly recomputes the
    /// whole table in order.
    ///
    /// This is the conservative, tree-wide invalidation. Callers that
    /// need a single frequency should call [`freq`](Self::freq)
    /// directly; callers that changed one mux get the narrower
    /// invalidation inside [`set_parent`](Self::set_parent).
    pub fn recalc_all(&mut self) {
        // Index 0 is the root oscillator; it has nothing to recompute.
        for node in self.nodes.iter_mut().skip(1) {
            node.flags |= flag::RECALC;
            node.flags &= !flag::VISITED;
        }
        for id in ClockId::ALL {
            self.freq(id);
        }
    }

    /// Reroutes a mux node to a new parent.
    ///
    /// Writes the selection to hardware, invalidates the node's
    /// descendants (transitively), and recomputes the node's own
    /// frequency so the caller observes the effect immediately.
    ///
    /// Fails with [`Error::NotConfigurable`] if the node isn't a
    /// software-selectable mux, or [`Error::InvalidParent`] if the
    /// requested parent isn't one of the mux's inputs. Neither failure
    /// touches hardware or the cache.
    pub fn set_parent(&mut self, id: ClockId, parent: ClockId) -> Result<()> {
        if id == ClockId::Invalid {
            return Err(Error::NotConfigurable);
        }
        let node = self.nodes[id as usize];
        let select = match node.select {
            Some(select) if node.flags & flag::MUX != 0 => select,
            _ => return Err(Error::NotConfigurable),
        };
        self.apply(select, parent)?;

        self.nodes[id as usize].parent = parent;
        self.invalidate_subtree(id);
        self.nodes[id as usize].flags |= flag::RECALC;
        self.freq(id);
        Ok(())
    }

    /// Re-reads a node's parent and ratio from live registers.
    fn resolve(&self, select: Select) -> (ClockId, u16, u16) {
        let pll0 = &self.pll0;
        let pll1 = &self.pll1;
        let syscfg = &self.syscfg;
        match select {
            Select::Pll0Input => {
                if read_reg!(crate::ral::pll, pll0, PLLCTL, EXTCLKSRC == 1) {
                    (ClockId::Pll1SysClk3, 1, 1)
                } else {
                    (ClockId::Oscin, 1, 1)
                }
            }
            Select::Pll0Bypass => {
                if read_reg!(crate::ral::pll, pll0, PLLCTL, PLLEN == 1) {
                    (ClockId::Pll0Postdiv, 1, 1)
                } else {
                    (ClockId::Pll0In, 1, 1)
                }
            }
            Select::Pll0Mult => {
                let m = read_reg!(crate::ral::pll, pll0, PLLM, PLLM) as u16;
                (ClockId::Pll0Prediv, m + 1, 1)
            }
            Select::Pll0Prediv => (ClockId::Pll0In, 1, bypassed_ratio(&pll0.PREDIV)),
            Select::Pll0Postdiv => (ClockId::Pll0Pll, 1, bypassed_ratio(&pll0.POSTDIV)),
            Select::Pll0SysDiv(n) => match gated_ratio(pll0.plldiv(n.into())) {
                Some(div) => (ClockId::Pll0Out, 1, div),
                None => (ClockId::Invalid, 1, 1),
            },
            Select::Pll0AuxGate => {
                if read_reg!(crate::ral::pll, pll0, CKEN, AUXEN == 1) {
                    (ClockId::Oscin, 1, 1)
                } else {
                    (ClockId::Invalid, 1, 1)
                }
            }
            Select::Pll0ObsDiv => match gated_ratio(&pll0.OSCDIV) {
                Some(div) if read_reg!(crate::ral::pll, pll0, CKEN, OBSEN == 1) => {
                    (ClockId::Oscin, 1, div)
                }
                _ => (ClockId::Invalid, 1, 1),
            },
            Select::Pll1Mult => {
                let m = read_reg!(crate::ral::pll, pll1, PLLM, PLLM) as u16;
                (ClockId::Oscin, m + 1, 1)
            }
            Select::Pll1Postdiv => (ClockId::Pll1Pll, 1, bypassed_ratio(&pll1.POSTDIV)),
            Select::Pll1Bypass => {
                if read_reg!(crate::ral::pll, pll1, PLLCTL, PLLEN == 1) {
                    (ClockId::Pll1Postdiv, 1, 1)
                } else {
                    (ClockId::Oscin, 1, 1)
                }
            }
            Select::Pll1SysDiv(n) => match gated_ratio(pll1.plldiv(n.into())) {
                Some(div) => (ClockId::Pll1Out, 1, div),
                None => (ClockId::Invalid, 1, 1),
            },
            Select::Pll1ObsDiv => match gated_ratio(&pll1.OSCDIV) {
                Some(div) if read_reg!(crate::ral::pll, pll1, CKEN, OBSEN == 1) => {
                    (ClockId::Oscin, 1, div)
                }
                _ => (ClockId::Invalid, 1, 1),
            },
            Select::Async3 => {
                if read_reg!(crate::ral::syscfg, syscfg, CFGCHIP3, ASYNC3_CLKSRC == 1) {
                    (ClockId::Pll1SysClk2, 1, 1)
                } else {
                    (ClockId::Pll0SysClk2, 1, 1)
                }
            }
            Select::EmifaSrc => {
                if read_reg!(crate::ral::syscfg, syscfg, CFGCHIP3, EMA_CLKSRC == 1) {
                    (ClockId::Div4p5, 1, 1)
                } else {
                    (ClockId::Pll0SysClk3, 1, 1)
                }
            }
            Select::Div4p5Gate => {
                if read_reg!(crate::ral::syscfg, syscfg, CFGCHIP3, DIV45PENA == 1) {
                    (ClockId::Pll0Out, 2, 9)
                } else {
                    (ClockId::Invalid, 2, 9)
                }
            }
        }
    }

    /// Writes a mux selection back to hardware.
    fn apply(&mut self, select: Select, parent: ClockId) -> Result<()> {
        use crate::ral::syscfg::CFGCHIP3;
        match select {
            Select::Async3 => {
                let bit = match parent {
                    ClockId::Pll0SysClk2 => 0,
                    ClockId::Pll1SysClk2 => CFGCHIP3::ASYNC3_CLKSRC::mask,
                    _ => return Err(Error::InvalidParent),
                };
                self.syscfg.unlocked(|s| {
                    let value = s.CFGCHIP3.read();
                    s.CFGCHIP3.write(value & !CFGCHIP3::ASYNC3_CLKSRC::mask | bit);
                });
                Ok(())
            }
            Select::EmifaSrc => {
                let bit = match parent {
                    ClockId::Pll0SysClk3 => 0,
                    ClockId::Div4p5 => CFGCHIP3::EMA_CLKSRC::mask,
                    _ => return Err(Error::InvalidParent),
                };
                self.syscfg.unlocked(|s| {
                    let value = s.CFGCHIP3.read();
                    s.CFGCHIP3.write(value & !CFGCHIP3::EMA_CLKSRC::mask | bit);
                });
                Ok(())
            }
            // The remaining muxes follow hardware state owned by the
            // PLL configuration sequence; they can't be rerouted here.
            _ => Err(Error::NotConfigurable),
        }
    }

    /// Marks every descendant of `root` stale. `root` itself is the
    /// caller's business.
    fn invalidate_subtree(&mut self, root: ClockId) {
        for node in self.nodes.iter_mut() {
            node.flags &= !flag::VISITED;
        }
        self.mark_children(root);
    }

    fn mark_children(&mut self, parent: ClockId) {
        for idx in 0..NODES {
            let node = self.nodes[idx];
            if node.parent == parent && node.flags & flag::VISITED == 0 {
                self.nodes[idx].flags |= flag::RECALC | flag::VISITED;
                self.mark_children(ClockId::ALL[idx]);
            }
        }
    }

    #[cfg(test)]
    fn parent_of(&self, id: ClockId) -> ClockId {
        self.nodes[id as usize].parent
    }
}

/// Divider value for always-on dividers: disabled means "pass through".
fn bypassed_ratio(reg: &ral_registers::RWRegister<u32>) -> u16 {
    use crate::ral::pll::DIV;
    let value = reg.read();
    if value & DIV::EN::mask != 0 {
        ((value & DIV::RATIO::mask) >> DIV::RATIO::offset) as u16 + 1
    } else {
        1
    }
}

/// Divider value for gated dividers: disabled means "no output".
fn gated_ratio(reg: &ral_registers::RWRegister<u32>) -> Option<u16> {
    use crate::ral::pll::DIV;
    let value = reg.read();
    if value & DIV::EN::mask != 0 {
        Some(((value & DIV::RATIO::mask) >> DIV::RATIO::offset) as u16 + 1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ral::pll::DIV;
    use crate::testutil::fake;
    use std::boxed::Box;
    use std::vec::Vec;

    const OSC_HZ: u32 = 24_000_000;

    struct Fixture {
        pll0: Box<pll::RegisterBlock>,
        pll1: Box<pll::RegisterBlock>,
        syscfg: Box<syscfg::RegisterBlock>,
    }

    fn divider(ratio: u32) -> u32 {
        DIV::EN::mask | (ratio - 1) << DIV::RATIO::offset
    }

    /// PLL0 at 600 MHz, PLL1 at 288 MHz, both out of a 24 MHz crystal.
    fn fixture() -> Fixture {
        let fx = Fixture {
            pll0: fake(),
            pll1: fake(),
            syscfg: fake(),
        };
        fx.pll0.PLLCTL.write(pll::PLLCTL::PLLEN::mask);
        fx.pll0.PLLM.write(24); // x25
        fx.pll0.PREDIV.write(divider(1));
        fx.pll0.POSTDIV.write(divider(1));
        fx.pll0.plldiv(1).write(divider(1)); // 600 MHz
        fx.pll0.plldiv(2).write(divider(2)); // 300 MHz
        fx.pll0.plldiv(3).write(divider(4)); // 150 MHz
        fx.pll0.plldiv(4).write(divider(3)); // 200 MHz
        fx.pll0.plldiv(6).write(divider(1)); // 600 MHz
        fx.pll0.plldiv(7).write(divider(8)); // 75 MHz
        // plldiv 5 left disabled on purpose

        fx.pll1.PLLCTL.write(pll::PLLCTL::PLLEN::mask);
        fx.pll1.PLLM.write(11); // x12
        fx.pll1.POSTDIV.write(divider(1));
        fx.pll1.plldiv(1).write(divider(1)); // 288 MHz
        fx.pll1.plldiv(2).write(divider(2)); // 144 MHz
        fx.pll1.plldiv(3).write(divider(3)); // 96 MHz
        fx
    }

    fn tree(fx: &Fixture) -> ClockTree {
        // Safety: the fixture owns real (heap) register blocks.
        unsafe {
            ClockTree::new(
                OSC_HZ,
                (&*fx.pll0 as *const pll::RegisterBlock).cast(),
                (&*fx.pll1 as *const pll::RegisterBlock).cast(),
                (&*fx.syscfg as *const syscfg::RegisterBlock).cast(),
            )
        }
    }

    #[test]
    fn invalid_is_always_zero() {
        let fx = fixture();
        let mut clocks = tree(&fx);
        assert_eq!(clocks.freq(ClockId::Invalid), 0);
        clocks.recalc_all();
        assert_eq!(clocks.freq(ClockId::Invalid), 0);
    }

    #[test]
    fn table_is_acyclic() {
        let fx = fixture();
        let mut clocks = tree(&fx);
        clocks.recalc_all();
        for id in ClockId::ALL {
            let mut cursor = id;
            let mut hops = 0;
            while !matches!(cursor, ClockId::Oscin | ClockId::Invalid) {
                cursor = clocks.parent_of(cursor);
                hops += 1;
                assert!(hops <= NODES, "cycle through {}", id.name());
            }
        }
    }

    #[test]
    fn pll_chain_frequencies() {
        let fx = fixture();
        let mut clocks = tree(&fx);
        assert_eq!(clocks.freq(ClockId::Oscin), OSC_HZ);
        assert_eq!(clocks.freq(ClockId::Pll0Out), 600_000_000);
        assert_eq!(clocks.freq(ClockId::Pll0SysClk2), 300_000_000);
        assert_eq!(clocks.freq(ClockId::Pll0SysClk7), 75_000_000);
        assert_eq!(clocks.freq(ClockId::Pll1SysClk2), 144_000_000);
        // ASYNC3 defaults to PLL0 SYSCLK2 and muxes don't scale.
        assert_eq!(clocks.freq(ClockId::Async3), 300_000_000);
        assert_eq!(clocks.freq(ClockId::Uart1Clk), 300_000_000);
    }

    #[test]
    fn gated_divider_reads_zero() {
        let fx = fixture();
        let mut clocks = tree(&fx);
        assert_eq!(clocks.freq(ClockId::Pll0SysClk5), 0);
        // AUXCLK gate is off in the fixture, too.
        assert_eq!(clocks.freq(ClockId::Pll0AuxClk), 0);
        fx.pll0.CKEN.write(pll::CKEN::AUXEN::mask);
        clocks.recalc_all();
        assert_eq!(clocks.freq(ClockId::Pll0AuxClk), OSC_HZ);
    }

    #[test]
    fn bypassed_pll_follows_oscillator() {
        let fx = fixture();
        fx.pll0.PLLCTL.write(0); // bypass
        let mut clocks = tree(&fx);
        assert_eq!(clocks.freq(ClockId::Pll0Out), OSC_HZ);
        assert_eq!(clocks.freq(ClockId::Pll0SysClk2), OSC_HZ / 2);
    }

    #[test]
    fn div4p5_uses_integer_ratio() {
        let fx = fixture();
        fx.syscfg
            .CFGCHIP3
            .write(syscfg::CFGCHIP3::DIV45PENA::mask);
        let mut clocks = tree(&fx);
        // 600 MHz * 2 / 9, floor.
        assert_eq!(clocks.freq(ClockId::Div4p5), 133_333_333);
    }

    #[test]
    fn cached_matches_fresh_computation() {
        let fx = fixture();
        let mut clocks = tree(&fx);
        clocks.recalc_all();
        let cached: Vec<u32> = ClockId::ALL.iter().map(|&id| clocks.freq(id)).collect();
        // A brand-new tree over the same registers has no cache at all.
        let mut fresh = tree(&fx);
        for (&id, &hz) in ClockId::ALL.iter().zip(cached.iter()) {
            assert_eq!(fresh.freq(id), hz, "mismatch at {}", id.name());
        }
    }

    #[test]
    fn set_parent_redirects_descendants() {
        let fx = fixture();
        let mut clocks = tree(&fx);
        assert_eq!(clocks.freq(ClockId::Uart1Clk), 300_000_000);

        clocks
            .set_parent(ClockId::Async3, ClockId::Pll1SysClk2)
            .unwrap();
        // The hardware selection was written...
        assert_ne!(
            fx.syscfg.CFGCHIP3.read() & syscfg::CFGCHIP3::ASYNC3_CLKSRC::mask,
            0
        );
        // ...the mux recomputed immediately...
        assert_eq!(clocks.freq(ClockId::Async3), 144_000_000);
        // ...and stale descendants were invalidated, not left cached.
        assert_eq!(clocks.freq(ClockId::Uart1Clk), 144_000_000);
        assert_eq!(clocks.freq(ClockId::Uart2Clk), 144_000_000);

        clocks
            .set_parent(ClockId::Async3, ClockId::Pll0SysClk2)
            .unwrap();
        assert_eq!(clocks.freq(ClockId::Uart1Clk), 300_000_000);
    }

    #[test]
    fn set_parent_rejects_fixed_nodes() {
        let fx = fixture();
        let mut clocks = tree(&fx);
        assert_eq!(
            clocks.set_parent(ClockId::Pll0SysClk1, ClockId::Oscin),
            Err(Error::NotConfigurable)
        );
        assert_eq!(
            clocks.set_parent(ClockId::Invalid, ClockId::Oscin),
            Err(Error::NotConfigurable)
        );
    }

    #[test]
    fn set_parent_rejects_foreign_parent_without_side_effects() {
        let fx = fixture();
        let mut clocks = tree(&fx);
        clocks.recalc_all();
        let before = fx.syscfg.CFGCHIP3.read();
        assert_eq!(
            clocks.set_parent(ClockId::Async3, ClockId::Pll0SysClk7),
            Err(Error::InvalidParent)
        );
        assert_eq!(fx.syscfg.CFGCHIP3.read(), before);
        assert_eq!(clocks.freq(ClockId::Async3), 300_000_000);
    }

    #[test]
    fn divider_change_observed_after_recalc() {
        let fx = fixture();
        let mut clocks = tree(&fx);
        assert_eq!(clocks.freq(ClockId::Pll0SysClk4), 200_000_000);
        fx.pll0.plldiv(4).write(divider(6));
        // Still cached: nothing invalidated it yet.
        assert_eq!(clocks.freq(ClockId::Pll0SysClk4), 200_000_000);
        clocks.recalc_all();
        assert_eq!(clocks.freq(ClockId::Pll0SysClk4), 100_000_000);
    }
}
