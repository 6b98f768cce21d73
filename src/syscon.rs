//! System control: clocks and peripheral power
//!
//! Clock bring-up is fixed: the 12 MHz main oscillator feeds PLL0
//! multiplied to 400 MHz, divided to a 100 MHz core clock, and every
//! peripheral used by this crate runs from the quarter-rate 25 MHz
//! default peripheral clock. Nothing here is runtime-configurable; the
//! rate tables elsewhere assume these frequencies.

use crate::pac::Syscon as SYSCON;
use crate::time::Hertz;

// PCONP bits
pub(crate) const PCAD: u32 = 1 << 12;
pub(crate) const PCUART2: u32 = 1 << 24;
pub(crate) const PCGPDMA: u32 = 1 << 29;

// SCS bits
const OSCEN: u32 = 1 << 5;
const OSCSTAT: u32 = 1 << 6;

// PLL0STAT bits
const PLOCK0: u32 = 1 << 26;

/// Frozen clock frequencies.
#[derive(Debug, Clone, Copy)]
pub struct Clocks {
    pub cclk: Hertz,
    pub pclk: Hertz,
}

/// Constrained system control block.
pub struct Syscon {
    rb: SYSCON,
    pub clocks: Clocks,
}

impl Syscon {
    pub(crate) fn power_up(&mut self, mask: u32) {
        self.rb
            .pconp()
            .modify(|r, w| unsafe { w.bits(r.bits() | mask) });
    }

    /// Grants access to the underlying register block, for the external
    /// interrupt configuration that lives in SYSCON.
    pub fn raw(&self) -> &SYSCON {
        &self.rb
    }

    fn feed(&self) {
        self.rb.pll0feed().write(|w| unsafe { w.bits(0xaa) });
        self.rb.pll0feed().write(|w| unsafe { w.bits(0x55) });
    }
}

/// Extension trait to freeze the clock tree.
pub trait SysconExt {
    fn constrain(self) -> Syscon;
}

impl SysconExt for SYSCON {
    fn constrain(self) -> Syscon {
        let syscon = Syscon {
            rb: self,
            clocks: Clocks {
                cclk: Hertz(100_000_000),
                pclk: Hertz(25_000_000),
            },
        };

        let rb = &syscon.rb;

        rb.scs().modify(|r, w| unsafe { w.bits(r.bits() | OSCEN) });
        while rb.scs().read().bits() & OSCSTAT == 0 {}

        // main oscillator into PLL0, M = 100, N = 6: 2 * 100 * 12 MHz / 6
        rb.clksrcsel().write(|w| unsafe { w.bits(1) });
        rb.pll0cfg()
            .write(|w| unsafe { w.bits((100 - 1) | ((6 - 1) << 16)) });
        syscon.feed();
        rb.pll0con().write(|w| unsafe { w.bits(1) });
        syscon.feed();
        while rb.pll0stat().read().bits() & PLOCK0 == 0 {}

        // five flash access clocks before stepping the core up to 100 MHz
        rb.flashcfg().write(|w| unsafe { w.bits(0x403a) });
        rb.cclkcfg().write(|w| unsafe { w.bits(3) });
        rb.pll0con().write(|w| unsafe { w.bits(3) });
        syscon.feed();

        syscon
    }
}
