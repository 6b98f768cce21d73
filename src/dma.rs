//! GPDMA ring transfer
//!
//! Steady-state waveform generation runs with no CPU involvement: a single
//! GPDMA channel copies one table word into DACR per DAC trigger, and its
//! linked-list item points back at itself so the transfer repeats forever.
//! Software only ever touches the channel to retarget it at another table,
//! which must follow the disable / reprogram / enable protocol driven by
//! [`crate::control::Controller`].

/// Upper bound of the channel control TRANSFER_SIZE field.
pub const MAX_TRANSFER: usize = 0xfff;

// Channel control word fields
const SWIDTH_WORD: u32 = 0b010 << 18;
const DWIDTH_WORD: u32 = 0b010 << 21;
const SRC_INCREMENT: u32 = 1 << 26;

/// A circular memory-to-peripheral transfer, fully described as a value.
///
/// `len` always equals the length of the source table; a mismatch replays a
/// truncated or overlong period and corrupts the output waveform.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RingDescriptor {
    /// Source table base address.
    pub src: u32,
    /// Peripheral data register address, not incremented.
    pub dst: u32,
    /// Transfer length in table entries.
    pub len: usize,
    /// Whether the descriptor chains back onto itself.
    pub looped: bool,
}

impl RingDescriptor {
    /// Describes the circular transfer feeding `table` into the data
    /// register at `dst`.
    pub fn new(table: &[u32], dst: u32) -> RingDescriptor {
        RingDescriptor {
            src: table.as_ptr() as usize as u32,
            dst,
            len: table.len(),
            looped: true,
        }
    }

    /// Packs the GPDMA channel control word: word-wide source and
    /// destination, source increment only, no terminal-count interrupt.
    pub fn control_word(&self) -> u32 {
        debug_assert!(self.len <= MAX_TRANSFER);
        (self.len as u32 & MAX_TRANSFER as u32) | SWIDTH_WORD | DWIDTH_WORD | SRC_INCREMENT
    }
}

/// The retarget seam of the ring transfer channel.
///
/// Callers must hold the sequence `disable` -> `program` -> `enable`
/// uninterrupted with respect to the control lines; a preempted retarget
/// leaves the channel pointing at a half-configured descriptor.
pub trait RingDma {
    /// Stops the channel. Conversion requests are ignored until `enable`.
    fn disable(&mut self);

    /// Rewrites the channel registers and its linked-list item from `desc`.
    /// Only valid while the channel is disabled.
    fn program(&mut self, desc: &RingDescriptor);

    /// Starts the programmed transfer.
    fn enable(&mut self);
}

#[cfg(feature = "lpc1769")]
mod lpc {
    use core::cell::UnsafeCell;

    use super::{RingDescriptor, RingDma};
    use crate::pac::Gpdma as GPDMA;
    use crate::syscon::{Syscon, PCGPDMA};

    // Channel config fields
    const ENABLE: u32 = 1 << 0;
    const DEST_DAC: u32 = 7 << 6;
    const MEM_TO_PERIPH: u32 = 0b001 << 11;

    /// GPDMA linked-list item, laid out as the controller fetches it.
    #[repr(C)]
    struct Lli {
        src: u32,
        dst: u32,
        next: u32,
        control: u32,
    }

    struct LliCell(UnsafeCell<Lli>);

    // Owned exclusively by C0, which is a singleton handed out by split().
    unsafe impl Sync for LliCell {}

    static RING_LLI: LliCell = LliCell(UnsafeCell::new(Lli {
        src: 0,
        dst: 0,
        next: 0,
        control: 0,
    }));

    /// GPDMA channel 0, the highest-priority channel, reserved for the
    /// DAC ring transfer.
    pub struct C0 {
        _private: (),
    }

    impl C0 {
        fn regs(&self) -> &crate::pac::gpdma::RegisterBlock {
            unsafe { &(*GPDMA::ptr()) }
        }
    }

    impl RingDma for C0 {
        fn disable(&mut self) {
            let ch = self.regs();
            ch.ch_config(0).modify(|r, w| unsafe { w.bits(r.bits() & !ENABLE) });
        }

        fn program(&mut self, desc: &RingDescriptor) {
            let lli = RING_LLI.0.get();
            let lli_addr = if desc.looped {
                lli as usize as u32
            } else {
                0
            };
            unsafe {
                (*lli).src = desc.src;
                (*lli).dst = desc.dst;
                (*lli).next = lli_addr;
                (*lli).control = desc.control_word();
            }

            let dma = unsafe { &(*GPDMA::ptr()) };
            dma.inttcclear().write(|w| unsafe { w.bits(1 << 0) });
            dma.interrclr().write(|w| unsafe { w.bits(1 << 0) });

            let ch = self.regs();
            ch.srcaddr(0).write(|w| unsafe { w.bits(desc.src) });
            ch.destaddr(0).write(|w| unsafe { w.bits(desc.dst) });
            ch.lli(0).write(|w| unsafe { w.bits(lli_addr) });
            ch.control(0).write(|w| unsafe { w.bits(desc.control_word()) });
            ch.ch_config(0)
                .write(|w| unsafe { w.bits(DEST_DAC | MEM_TO_PERIPH) });
        }

        fn enable(&mut self) {
            let ch = self.regs();
            ch.ch_config(0).modify(|r, w| unsafe { w.bits(r.bits() | ENABLE) });
        }
    }

    /// GPDMA channels. Only channel 0 is brought out; the waveform ring
    /// transfer needs the top-priority channel to guarantee zero-jitter
    /// servicing of DAC requests.
    pub struct Channels {
        pub c0: C0,
    }

    /// Extension trait to power up and split the GPDMA controller.
    pub trait DmaExt {
        fn split(self, syscon: &mut Syscon) -> Channels;
    }

    impl DmaExt for GPDMA {
        fn split(self, syscon: &mut Syscon) -> Channels {
            syscon.power_up(PCGPDMA);
            // controller on, little-endian on both AHB masters
            self.dmac_config().write(|w| unsafe { w.bits(1) });
            Channels { c0: C0 { _private: () } }
        }
    }
}

#[cfg(feature = "lpc1769")]
pub use self::lpc::{Channels, DmaExt, C0};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::{self, WaveTables, Waveform, TABLE_LEN};

    #[test]
    fn descriptor_length_tracks_every_table() {
        let tables = WaveTables::generate();
        let shapes = [Waveform::Square, Waveform::Triangle, Waveform::Sine];
        for &shape in shapes.iter() {
            let table = tables.table(shape);
            let desc = RingDescriptor::new(table, 0x4008_c000);
            assert_eq!(desc.len, TABLE_LEN, "{:?}", shape);
            assert_eq!(desc.src, table.as_ptr() as usize as u32);
            assert!(desc.looped);
        }
    }

    #[test]
    fn control_word_packs_length_and_widths() {
        let desc = RingDescriptor::new(&waveform::SINE, 0x4008_c000);
        let ctrl = desc.control_word();
        assert_eq!(ctrl & 0xfff, TABLE_LEN as u32);
        assert_eq!((ctrl >> 18) & 0b111, 0b010, "source width");
        assert_eq!((ctrl >> 21) & 0b111, 0b010, "destination width");
        assert_ne!(ctrl & (1 << 26), 0, "source increments");
        assert_eq!(ctrl & (1 << 27), 0, "destination fixed");
        assert_eq!(ctrl & (1 << 31), 0, "no terminal-count interrupt");
    }
}
