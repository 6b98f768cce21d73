//! DAC pacing
//!
//! The LPC176x DAC carries its own countdown timer: whenever the counter
//! hits zero it reloads from CNTVAL and raises a DMA request, so the sample
//! clock runs entirely in hardware. Selecting a sample rate means reloading
//! CNTVAL with a precomputed tick count while the trigger is held off.

use crate::waveform::TABLE_LEN;

/// Clock feeding the DAC counter, CCLK / 4 (the reset-default PCLKSEL
/// divider) with the core at 100 MHz.
pub const DAC_CLOCK_HZ: u32 = 25_000_000;

/// Discrete output frequency steps, cycled by the rate-select line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SampleRate {
    Hz1,
    Hz10,
    Hz100,
    Khz1,
    Khz2,
}

impl SampleRate {
    /// Advances the selection circularly.
    pub fn next(self) -> SampleRate {
        match self {
            SampleRate::Hz1 => SampleRate::Hz10,
            SampleRate::Hz10 => SampleRate::Hz100,
            SampleRate::Hz100 => SampleRate::Khz1,
            SampleRate::Khz1 => SampleRate::Khz2,
            SampleRate::Khz2 => SampleRate::Hz1,
        }
    }

    /// Output frequency of one full table period.
    pub fn hertz(self) -> u32 {
        match self {
            SampleRate::Hz1 => 1,
            SampleRate::Hz10 => 10,
            SampleRate::Hz100 => 100,
            SampleRate::Khz1 => 1_000,
            SampleRate::Khz2 => 2_000,
        }
    }

    /// CNTVAL tick count for this rate: DAC_CLOCK_HZ / (TABLE_LEN * f).
    pub fn reload(self) -> u16 {
        match self {
            SampleRate::Hz1 => 65445,
            SampleRate::Hz10 => 6544,
            SampleRate::Hz100 => 654,
            SampleRate::Khz1 => 65,
            SampleRate::Khz2 => 32,
        }
    }
}

/// The conversion pacing seam of the DAC.
///
/// `set_rate` must only run while the ring transfer is not armed or held
/// disabled; reprogramming the live trigger can clock transitional garbage
/// into the converter.
pub trait PacingTimer {
    /// Disables the trigger, loads the tick count for `rate` and re-enables
    /// the trigger with DMA request generation active.
    fn set_rate(&mut self, rate: SampleRate);

    /// Holds the trigger off, keeping the current tick count.
    fn suspend(&mut self);

    /// Re-enables the trigger with DMA request generation active.
    fn resume(&mut self);
}

#[cfg(feature = "lpc1769")]
mod lpc {
    use super::{PacingTimer, SampleRate};
    use crate::pac::Dac as DAC;

    // DACCTRL bits
    const CNT_ENA: u32 = 1 << 2;
    const DMA_ENA: u32 = 1 << 3;

    /// Digital-to-analog converter with its pacing counter.
    ///
    /// The converter itself needs no PCONP bit; routing P0.26 to AOUT
    /// powers it (see [`crate::pins`]).
    pub struct Dac {
        rb: DAC,
    }

    impl Dac {
        pub fn new(dac: DAC) -> Self {
            dac.ctrl().write(|w| unsafe { w.bits(0) });
            Dac { rb: dac }
        }

        /// Bus address of DACR, the ring transfer destination.
        pub fn data_register_address(&self) -> u32 {
            self.rb.cr() as *const _ as usize as u32
        }

        pub fn release(self) -> DAC {
            self.rb
        }
    }

    impl PacingTimer for Dac {
        fn set_rate(&mut self, rate: SampleRate) {
            self.rb.ctrl().write(|w| unsafe { w.bits(0) });
            self.rb
                .cntval()
                .write(|w| unsafe { w.bits(rate.reload() as u32) });
            self.rb
                .ctrl()
                .write(|w| unsafe { w.bits(DMA_ENA | CNT_ENA) });
        }

        fn suspend(&mut self) {
            self.rb.ctrl().write(|w| unsafe { w.bits(0) });
        }

        fn resume(&mut self) {
            self.rb
                .ctrl()
                .write(|w| unsafe { w.bits(DMA_ENA | CNT_ENA) });
        }
    }

    /// Extension trait to constrain the DAC peripheral.
    pub trait DacExt {
        fn constrain(self) -> Dac;
    }

    impl DacExt for DAC {
        fn constrain(self) -> Dac {
            Dac::new(self)
        }
    }
}

#[cfg(feature = "lpc1769")]
pub use self::lpc::{Dac, DacExt};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rate_cycles_mod_5() {
        let mut r = SampleRate::Hz1;
        for _ in 0..5 {
            r = r.next();
        }
        assert_eq!(r, SampleRate::Hz1);
        assert_eq!(SampleRate::Khz2.next(), SampleRate::Hz1);
    }

    #[test]
    fn reload_matches_pacing_clock() {
        let rates = [
            SampleRate::Hz1,
            SampleRate::Hz10,
            SampleRate::Hz100,
            SampleRate::Khz1,
            SampleRate::Khz2,
        ];
        for &rate in rates.iter() {
            let expect = DAC_CLOCK_HZ / (TABLE_LEN as u32 * rate.hertz());
            assert_eq!(rate.reload() as u32, expect, "{:?}", rate);
        }
    }
}
