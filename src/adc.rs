//! Burst-mode ADC
//!
//! The scope input is sampled continuously in hardware burst mode on
//! AD0.0; software never starts a conversion, it only reads whatever the
//! global data register last latched. The 12-bit result is relayed
//! unscaled.

use crate::pac::Adc as ADC;
use crate::syscon::{Syscon, PCAD};

// ADCR fields
const SEL_CH0: u32 = 1 << 0;
const BURST: u32 = 1 << 16;
const PDN: u32 = 1 << 21;

/// Divider from the 25 MHz peripheral clock down to the 13 MHz ADC limit.
const CLKDIV: u32 = 1 << 8;

/// Free-running converter on channel 0.
pub struct BurstAdc {
    rb: ADC,
}

impl BurstAdc {
    /// Most recent conversion result, 0..=4095.
    pub fn latest(&self) -> u16 {
        ((self.rb.gdr().read().bits() >> 4) & 0xfff) as u16
    }

    pub fn release(self) -> ADC {
        self.rb
    }
}

/// Extension trait to power up the converter in burst mode.
pub trait AdcExt {
    fn constrain(self, syscon: &mut Syscon) -> BurstAdc;
}

impl AdcExt for ADC {
    fn constrain(self, syscon: &mut Syscon) -> BurstAdc {
        syscon.power_up(PCAD);
        self.cr()
            .write(|w| unsafe { w.bits(SEL_CH0 | CLKDIV | BURST | PDN) });
        BurstAdc { rb: self }
    }
}
