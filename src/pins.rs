//! Pin multiplexing
//!
//! One-shot board wiring for the generator:
//!
//! | Pin    | Function | Role                        |
//! |--------|----------|-----------------------------|
//! | P0.26  | AOUT     | DAC output                  |
//! | P0.23  | AD0.0    | scope input                 |
//! | P0.10  | TXD2     | capture stream out          |
//! | P0.11  | RXD2     | command bytes in            |
//! | P2.10  | EINT0    | next waveform button        |
//! | P2.11  | EINT1    | next rate button            |
//! | P2.12  | EINT2    | amplitude up button         |
//! | P2.13  | EINT3    | amplitude down button       |
//! | P0.22  | GPIO out | command indicator           |
//! | P0.21  | GPIO out | amplitude step pulse        |
//! | P0.20  | GPIO out | amplitude direction         |

use core::convert::Infallible;

use crate::hal::digital::{ErrorType, OutputPin};
use crate::pac::{Gpio as GPIO, Pinconnect as PINCONNECT};

/// GPIO ports with push-pull outputs used by this crate.
#[derive(Debug, Clone, Copy)]
pub enum Port {
    P0,
}

/// Push-pull output pin on a GPIO port.
pub struct Output {
    port: Port,
    mask: u32,
}

impl Output {
    fn new(port: Port, bit: u32) -> Output {
        let pin = Output { port, mask: 1 << bit };
        let gpio = unsafe { &(*GPIO::ptr()) };
        match pin.port {
            Port::P0 => {
                gpio.dir(0).modify(|r, w| unsafe { w.bits(r.bits() | pin.mask) });
            }
        }
        pin
    }
}

impl ErrorType for Output {
    type Error = Infallible;
}

impl OutputPin for Output {
    fn set_low(&mut self) -> Result<(), Infallible> {
        let gpio = unsafe { &(*GPIO::ptr()) };
        match self.port {
            Port::P0 => {
                gpio.clr(0).write(|w| unsafe { w.bits(self.mask) });
            }
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        let gpio = unsafe { &(*GPIO::ptr()) };
        match self.port {
            Port::P0 => {
                gpio.set(0).write(|w| unsafe { w.bits(self.mask) });
            }
        }
        Ok(())
    }
}

/// The three dedicated outputs of the board.
pub struct Outputs {
    /// P0.22, raised while a serial command is being honored.
    pub indicator: Output,
    /// P0.21, amplitude stepper pulse line.
    pub amp_step: Output,
    /// P0.20, amplitude stepper direction line.
    pub amp_dir: Output,
}

fn set_function(word: &mut u32, pin: u32, function: u32) {
    let shift = (pin % 16) * 2;
    *word = (*word & !(0b11 << shift)) | (function << shift);
}

/// Routes every pin the generator uses and hands out the GPIO outputs.
///
/// Consumes the pin-connect block; the multiplexing is fixed for the life
/// of the firmware.
pub fn wire(pincon: PINCONNECT) -> Outputs {
    // P0.10 TXD2, P0.11 RXD2 (function 01)
    pincon.pinsel0().modify(|r, w| unsafe {
        let mut bits = r.bits();
        set_function(&mut bits, 10, 0b01);
        set_function(&mut bits, 11, 0b01);
        w.bits(bits)
    });

    // P0.23 AD0.0 (function 01), P0.26 AOUT (function 10),
    // P0.20..P0.22 left as GPIO (function 00)
    pincon.pinsel1().modify(|r, w| unsafe {
        let mut bits = r.bits();
        set_function(&mut bits, 23, 0b01);
        set_function(&mut bits, 26, 0b10);
        set_function(&mut bits, 20, 0b00);
        set_function(&mut bits, 21, 0b00);
        set_function(&mut bits, 22, 0b00);
        w.bits(bits)
    });

    // P2.10..P2.13 EINT0..EINT3 (function 01), pull-ups on (mode 00)
    pincon.pinsel4().modify(|r, w| unsafe {
        let mut bits = r.bits();
        for pin in 10..=13 {
            set_function(&mut bits, pin, 0b01);
        }
        w.bits(bits)
    });
    pincon.pinmode4().modify(|r, w| unsafe {
        let mut bits = r.bits();
        for pin in 10..=13 {
            set_function(&mut bits, pin, 0b00);
        }
        w.bits(bits)
    });

    Outputs {
        indicator: Output::new(Port::P0, 22),
        amp_step: Output::new(Port::P0, 21),
        amp_dir: Output::new(Port::P0, 20),
    }
}
