//! Serial link
//!
//! The capture bridge streams ASCII lines out over UART2 at 9600 baud.
//! Everything here is non-blocking by contract: writes report
//! `nb::Error::WouldBlock` instead of spinning on the transmitter, and
//! [`send_best_effort`] drops whatever does not fit. A blocking send from
//! interrupt context can wedge the processor with the UART interrupt
//! masked, so no blocking entry point is offered at all.

use crate::time::Bps;

/// Serial error
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// RX buffer overrun
    Overrun,
    /// Parity check error
    Parity,
    /// Framing error
    Framing,
    /// Break condition on the line
    Break,
}

/// Interrupt event
pub enum Event {
    /// New data has been received
    Rxne,
}

pub struct Config {
    pub(crate) baudrate: Bps,
}

impl Config {
    pub fn baudrate(mut self, baudrate: Bps) -> Self {
        self.baudrate = baudrate;
        self
    }
}

impl Default for Config {
    fn default() -> Config {
        Config { baudrate: Bps(9_600) }
    }
}

/// Non-blocking byte transmitter.
pub trait Tx {
    fn write(&mut self, byte: u8) -> nb::Result<(), Error>;
}

/// Non-blocking byte receiver.
pub trait Rx {
    fn read(&mut self) -> nb::Result<u8, Error>;
}

/// UART divisor latch value for `baud` on a peripheral clocked at `pclk`.
pub fn divisor(pclk: u32, baud: Bps) -> u16 {
    (pclk / (16 * baud.0)) as u16
}

/// Fire-and-forget transmit: pushes bytes until the transmitter reports
/// `WouldBlock` or errors, then drops the remainder. Returns how many
/// bytes were accepted. Never blocks, never retries.
pub fn send_best_effort<T: Tx>(tx: &mut T, bytes: &[u8]) -> usize {
    for (sent, &byte) in bytes.iter().enumerate() {
        if tx.write(byte).is_err() {
            return sent;
        }
    }
    bytes.len()
}

/// Fixed greeting message requested over the serial command interface.
pub const GREETING: [u8; 5] = *b"HOLA\n";

/// Level requested for the indicator line by the command monitor.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Indicator {
    On,
    Off,
}

/// Single-byte serial command protocol: `'1'` raises the indicator and
/// arms one greeting send, which the main loop picks up through
/// [`CommandMonitor::take_greeting`]; any other byte lowers the indicator.
pub struct CommandMonitor {
    greet: bool,
}

impl CommandMonitor {
    pub const fn new() -> CommandMonitor {
        CommandMonitor { greet: false }
    }

    /// Feeds one received byte, returning the indicator level to apply.
    pub fn on_byte(&mut self, byte: u8) -> Indicator {
        if byte == b'1' {
            self.greet = true;
            Indicator::On
        } else {
            Indicator::Off
        }
    }

    /// Takes the armed greeting request, if any.
    pub fn take_greeting(&mut self) -> bool {
        core::mem::replace(&mut self.greet, false)
    }
}

#[cfg(feature = "lpc1769")]
mod lpc {
    use super::{divisor, Config, Error, Event, Rx, Tx};
    use crate::pac::Uart2 as UART2;
    use crate::syscon::{Syscon, PCUART2};

    // Line status bits
    const RDR: u32 = 1 << 0;
    const OE: u32 = 1 << 1;
    const PE: u32 = 1 << 2;
    const FE: u32 = 1 << 3;
    const BI: u32 = 1 << 4;
    const THRE: u32 = 1 << 5;

    /// UART2 serial port.
    pub struct Serial {
        uart: UART2,
    }

    impl Serial {
        pub fn uart2(uart: UART2, config: Config, syscon: &mut Syscon) -> Serial {
            syscon.power_up(PCUART2);

            let div = divisor(syscon.clocks.pclk.0, config.baudrate);
            // 8N1 with the divisor latch open while the baud rate loads
            uart.lcr().write(|w| unsafe { w.bits(0x83) });
            uart.dll().write(|w| unsafe { w.bits(div as u32 & 0xff) });
            uart.dlm().write(|w| unsafe { w.bits((div as u32 >> 8) & 0xff) });
            uart.lcr().write(|w| unsafe { w.bits(0x03) });
            // enable and reset both FIFOs
            uart.fcr().write(|w| unsafe { w.bits(0x07) });

            Serial { uart }
        }

        /// Starts listening for an interrupt event
        pub fn listen(&mut self, event: Event) {
            match event {
                Event::Rxne => {
                    self.uart
                        .ier()
                        .modify(|r, w| unsafe { w.bits(r.bits() | 1) });
                }
            }
        }

        pub fn split(self) -> (Tx2, Rx2) {
            (Tx2 { _private: () }, Rx2 { _private: () })
        }

        pub fn release(self) -> UART2 {
            self.uart
        }
    }

    /// Transmit half of UART2.
    pub struct Tx2 {
        _private: (),
    }

    /// Receive half of UART2.
    pub struct Rx2 {
        _private: (),
    }

    impl Tx for Tx2 {
        fn write(&mut self, byte: u8) -> nb::Result<(), Error> {
            let uart = unsafe { &(*UART2::ptr()) };
            if uart.lsr().read().bits() & THRE != 0 {
                uart.thr().write(|w| unsafe { w.bits(byte as u32) });
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }

    impl Rx for Rx2 {
        fn read(&mut self) -> nb::Result<u8, Error> {
            let uart = unsafe { &(*UART2::ptr()) };
            let lsr = uart.lsr().read().bits();
            Err(if lsr & OE != 0 {
                nb::Error::Other(Error::Overrun)
            } else if lsr & PE != 0 {
                nb::Error::Other(Error::Parity)
            } else if lsr & FE != 0 {
                nb::Error::Other(Error::Framing)
            } else if lsr & BI != 0 {
                nb::Error::Other(Error::Break)
            } else if lsr & RDR != 0 {
                return Ok(uart.rbr().read().bits() as u8);
            } else {
                nb::Error::WouldBlock
            })
        }
    }

    /// Extension trait to bring up UART2.
    pub trait SerialExt {
        fn serial(self, config: Config, syscon: &mut Syscon) -> Serial;
    }

    impl SerialExt for UART2 {
        fn serial(self, config: Config, syscon: &mut Syscon) -> Serial {
            Serial::uart2(self, config, syscon)
        }
    }
}

#[cfg(feature = "lpc1769")]
pub use self::lpc::{Rx2, Serial, SerialExt, Tx2};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::U32Ext;

    #[test]
    fn divisor_for_default_baud() {
        assert_eq!(divisor(25_000_000, 9_600.bps()), 162);
        assert_eq!(divisor(25_000_000, 115_200.bps()), 13);
    }

    #[test]
    fn monitor_arms_greeting_on_ascii_one() {
        let mut m = CommandMonitor::new();
        assert_eq!(m.on_byte(0x31), Indicator::On);
        assert!(m.take_greeting());
        assert!(!m.take_greeting(), "request is one-shot");
    }

    #[test]
    fn monitor_clears_indicator_on_other_bytes() {
        let mut m = CommandMonitor::new();
        assert_eq!(m.on_byte(b'0'), Indicator::Off);
        assert_eq!(m.on_byte(0xff), Indicator::Off);
        assert!(!m.take_greeting());
    }

    struct ChokingTx {
        accepted: Vec<u8>,
        room: usize,
    }

    impl Tx for ChokingTx {
        fn write(&mut self, byte: u8) -> nb::Result<(), Error> {
            if self.accepted.len() < self.room {
                self.accepted.push(byte);
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }

    #[test]
    fn best_effort_drops_what_does_not_fit() {
        let mut tx = ChokingTx { accepted: Vec::new(), room: 4 };
        let sent = send_best_effort(&mut tx, b"1023\r\n");
        assert_eq!(sent, 4);
        assert_eq!(tx.accepted, b"1023");
        // the tail is gone for good, not retried
        let sent = send_best_effort(&mut tx, b"45\r\n");
        assert_eq!(sent, 0);
    }

    #[test]
    fn best_effort_sends_whole_line_when_idle() {
        let mut tx = ChokingTx { accepted: Vec::new(), room: 16 };
        assert_eq!(send_best_effort(&mut tx, &GREETING), GREETING.len());
        assert_eq!(tx.accepted, b"HOLA\n");
    }
}
