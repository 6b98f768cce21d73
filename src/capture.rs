//! Capture bridge
//!
//! The oscilloscope side relays whatever the ADC last converted out over
//! the serial link as a decimal line. The latest sample lives in a single
//! atomic cell, last-write-wins: readers may observe a value one
//! conversion old. No queueing, no backpressure, no framing beyond
//! digits and CRLF.

use core::sync::atomic::{AtomicU16, Ordering};

/// Longest encoded line: five digits for a 16-bit sample plus CRLF.
pub const LINE_MAX: usize = 7;

/// Latest captured ADC sample, continuously overwritten.
pub struct Capture(AtomicU16);

impl Capture {
    pub const fn new() -> Capture {
        Capture(AtomicU16::new(0))
    }

    pub fn store(&self, sample: u16) {
        self.0.store(sample, Ordering::Relaxed);
    }

    pub fn load(&self) -> u16 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Encodes `sample` as ASCII decimal digits without leading zeros,
/// terminated by CRLF, and returns the encoded prefix of `buf`.
pub fn encode(sample: u16, buf: &mut [u8; LINE_MAX]) -> &[u8] {
    let mut digits = [0u8; 5];
    let mut n = 0;
    let mut rest = sample;
    loop {
        digits[n] = b'0' + (rest % 10) as u8;
        n += 1;
        rest /= 10;
        if rest == 0 {
            break;
        }
    }
    for i in 0..n {
        buf[i] = digits[n - 1 - i];
    }
    buf[n] = b'\r';
    buf[n + 1] = b'\n';
    &buf[..n + 2]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(sample: u16) -> Vec<u8> {
        let mut buf = [0u8; LINE_MAX];
        encode(sample, &mut buf).to_vec()
    }

    #[test]
    fn zero_is_a_single_digit() {
        assert_eq!(encoded(0), b"0\r\n");
    }

    #[test]
    fn no_leading_zeros() {
        assert_eq!(encoded(45), b"45\r\n");
        assert_eq!(encoded(7), b"7\r\n");
        assert_eq!(encoded(306), b"306\r\n");
    }

    #[test]
    fn four_digit_full_scale() {
        assert_eq!(encoded(1023), b"1023\r\n");
        assert_eq!(encoded(4095), b"4095\r\n");
    }

    #[test]
    fn widest_sample_fits() {
        assert_eq!(encoded(u16::MAX), b"65535\r\n");
    }

    #[test]
    fn capture_is_last_write_wins() {
        let c = Capture::new();
        assert_eq!(c.load(), 0);
        c.store(512);
        c.store(513);
        assert_eq!(c.load(), 513);
    }
}
