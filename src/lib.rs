//! Waveform generator / oscilloscope front-end for LPC176x microcontrollers.
//!
//! The crate splits along the hardware seam: selection state, sample tables,
//! ring-transfer descriptors and the control protocol are portable and build
//! (and test) on any target, while the register-level backends for the DAC,
//! GPDMA, ADC, UART2 and the external interrupt lines require the `lpc1769`
//! feature. The `rt` feature additionally enables interrupt vectoring through
//! the PAC so the `generator` demo can be flashed as-is.
#![cfg_attr(not(test), no_std)]
#![allow(non_camel_case_types)]

pub extern crate cortex_m;
pub extern crate embedded_hal as hal;
pub extern crate nb;

pub use nb::block;

#[cfg(feature = "lpc1769")]
pub use lpc176x5x as pac;

#[cfg(feature = "rt")]
pub use crate::pac::Interrupt as interrupt;
#[cfg(feature = "rt")]
pub use cortex_m_rt::interrupt;

#[cfg(feature = "debug")]
#[macro_use]
pub mod debug;

pub mod capture;
pub mod control;
pub mod dac;
pub mod dma;
pub mod exti;
pub mod prelude;
pub mod serial;
pub mod stepper;
pub mod time;
pub mod waveform;

#[cfg(feature = "lpc1769")]
pub mod adc;
#[cfg(feature = "lpc1769")]
pub mod pins;
#[cfg(feature = "lpc1769")]
pub mod syscon;
