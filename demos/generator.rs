//! Complete generator firmware: DMA-fed DAC waveform output with four
//! button-driven controls, plus the ADC capture bridge streaming samples
//! over UART2.
//!
//! Button map (all falling edge): EINT0 next waveform, EINT1 next rate,
//! EINT2 amplitude up, EINT3 amplitude down. Sending ASCII `1` over the
//! serial link raises the indicator on P0.22 and answers with a greeting.

#![no_std]
#![no_main]

extern crate panic_halt;

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use cortex_m::interrupt::{free, Mutex};
use cortex_m::peripheral::NVIC;
use cortex_m_rt::entry;

use lpc176x_siggen::capture::{self, Capture};
use lpc176x_siggen::control::{ControlEvent, Controller};
use lpc176x_siggen::dac::Dac;
use lpc176x_siggen::dma::C0;
use lpc176x_siggen::exti::{self, Line};
use lpc176x_siggen::pins::{self, Output};
use lpc176x_siggen::prelude::*;
use lpc176x_siggen::serial::{self, CommandMonitor, Config, Event, Indicator, Rx2};
use lpc176x_siggen::stepper::Stepper;
use lpc176x_siggen::waveform::WaveTables;
use lpc176x_siggen::{interrupt, pac};

type Generator = Controller<'static, C0, Dac, Stepper<Output, Output>>;

static GENERATOR: Mutex<RefCell<Option<Generator>>> = Mutex::new(RefCell::new(None));
static SERIAL_IN: Mutex<RefCell<Option<(Rx2, Output, CommandMonitor)>>> =
    Mutex::new(RefCell::new(None));
static CAPTURE: Capture = Capture::new();
static GREET: AtomicBool = AtomicBool::new(false);

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();

    let mut syscon = dp.syscon.constrain();
    let pins::Outputs { indicator, amp_step, amp_dir } = pins::wire(dp.pinconnect);

    let tables: &'static WaveTables =
        cortex_m::singleton!(: WaveTables = WaveTables::generate()).unwrap();

    let dac = dp.dac.constrain();
    let dac_addr = dac.data_register_address();
    let channels = dp.gpdma.split(&mut syscon);
    let adc = dp.adc.constrain(&mut syscon);
    let stepper = Stepper::new(amp_step, amp_dir).unwrap();

    let mut port = dp.uart2.serial(Config::default(), &mut syscon);
    port.listen(Event::Rxne);
    let (mut tx, rx) = port.split();

    {
        let sys = syscon.raw();
        sys.listen(Line::Eint0);
        sys.listen(Line::Eint1);
        sys.listen(Line::Eint2);
        sys.listen(Line::Eint3);
    }

    let mut generator = Controller::new(tables, dac_addr, channels.c0, dac, stepper);

    free(|cs| {
        generator.start();
        GENERATOR.borrow(cs).replace(Some(generator));
        SERIAL_IN
            .borrow(cs)
            .replace(Some((rx, indicator, CommandMonitor::new())));
    });

    unsafe {
        NVIC::unmask(pac::Interrupt::EINT0);
        NVIC::unmask(pac::Interrupt::EINT1);
        NVIC::unmask(pac::Interrupt::EINT2);
        NVIC::unmask(pac::Interrupt::EINT3);
        NVIC::unmask(pac::Interrupt::UART2);
    }

    let mut line = [0u8; capture::LINE_MAX];
    loop {
        CAPTURE.store(adc.latest());
        let encoded = capture::encode(CAPTURE.load(), &mut line);
        serial::send_best_effort(&mut tx, encoded);

        if GREET.swap(false, Ordering::Relaxed) {
            serial::send_best_effort(&mut tx, &serial::GREETING);
        }

        // roughly 40 lines a second with the core at 100 MHz
        cortex_m::asm::delay(2_500_000);
    }
}

fn on_button(line: Line, event: ControlEvent) {
    exti::unpend(line);
    free(|cs| {
        if let Some(generator) = GENERATOR.borrow(cs).borrow_mut().as_mut() {
            generator.dispatch(event);
        }
    });
}

#[interrupt]
fn EINT0() {
    on_button(Line::Eint0, ControlEvent::NextWaveform);
}

#[interrupt]
fn EINT1() {
    on_button(Line::Eint1, ControlEvent::NextRate);
}

#[interrupt]
fn EINT2() {
    on_button(Line::Eint2, ControlEvent::AmplitudeUp);
}

#[interrupt]
fn EINT3() {
    on_button(Line::Eint3, ControlEvent::AmplitudeDown);
}

#[interrupt]
fn UART2() {
    free(|cs| {
        if let Some((rx, indicator, monitor)) = SERIAL_IN.borrow(cs).borrow_mut().as_mut() {
            while let Ok(byte) = rx.read() {
                match monitor.on_byte(byte) {
                    Indicator::On => indicator.set_high().ok(),
                    Indicator::Off => indicator.set_low().ok(),
                };
                if monitor.take_greeting() {
                    GREET.store(true, Ordering::Relaxed);
                }
            }
        }
    });
}
