//! Semihosting debug output
//!
//! Optional host-side tracing for bench bring-up. Costs a debugger halt
//! per message, so this never ships enabled.

use core::cell::RefCell;
use core::fmt::Write;

use cortex_m::interrupt::{self, Mutex};
use cortex_m_semihosting::hio::{self, HStdout};

static STDOUT: Mutex<RefCell<Option<HStdout>>> = Mutex::new(RefCell::new(None));

/// Claims the semihosting stdout channel. Call once before any tracing.
pub fn init() {
    interrupt::free(|cs| {
        if let Ok(stdout) = hio::hstdout() {
            STDOUT.borrow(cs).replace(Some(stdout));
        }
    });
}

#[doc(hidden)]
pub fn write_fmt(args: core::fmt::Arguments) {
    interrupt::free(|cs| {
        if let Some(stdout) = STDOUT.borrow(cs).borrow_mut().as_mut() {
            stdout.write_fmt(args).ok();
        }
    });
}

/// Prints to the semihosting host console.
#[macro_export]
macro_rules! sprint {
    ($($arg:tt)*) => {
        $crate::debug::write_fmt(format_args!($($arg)*))
    };
}

/// Prints to the semihosting host console, with a newline.
#[macro_export]
macro_rules! sprintln {
    () => {
        $crate::sprint!("\n")
    };
    ($($arg:tt)*) => {
        $crate::debug::write_fmt(format_args!("{}\n", format_args!($($arg)*)))
    };
}
