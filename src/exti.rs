//! External interrupt lines
//!
//! The four front-panel buttons arrive on EINT0..EINT3, falling edge. Each
//! line maps to exactly one control event, decoded in its handler. The
//! handlers mutate shared controller state, so the crate offers
//! [`MaskGuard`] to hold a line masked across a critical region and
//! restore it on every exit path.

/// One of the four dedicated external interrupt lines.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Line {
    Eint0,
    Eint1,
    Eint2,
    Eint3,
}

/// Masking seam for one interrupt line.
pub trait LineMask {
    fn mask(&mut self, line: Line);
    fn unmask(&mut self, line: Line);
}

/// Masks a line on construction and unmasks it on drop, so the line comes
/// back even when the guarded region exits early.
pub struct MaskGuard<'a, M: LineMask> {
    masker: &'a mut M,
    line: Line,
}

impl<'a, M: LineMask> MaskGuard<'a, M> {
    pub fn new(masker: &'a mut M, line: Line) -> Self {
        masker.mask(line);
        MaskGuard { masker, line }
    }
}

impl<'a, M: LineMask> Drop for MaskGuard<'a, M> {
    fn drop(&mut self) {
        self.masker.unmask(self.line);
    }
}

#[cfg(feature = "lpc1769")]
mod lpc {
    use super::{Line, LineMask};
    use crate::pac::{Interrupt, Syscon as SYSCON};
    use cortex_m::peripheral::NVIC;

    impl Line {
        fn index(self) -> u32 {
            match self {
                Line::Eint0 => 0,
                Line::Eint1 => 1,
                Line::Eint2 => 2,
                Line::Eint3 => 3,
            }
        }

        pub(crate) fn interrupt(self) -> Interrupt {
            match self {
                Line::Eint0 => Interrupt::EINT0,
                Line::Eint1 => Interrupt::EINT1,
                Line::Eint2 => Interrupt::EINT2,
                Line::Eint3 => Interrupt::EINT3,
            }
        }
    }

    /// Extension trait to configure the external interrupt lines.
    pub trait ExtiExt {
        /// Switches `line` to edge-sensitive, falling-polarity mode and
        /// clears any stale pending flag.
        fn listen(&self, line: Line);
        fn is_pending(&self, line: Line) -> bool;
        fn unpend(&self, line: Line);
    }

    impl ExtiExt for SYSCON {
        fn listen(&self, line: Line) {
            let bit = 1 << line.index();
            self.extmode().modify(|r, w| unsafe { w.bits(r.bits() | bit) });
            self.extpolar()
                .modify(|r, w| unsafe { w.bits(r.bits() & !bit) });
            self.extint().write(|w| unsafe { w.bits(bit) });
        }

        fn is_pending(&self, line: Line) -> bool {
            self.extint().read().bits() & (1 << line.index()) != 0
        }

        fn unpend(&self, line: Line) {
            // write one to clear
            self.extint().write(|w| unsafe { w.bits(1 << line.index()) });
        }
    }

    /// Acknowledges `line` from its interrupt handler.
    pub fn unpend(line: Line) {
        unsafe { (*SYSCON::ptr()).extint().write(|w| w.bits(1 << line.index())); }
    }

    /// [`LineMask`] over the NVIC enable bits.
    pub struct NvicMask;

    impl LineMask for NvicMask {
        fn mask(&mut self, line: Line) {
            NVIC::mask(line.interrupt());
        }

        fn unmask(&mut self, line: Line) {
            unsafe { NVIC::unmask(line.interrupt()) }
        }
    }
}

#[cfg(feature = "lpc1769")]
pub use self::lpc::{unpend, ExtiExt, NvicMask};

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(Line, bool)>>>;

    struct MockMask(Log);

    impl LineMask for MockMask {
        fn mask(&mut self, line: Line) {
            self.0.borrow_mut().push((line, false));
        }
        fn unmask(&mut self, line: Line) {
            self.0.borrow_mut().push((line, true));
        }
    }

    #[test]
    fn guard_masks_for_exactly_its_scope() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut masker = MockMask(log.clone());
        {
            let _guard = MaskGuard::new(&mut masker, Line::Eint2);
            assert_eq!(*log.borrow(), vec![(Line::Eint2, false)]);
        }
        assert_eq!(
            *log.borrow(),
            vec![(Line::Eint2, false), (Line::Eint2, true)]
        );
    }

    #[test]
    fn guard_restores_on_early_exit() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut masker = MockMask(log.clone());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = MaskGuard::new(&mut masker, Line::Eint0);
            panic!("interrupted");
        }));
        assert!(result.is_err());
        assert_eq!(log.borrow().last(), Some(&(Line::Eint0, true)));
    }
}
