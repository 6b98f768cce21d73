//! Amplitude stepper
//!
//! Output amplitude lives in an external digital potentiometer driven over
//! a two-line step/direction interface. The device keeps its own wiper
//! position; firmware only commands single increments and holds no local
//! copy of the level.

use core::convert::Infallible;

use crate::hal::digital::OutputPin;

/// Direction of one amplitude increment.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    Up,
    Down,
}

/// Infallible amplitude seam used by the controller.
pub trait AmplitudeControl {
    fn nudge(&mut self, direction: Direction);
}

/// Step/direction driver for the amplitude potentiometer.
pub struct Stepper<STEP, DIR> {
    step: STEP,
    dir: DIR,
}

impl<STEP, DIR, E> Stepper<STEP, DIR>
where
    STEP: OutputPin<Error = E>,
    DIR: OutputPin<Error = E>,
{
    /// Takes the two control pins, parking the step line low.
    pub fn new(mut step: STEP, dir: DIR) -> Result<Self, E> {
        step.set_low()?;
        Ok(Stepper { step, dir })
    }

    /// Commands one increment: latch the direction level, then pulse the
    /// step line high and back low.
    pub fn step(&mut self, direction: Direction) -> Result<(), E> {
        match direction {
            Direction::Up => self.dir.set_high()?,
            Direction::Down => self.dir.set_low()?,
        }
        self.step.set_high()?;
        self.step.set_low()
    }

    pub fn release(self) -> (STEP, DIR) {
        (self.step, self.dir)
    }
}

impl<STEP, DIR> AmplitudeControl for Stepper<STEP, DIR>
where
    STEP: OutputPin<Error = Infallible>,
    DIR: OutputPin<Error = Infallible>,
{
    fn nudge(&mut self, direction: Direction) {
        match self.step(direction) {
            Ok(()) => (),
            Err(e) => match e {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::digital::ErrorType;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(char, bool)>>>;

    struct MockPin {
        id: char,
        log: Log,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.log.borrow_mut().push((self.id, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.log.borrow_mut().push((self.id, true));
            Ok(())
        }
    }

    fn stepper(log: &Log) -> Stepper<MockPin, MockPin> {
        let step = MockPin { id: 's', log: log.clone() };
        let dir = MockPin { id: 'd', log: log.clone() };
        Stepper::new(step, dir).unwrap()
    }

    #[test]
    fn up_latches_direction_high_before_pulsing() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut s = stepper(&log);
        log.borrow_mut().clear();
        s.step(Direction::Up).unwrap();
        assert_eq!(*log.borrow(), vec![('d', true), ('s', true), ('s', false)]);
    }

    #[test]
    fn down_latches_direction_low_before_pulsing() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut s = stepper(&log);
        log.borrow_mut().clear();
        s.step(Direction::Down).unwrap();
        assert_eq!(*log.borrow(), vec![('d', false), ('s', true), ('s', false)]);
    }

    #[test]
    fn step_line_parks_low() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut s = stepper(&log);
        s.step(Direction::Up).unwrap();
        s.step(Direction::Down).unwrap();
        assert_eq!(log.borrow().last(), Some(&('s', false)));
        assert_eq!(log.borrow().first(), Some(&('s', false)), "parked at init");
    }
}
