//! Control-state machine
//!
//! The four edge-triggered control lines each mutate exactly one piece of
//! selection state, so there are no write-write races between them; what
//! needs care is the multi-register retarget of the live ring transfer.
//! [`Controller`] owns the selection and drives the seams in the one order
//! that never exposes a half-configured channel to the DAC. Its methods are
//! not re-entrant: callers run them from interrupt handlers under a
//! critical section, or with the triggering line masked through
//! [`crate::exti::MaskGuard`].

use crate::dac::{PacingTimer, SampleRate};
use crate::dma::{RingDescriptor, RingDma};
use crate::stepper::{AmplitudeControl, Direction};
use crate::waveform::{WaveTables, Waveform};

/// One decoded control-line event.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ControlEvent {
    NextWaveform,
    NextRate,
    AmplitudeUp,
    AmplitudeDown,
}

/// The currently selected waveform and sample rate.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Selection {
    pub waveform: Waveform,
    pub rate: SampleRate,
}

impl Default for Selection {
    fn default() -> Selection {
        Selection {
            waveform: Waveform::Square,
            rate: SampleRate::Khz1,
        }
    }
}

/// Owns the selection state and the waveform output path.
pub struct Controller<'a, DMA, PACING, AMP> {
    tables: &'a WaveTables,
    dac_data_addr: u32,
    selection: Selection,
    dma: DMA,
    pacing: PACING,
    amplitude: AMP,
}

impl<'a, DMA, PACING, AMP> Controller<'a, DMA, PACING, AMP>
where
    DMA: RingDma,
    PACING: PacingTimer,
    AMP: AmplitudeControl,
{
    pub fn new(
        tables: &'a WaveTables,
        dac_data_addr: u32,
        dma: DMA,
        pacing: PACING,
        amplitude: AMP,
    ) -> Self {
        Controller {
            tables,
            dac_data_addr,
            selection: Selection::default(),
            dma,
            pacing,
            amplitude,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    fn descriptor(&self) -> RingDescriptor {
        RingDescriptor::new(self.tables.table(self.selection.waveform), self.dac_data_addr)
    }

    /// Arms the output path for the default selection. The pacing trigger
    /// comes up before the channel so the first request finds a fully
    /// programmed transfer.
    pub fn start(&mut self) {
        self.pacing.set_rate(self.selection.rate);
        let desc = self.descriptor();
        self.dma.program(&desc);
        self.dma.enable();
    }

    /// Advances the waveform selection and retargets the ring transfer.
    pub fn next_waveform(&mut self) -> Waveform {
        self.selection.waveform = self.selection.waveform.next();
        self.retarget();
        self.selection.waveform
    }

    /// Advances the sample-rate selection and reloads the pacing timer.
    pub fn next_rate(&mut self) -> SampleRate {
        self.selection.rate = self.selection.rate.next();
        self.pacing.set_rate(self.selection.rate);
        self.selection.rate
    }

    /// Commands one amplitude increment.
    pub fn amplitude(&mut self, direction: Direction) {
        self.amplitude.nudge(direction);
    }

    /// Routes a decoded event to its handler.
    pub fn dispatch(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::NextWaveform => {
                self.next_waveform();
            }
            ControlEvent::NextRate => {
                self.next_rate();
            }
            ControlEvent::AmplitudeUp => self.amplitude(Direction::Up),
            ControlEvent::AmplitudeDown => self.amplitude(Direction::Down),
        }
    }

    /// Points the ring transfer at the table for the current selection.
    ///
    /// Order is load-bearing: channel off, trigger off, descriptor
    /// rebuilt, trigger on, channel on. Stopping the trigger second keeps
    /// a stray in-flight request from clocking the DAC mid-rewrite.
    fn retarget(&mut self) {
        self.dma.disable();
        self.pacing.suspend();
        let desc = self.descriptor();
        self.dma.program(&desc);
        self.pacing.resume();
        self.dma.enable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::TABLE_LEN;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq, Eq, Clone)]
    enum Call {
        DmaDisable,
        DmaProgram { src: u32, len: usize },
        DmaEnable,
        SetRate(SampleRate),
        Suspend,
        Resume,
        Nudge(Direction),
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    struct MockDma(Log);
    struct MockPacing(Log);
    struct MockAmp(Log);

    impl RingDma for MockDma {
        fn disable(&mut self) {
            self.0.borrow_mut().push(Call::DmaDisable);
        }
        fn program(&mut self, desc: &RingDescriptor) {
            assert!(desc.looped);
            self.0.borrow_mut().push(Call::DmaProgram {
                src: desc.src,
                len: desc.len,
            });
        }
        fn enable(&mut self) {
            self.0.borrow_mut().push(Call::DmaEnable);
        }
    }

    impl PacingTimer for MockPacing {
        fn set_rate(&mut self, rate: SampleRate) {
            self.0.borrow_mut().push(Call::SetRate(rate));
        }
        fn suspend(&mut self) {
            self.0.borrow_mut().push(Call::Suspend);
        }
        fn resume(&mut self) {
            self.0.borrow_mut().push(Call::Resume);
        }
    }

    impl AmplitudeControl for MockAmp {
        fn nudge(&mut self, direction: Direction) {
            self.0.borrow_mut().push(Call::Nudge(direction));
        }
    }

    fn controller<'a>(
        tables: &'a WaveTables,
        log: &Log,
    ) -> Controller<'a, MockDma, MockPacing, MockAmp> {
        Controller::new(
            tables,
            0x4008_c000,
            MockDma(log.clone()),
            MockPacing(log.clone()),
            MockAmp(log.clone()),
        )
    }

    #[test]
    fn start_arms_pacing_before_the_channel() {
        let tables = WaveTables::generate();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut c = controller(&tables, &log);
        c.start();
        let square = tables.table(Waveform::Square).as_ptr() as usize as u32;
        assert_eq!(
            *log.borrow(),
            vec![
                Call::SetRate(SampleRate::Khz1),
                Call::DmaProgram { src: square, len: TABLE_LEN },
                Call::DmaEnable,
            ]
        );
    }

    #[test]
    fn retarget_sequence_never_exposes_a_live_half_programmed_channel() {
        let tables = WaveTables::generate();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut c = controller(&tables, &log);
        c.start();
        log.borrow_mut().clear();

        assert_eq!(c.next_waveform(), Waveform::Triangle);
        let triangle = tables.table(Waveform::Triangle).as_ptr() as usize as u32;
        assert_eq!(
            *log.borrow(),
            vec![
                Call::DmaDisable,
                Call::Suspend,
                Call::DmaProgram { src: triangle, len: TABLE_LEN },
                Call::Resume,
                Call::DmaEnable,
            ]
        );
    }

    #[test]
    fn four_waveform_events_return_to_the_original_shape() {
        let tables = WaveTables::generate();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut c = controller(&tables, &log);
        let original = c.selection().waveform;
        for _ in 0..4 {
            c.dispatch(ControlEvent::NextWaveform);
        }
        assert_eq!(c.selection().waveform, original.next());
        for _ in 0..2 {
            c.dispatch(ControlEvent::NextWaveform);
        }
        assert_eq!(c.selection().waveform, original);
    }

    #[test]
    fn rate_events_reload_the_pacing_timer() {
        let tables = WaveTables::generate();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut c = controller(&tables, &log);
        assert_eq!(c.next_rate(), SampleRate::Khz2);
        assert_eq!(*log.borrow(), vec![Call::SetRate(SampleRate::Khz2)]);

        let original = c.selection().rate;
        for _ in 0..5 {
            c.dispatch(ControlEvent::NextRate);
        }
        assert_eq!(c.selection().rate, original);
    }

    #[test]
    fn amplitude_events_only_touch_the_stepper() {
        let tables = WaveTables::generate();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut c = controller(&tables, &log);
        c.dispatch(ControlEvent::AmplitudeUp);
        c.dispatch(ControlEvent::AmplitudeDown);
        assert_eq!(
            *log.borrow(),
            vec![Call::Nudge(Direction::Up), Call::Nudge(Direction::Down)]
        );
    }
}
