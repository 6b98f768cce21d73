pub use crate::dac::PacingTimer as _;
pub use crate::dma::RingDma as _;
pub use crate::serial::{Rx as _, Tx as _};
pub use crate::stepper::AmplitudeControl as _;
pub use crate::time::U32Ext as _;

pub use crate::hal::digital::OutputPin as _;

#[cfg(feature = "lpc1769")]
pub use crate::adc::AdcExt as _;
#[cfg(feature = "lpc1769")]
pub use crate::dac::DacExt as _;
#[cfg(feature = "lpc1769")]
pub use crate::dma::DmaExt as _;
#[cfg(feature = "lpc1769")]
pub use crate::exti::ExtiExt as _;
#[cfg(feature = "lpc1769")]
pub use crate::serial::SerialExt as _;
#[cfg(feature = "lpc1769")]
pub use crate::syscon::SysconExt as _;
