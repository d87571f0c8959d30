mod oscillator;
mod params;
mod waveform;

pub use self::oscillator::{Oscillator, SILENCE_THRESHOLD};
pub use self::params::SharedParams;
pub use self::waveform::Waveform;
