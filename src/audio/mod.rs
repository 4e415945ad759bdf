pub mod container;
pub mod decode;
pub mod temp;
pub mod vad;

pub use container::AudioContainer;
pub use decode::{decode_to_mono, decode_to_mono_16k, PcmAudio, WHISPER_SAMPLE_RATE};
pub use temp::TempAudio;
