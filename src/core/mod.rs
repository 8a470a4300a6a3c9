pub mod audio;
pub mod dsp;
pub mod splitter;
