//! Separation adapters.
//!
//! Every backend is wrapped behind [`SeparationModel`], a three step pipeline:
//! load audio, separate it into named stems, save each stem as `<name>.wav`.

pub mod demucs;
pub mod external;
pub mod openunmix;
pub mod registry;
pub mod spleeter;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    core::{audio::write_audio, dsp::resample},
    error::Result,
    types::{AudioData, OutputRate, StemSet},
};

pub use demucs::DemucsModel;
pub use openunmix::OpenUnmixModel;
pub use spleeter::SpleeterModel;

pub trait SeparationModel {
    /// Short backend name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Rate stems are written at by [`SeparationModel::save_stems`].
    fn output_rate(&self) -> OutputRate;

    /// Decodes `path` and conditions it for this backend (channel count, sample rate).
    fn load_audio(&self, path: &Path) -> Result<AudioData>;

    fn separate_stems(&self, audio: &AudioData) -> Result<StemSet>;

    /// Creates `output_dir` (and parents) and writes one `<stem>.wav` per stem,
    /// overwriting existing files. Returns the written paths in stem-name order.
    fn save_stems(&self, stems: &StemSet, output_dir: &Path) -> Result<Vec<PathBuf>> {
        save_stem_set(stems, output_dir, self.output_rate())
    }
}

pub fn save_stem_set(stems: &StemSet, output_dir: &Path, rate: OutputRate) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(stems.len());
    for (name, audio) in stems {
        let target = rate.resolve(audio.sample_rate);
        let path = output_dir.join(format!("{name}.wav"));

        if target == audio.sample_rate {
            write_audio(&path, audio)?;
        } else {
            write_audio(&path, &resample(audio, target)?)?;
        }

        info!("💾 Saved {} to {}", name, path.display());
        written.push(path);
    }

    Ok(written)
}
