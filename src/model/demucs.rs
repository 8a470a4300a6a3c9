use std::path::Path;

use crate::{
    core::{
        audio::read_audio,
        dsp::{ensure_stereo, resample},
    },
    error::Result,
    io::config::DemucsSettings,
    model::{external::ExternalTool, SeparationModel},
    types::{AudioData, OutputRate, StemSet},
};

/// Rate and channel count every pretrained Demucs model is trained on.
pub const DEMUCS_SAMPLE_RATE: u32 = 44_100;
pub const DEMUCS_CHANNELS: u16 = 2;

pub struct DemucsModel {
    tool: ExternalTool,
    model: String,
    output_rate: OutputRate,
}

impl DemucsModel {
    pub fn new(settings: &DemucsSettings) -> Self {
        Self {
            tool: ExternalTool::new("demucs", settings.program.clone()),
            model: settings.model.clone(),
            output_rate: OutputRate::from_config(settings.output_sample_rate),
        }
    }
}

impl SeparationModel for DemucsModel {
    fn name(&self) -> &'static str {
        "demucs"
    }

    fn output_rate(&self) -> OutputRate {
        self.output_rate
    }

    fn load_audio(&self, path: &Path) -> Result<AudioData> {
        let audio = ensure_stereo(read_audio(path)?);
        debug_assert_eq!(audio.channels, DEMUCS_CHANNELS);
        resample(&audio, DEMUCS_SAMPLE_RATE)
    }

    // Output lands in <out>/<model>/mix/<stem>.wav.
    fn separate_stems(&self, audio: &AudioData) -> Result<StemSet> {
        self.tool.separate(audio, |input, out| {
            vec![
                "-n".into(),
                self.model.clone().into(),
                "-o".into(),
                out.as_os_str().to_owned(),
                input.as_os_str().to_owned(),
            ]
        })
    }
}
