use std::path::Path;

use crate::{
    core::{audio::read_audio, dsp::ensure_stereo},
    error::Result,
    io::config::OpenUnmixSettings,
    model::{external::ExternalTool, SeparationModel},
    types::{AudioData, OutputRate, StemSet},
};

/// Open-Unmix (`umx`). Audio is passed at its native rate; the tool resamples itself.
pub struct OpenUnmixModel {
    tool: ExternalTool,
    model: String,
    output_rate: OutputRate,
}

impl OpenUnmixModel {
    pub fn new(settings: &OpenUnmixSettings) -> Self {
        Self {
            tool: ExternalTool::new("openunmix", settings.program.clone()),
            model: settings.model.clone(),
            output_rate: OutputRate::from_config(settings.output_sample_rate),
        }
    }
}

impl SeparationModel for OpenUnmixModel {
    fn name(&self) -> &'static str {
        "openunmix"
    }

    fn output_rate(&self) -> OutputRate {
        self.output_rate
    }

    fn load_audio(&self, path: &Path) -> Result<AudioData> {
        Ok(ensure_stereo(read_audio(path)?))
    }

    fn separate_stems(&self, audio: &AudioData) -> Result<StemSet> {
        self.tool.separate(audio, |input, out| {
            vec![
                input.as_os_str().to_owned(),
                "--outdir".into(),
                out.as_os_str().to_owned(),
                "--model".into(),
                self.model.clone().into(),
            ]
        })
    }
}
