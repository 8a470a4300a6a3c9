use std::path::Path;

use crate::{
    core::{
        audio::read_audio,
        dsp::{ensure_stereo, resample},
    },
    error::Result,
    io::config::{SpleeterSettings, DEFAULT_SAMPLE_RATE},
    model::{external::ExternalTool, SeparationModel},
    types::{AudioData, OutputRate, StemSet},
};

/// Spleeter's pretrained `spleeter:<n>stems` models (2: vocals/accompaniment,
/// 4: vocals/drums/bass/other, 5: adds piano).
pub struct SpleeterModel {
    tool: ExternalTool,
    stems: u8,
    output_rate: OutputRate,
}

impl SpleeterModel {
    pub fn new(settings: &SpleeterSettings) -> Self {
        Self {
            tool: ExternalTool::new("spleeter", settings.program.clone()),
            stems: settings.stems,
            output_rate: OutputRate::from_config(settings.output_sample_rate),
        }
    }

    pub fn model_spec(&self) -> String {
        format!("spleeter:{}stems", self.stems)
    }
}

impl SeparationModel for SpleeterModel {
    fn name(&self) -> &'static str {
        "spleeter"
    }

    fn output_rate(&self) -> OutputRate {
        self.output_rate
    }

    fn load_audio(&self, path: &Path) -> Result<AudioData> {
        let audio = ensure_stereo(read_audio(path)?);
        resample(&audio, DEFAULT_SAMPLE_RATE)
    }

    fn separate_stems(&self, audio: &AudioData) -> Result<StemSet> {
        let spec = self.model_spec();
        self.tool.separate(audio, |input, out| {
            vec![
                "separate".into(),
                "-p".into(),
                spec.into(),
                "-o".into(),
                out.as_os_str().to_owned(),
                input.as_os_str().to_owned(),
            ]
        })
    }
}
