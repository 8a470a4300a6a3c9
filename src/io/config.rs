//! `config.json` loading.
//!
//! The file is read and parsed on every call; callers load it once at startup
//! and pass the resulting [`Config`] down by reference.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;

use crate::{
    error::{HarnessError, Result},
    io::paths::config_path,
};

pub const DEFAULT_INPUT_FILE: &str = "Missy.mp3";
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

const MIN_SAMPLE_RATE: u32 = 8_000;
const MAX_SAMPLE_RATE: u32 = 192_000;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,

    /// File under `input_dir` the drivers separate.
    #[serde(default = "default_input_file")]
    pub input_file: String,

    #[serde(default)]
    pub spleeter: SpleeterSettings,

    #[serde(default)]
    pub demucs: DemucsSettings,

    #[serde(default)]
    pub openunmix: OpenUnmixSettings,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpleeterSettings {
    pub program: String,
    /// 2, 4 or 5 (`spleeter:<n>stems`).
    pub stems: u8,
    /// `null` writes stems at their native rate.
    pub output_sample_rate: Option<u32>,
}

impl Default for SpleeterSettings {
    fn default() -> Self {
        Self {
            program: "spleeter".into(),
            stems: 4,
            output_sample_rate: Some(DEFAULT_SAMPLE_RATE),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemucsSettings {
    pub program: String,
    pub model: String,
    pub output_sample_rate: Option<u32>,
}

impl Default for DemucsSettings {
    fn default() -> Self {
        Self {
            program: "demucs".into(),
            model: "htdemucs".into(),
            output_sample_rate: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct OpenUnmixSettings {
    pub program: String,
    pub model: String,
    pub output_sample_rate: Option<u32>,
}

impl Default for OpenUnmixSettings {
    fn default() -> Self {
        Self {
            program: "umx".into(),
            model: "umxhq".into(),
            output_sample_rate: Some(DEFAULT_SAMPLE_RATE),
        }
    }
}

fn default_input_file() -> String {
    DEFAULT_INPUT_FILE.into()
}

impl Config {
    /// Full path of the file the drivers separate.
    pub fn input_path(&self) -> PathBuf {
        self.input_dir.join(&self.input_file)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_file.trim().is_empty() {
            return Err(HarnessError::ConfigInvalid("input_file is empty".into()));
        }

        if !matches!(self.spleeter.stems, 2 | 4 | 5) {
            return Err(HarnessError::ConfigInvalid(format!(
                "spleeter.stems must be 2, 4 or 5 (got {})",
                self.spleeter.stems
            )));
        }

        for (key, value) in [
            ("spleeter.program", &self.spleeter.program),
            ("demucs.program", &self.demucs.program),
            ("demucs.model", &self.demucs.model),
            ("openunmix.program", &self.openunmix.program),
            ("openunmix.model", &self.openunmix.model),
        ] {
            if value.trim().is_empty() {
                return Err(HarnessError::ConfigInvalid(format!("{key} is empty")));
            }
        }

        for (key, rate) in [
            ("spleeter.output_sample_rate", self.spleeter.output_sample_rate),
            ("demucs.output_sample_rate", self.demucs.output_sample_rate),
            ("openunmix.output_sample_rate", self.openunmix.output_sample_rate),
        ] {
            if let Some(r) = rate {
                if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&r) {
                    return Err(HarnessError::ConfigInvalid(format!(
                        "{key} must be between {MIN_SAMPLE_RATE} and {MAX_SAMPLE_RATE} Hz (got {r})"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Loads `config.json` from the project root (or `STEM_HARNESS_CONFIG`).
pub fn load_config() -> Result<Config> {
    load_config_from(config_path())
}

pub fn load_config_from<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(HarnessError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let raw = fs::read(path)?;
    let config: Config =
        serde_json::from_slice(&raw).map_err(|source| HarnessError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    config.validate()?;

    debug!("Loaded config from {}", path.display());
    Ok(config)
}
