//! # stem-harness
//!
//! Uniform adapters around the Spleeter, Demucs and Open-Unmix separation tools:
//! load a mix, split it into named stems, write each stem as a WAV file.

pub mod core;
pub mod error;
pub mod io;
pub mod model;
pub mod types;

pub use crate::{
    core::{
        audio::{read_audio, write_audio},
        splitter::{run_all, run_backend, run_configured, run_driver, run_pipeline},
    },
    error::{HarnessError, Result},
    io::config::{load_config, load_config_from, Config},
    model::{
        registry::build_model, save_stem_set, DemucsModel, OpenUnmixModel, SeparationModel,
        SpleeterModel,
    },
    types::{AudioData, BackendKind, OutputRate, SplitReport, StemSet},
};
