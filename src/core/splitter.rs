use std::{path::Path, process::ExitCode};

use log::{info, warn};

use crate::{
    error::{HarnessError, Result},
    io::config::{load_config, Config},
    model::{registry::build_model, SeparationModel},
    types::{BackendKind, SplitReport},
};

/// load_audio -> separate_stems -> save_stems, once.
pub fn run_pipeline(
    model: &dyn SeparationModel,
    input_path: &Path,
    output_dir: &Path,
) -> Result<SplitReport> {
    if !input_path.exists() {
        return Err(HarnessError::InputNotFound {
            path: input_path.to_path_buf(),
        });
    }

    info!("Testing {}...", model.name());
    let audio = model.load_audio(input_path)?;
    info!(
        "Loaded {}: {} Hz, {} ch, {:.1}s",
        input_path.display(),
        audio.sample_rate,
        audio.channels,
        audio.duration_secs()
    );

    let stems = model.separate_stems(&audio)?;
    if stems.is_empty() {
        warn!("{} returned no stems", model.name());
    } else {
        info!("Stems separated successfully: {:?}", stems.names());
    }

    let files = model.save_stems(&stems, output_dir)?;
    info!("Stems saved to {}", output_dir.display());

    Ok(SplitReport {
        backend: model.name(),
        stems: stems.names(),
        files,
    })
}

/// Separates `config.input_path()` into `<output_dir>/output_<backend>`.
pub fn run_backend(kind: BackendKind, config: &Config) -> Result<SplitReport> {
    let model = build_model(kind, config);
    let output_dir = config.output_dir.join(kind.output_dir_name());
    run_pipeline(model.as_ref(), &config.input_path(), &output_dir)
}

/// Runs each backend over the same input in turn, stopping at the first failure.
pub fn run_all(kinds: &[BackendKind], config: &Config) -> Result<Vec<SplitReport>> {
    kinds.iter().map(|&kind| run_backend(kind, config)).collect()
}

/// Loads `config.json` and separates its input with one backend.
pub fn run_configured(kind: BackendKind) -> Result<SplitReport> {
    let config = load_config()?;
    run_backend(kind, &config)
}

/// Body of the single-backend `split-*` binaries.
pub fn run_driver(kind: BackendKind) -> ExitCode {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    match run_configured(kind) {
        Ok(report) => {
            if let Some(dir) = report.files.first().and_then(|f| f.parent()) {
                println!("Stems have been saved to: {}", dir.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
