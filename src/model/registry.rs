use crate::{
    io::config::Config,
    model::{DemucsModel, OpenUnmixModel, SeparationModel, SpleeterModel},
    types::BackendKind,
};

/// Builds the adapter for `kind` from its section of the config.
pub fn build_model(kind: BackendKind, config: &Config) -> Box<dyn SeparationModel> {
    match kind {
        BackendKind::Spleeter => Box::new(SpleeterModel::new(&config.spleeter)),
        BackendKind::Demucs => Box::new(DemucsModel::new(&config.demucs)),
        BackendKind::OpenUnmix => Box::new(OpenUnmixModel::new(&config.openunmix)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OutputRate;

    fn config() -> Config {
        serde_json::from_str(r#"{"input_dir": "in", "output_dir": "out"}"#).unwrap()
    }

    #[test]
    fn every_kind_builds_a_matching_model() {
        let cfg = config();
        for &kind in BackendKind::all() {
            assert_eq!(build_model(kind, &cfg).name(), kind.as_str());
        }
    }

    #[test]
    fn default_output_rates() {
        let cfg = config();
        assert_eq!(
            build_model(BackendKind::Spleeter, &cfg).output_rate(),
            OutputRate::Fixed(44_100)
        );
        assert_eq!(
            build_model(BackendKind::Demucs, &cfg).output_rate(),
            OutputRate::Native
        );
        assert_eq!(
            build_model(BackendKind::OpenUnmix, &cfg).output_rate(),
            OutputRate::Fixed(44_100)
        );
    }
}
