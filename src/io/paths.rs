use std::{env, path::PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CONFIG_ENV_VAR: &str = "STEM_HARNESS_CONFIG";

pub fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// `config.json` at the project root, unless `STEM_HARNESS_CONFIG` points elsewhere.
pub fn config_path() -> PathBuf {
    env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| project_root().join(CONFIG_FILE_NAME))
}
