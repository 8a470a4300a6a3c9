use std::collections::{btree_map, BTreeMap};
use std::fmt;

/// Interleaved multi-channel samples plus their rate.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioData {
    /// Samples per channel.
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Separated stems keyed by stem name ("vocals", "drums", ...).
#[derive(Clone, Debug, Default)]
pub struct StemSet {
    stems: BTreeMap<String, AudioData>,
}

impl StemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a stem, returning the buffer previously stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, audio: AudioData) -> Option<AudioData> {
        self.stems.insert(name.into(), audio)
    }

    pub fn get(&self, name: &str) -> Option<&AudioData> {
        self.stems.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.stems.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AudioData> {
        self.stems.iter()
    }
}

impl<'a> IntoIterator for &'a StemSet {
    type Item = (&'a String, &'a AudioData);
    type IntoIter = btree_map::Iter<'a, String, AudioData>;

    fn into_iter(self) -> Self::IntoIter {
        self.stems.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, AudioData)> for StemSet {
    fn from_iter<I: IntoIterator<Item = (S, AudioData)>>(iter: I) -> Self {
        Self {
            stems: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Sample rate used when writing stems to disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputRate {
    /// Keep whatever rate the stem already has.
    Native,
    /// Resample every stem to this rate before writing.
    Fixed(u32),
}

impl OutputRate {
    pub fn from_config(rate: Option<u32>) -> Self {
        rate.map(OutputRate::Fixed).unwrap_or(OutputRate::Native)
    }

    pub fn resolve(self, native: u32) -> u32 {
        match self {
            OutputRate::Native => native,
            OutputRate::Fixed(r) => r,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum BackendKind {
    Spleeter,
    Demucs,
    #[value(name = "openunmix")]
    OpenUnmix,
}

impl BackendKind {
    pub fn all() -> &'static [Self] {
        &[Self::Spleeter, Self::Demucs, Self::OpenUnmix]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spleeter => "spleeter",
            Self::Demucs => "demucs",
            Self::OpenUnmix => "openunmix",
        }
    }

    /// Directory under `output_dir` the drivers write into.
    pub fn output_dir_name(&self) -> String {
        format!("output_{}", self.as_str())
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct SplitReport {
    pub backend: &'static str,
    pub stems: Vec<String>,
    pub files: Vec<std::path::PathBuf>,
}
